// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repositories over the embedded database, one per resource.

pub mod specifications;
pub mod users;

pub use specifications::SpecificationRepository;
pub use users::{NewUser, UserRepository};
