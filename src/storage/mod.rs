// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Embedded Storage Module
//!
//! Persistence is backed by **redb**, a pure-Rust embedded ACID database.
//! Every mutating operation runs inside a single write transaction, which is
//! what enforces the two storage invariants atomically:
//!
//! - at most one user per email (`users_by_email` index row written together
//!   with the user row)
//! - no orphaned sections (section rows range-deleted in the same
//!   transaction that removes or replaces their owning specification)
//!
//! ## Table Layout
//!
//! ```text
//! users           u64 id → JSON user record
//! users_by_email  email  → u64 id
//! specifications  u64 id → JSON record (scalar fields)
//! sections        spec_id (8 B BE) ++ position (4 B BE) → JSON section
//! counters        sequence name → last issued u64
//! ```

pub mod database;
pub mod repository;

pub use database::{Database, StoreError, StoreResult};
pub use repository::{NewUser, SpecificationRepository, UserRepository};
