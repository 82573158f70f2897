// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Specs - Project Specification Service
//!
//! This crate provides a small backend for project specification documents:
//! user signup/login backed by Argon2 password hashing, and CRUD persistence
//! for specifications with owned section children. All non-auth endpoints
//! require a bearer token issued by an external identity provider.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `accounts` - Signup and login orchestration
//! - `auth` - Bearer-token access policy
//! - `password` - One-way password hashing
//! - `storage` - Embedded database (redb)

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod state;
pub mod storage;
