// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Access Policy Module
//!
//! Bearer-token authentication for every non-public endpoint.
//!
//! ## Request Flow
//!
//! 1. Client obtains a JWT from the external identity provider
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. The [`policy::require_bearer`] middleware classifies the request:
//!    - CORS preflight (OPTIONS) and the auth resource are public
//!    - everything else must carry a token the configured
//!      [`TokenVerifier`] accepts
//! 4. The verified identity is inserted into request extensions before the
//!    handler runs
//!
//! ## Security
//!
//! - Production verification fetches the issuer's JWKS over HTTPS and
//!   checks signature, expiry, issuer, and audience
//! - JWKS is cached with a TTL
//! - Clock skew tolerance is 60 seconds
//! - Without a configured JWKS URL the server falls back to development
//!   mode: structure and expiry checks only

pub mod claims;
pub mod error;
pub mod jwks;
pub mod policy;
pub mod verifier;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use jwks::JwksManager;
pub use verifier::{InsecureVerifier, JwksVerifier, TokenVerifier};
