// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWKS_URL` | JWKS endpoint of the token issuer | Required for production |
//! | `JWT_ISSUER` | Expected JWT issuer claim | Optional |
//! | `JWT_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `AUTH_CORS_ORIGIN` | Allowed origin for the auth endpoints | Any origin |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the database directory path.
///
/// The embedded redb database file lives under this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the token issuer's JWKS endpoint.
///
/// When unset the server falls back to development-mode token checks
/// (structure and expiry only, no signature verification).
pub const JWKS_URL_ENV: &str = "JWKS_URL";

/// Environment variable name for the expected JWT `iss` claim.
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";

/// Environment variable name for the expected JWT `aud` claim.
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";

/// Environment variable name for the origin allowed on the auth endpoints.
///
/// The specification endpoints allow any origin; only the auth resource is
/// restricted to a single configured origin.
pub const AUTH_CORS_ORIGIN_ENV: &str = "AUTH_CORS_ORIGIN";

/// Environment variable name for the logging output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// File name of the embedded database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "specs.redb";
