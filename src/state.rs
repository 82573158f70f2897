// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::storage::Database;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    /// Embedded database handle.
    pub db: Arc<Database>,
    /// Bearer-token verifier used by the access policy.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Origin allowed on the auth endpoints; `None` allows any origin.
    pub auth_cors_origin: Option<String>,
}

impl AppState {
    pub fn new(db: Database, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            db: Arc::new(db),
            verifier,
            auth_cors_origin: None,
        }
    }

    /// Restrict the auth endpoints to a single origin.
    pub fn with_auth_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.auth_cors_origin = Some(origin.into());
        self
    }
}
