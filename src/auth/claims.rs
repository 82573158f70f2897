// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified-caller representation.

use serde::{Deserialize, Serialize};

/// Claims decoded from a bearer token.
///
/// Only the standard OIDC claims this service relies on are modelled; any
/// extra claims the issuer adds are ignored.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject - the canonical user identifier at the issuer
    pub sub: String,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: i64,

    /// Issuer
    #[serde(default)]
    pub iss: String,

    /// Audience (validated by the jsonwebtoken crate, not read directly)
    #[serde(default)]
    #[allow(dead_code)]
    pub aud: Option<serde_json::Value>,
}

/// Identity extracted from a verified bearer token.
///
/// Inserted into request extensions by the access-policy middleware once
/// verification succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Canonical subject id (`sub` claim)
    pub user_id: String,

    /// Token issuer (kept for logging, not serialized)
    #[serde(skip)]
    pub issuer: String,

    /// Token expiration (Unix timestamp, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_identity() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "user_123",
            "exp": 1700003600,
            "iss": "https://issuer.example.com",
            "aud": "specs-api"
        }))
        .unwrap();

        let user = AuthenticatedUser::from(claims);
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.issuer, "https://issuer.example.com");
        assert_eq!(user.expires_at, 1700003600);
    }

    #[test]
    fn missing_optional_claims_default() {
        let claims: Claims = serde_json::from_value(serde_json::json!({"sub": "u"})).unwrap();
        let user = AuthenticatedUser::from(claims);
        assert_eq!(user.expires_at, 0);
        assert_eq!(user.issuer, "");
    }
}
