// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pluggable bearer-token verification.
//!
//! The access-policy middleware holds a [`TokenVerifier`] trait object, so
//! the verification strategy is chosen once at startup:
//!
//! - [`JwksVerifier`] - production: full signature/expiry/issuer/audience
//!   verification against the issuer's JWKS
//! - [`InsecureVerifier`] - development only: structure and expiry checks
//!   without a signature

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Validation};

use super::claims::{AuthenticatedUser, Claims};
use super::error::AuthError;
use super::jwks::JwksManager;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Verifies a bearer token and yields the caller's identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Production verifier backed by the issuer's JWKS endpoint.
pub struct JwksVerifier {
    jwks: JwksManager,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwksVerifier {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self {
            jwks: JwksManager::new(jwks_url),
            issuer: None,
            audience: None,
        }
    }

    /// Require a specific `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Require a specific `aud` claim.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        // Decode header to get kid (key ID)
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        // Get decoding key from JWKS
        let (decoding_key, algorithm) = if let Some(kid) = &header.kid {
            self.jwks.get_decoding_key(kid).await?
        } else {
            // No kid in header, try any key
            self.jwks.get_any_decoding_key().await?
        };

        // Build validation
        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        if let Some(audience) = &self.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        // Decode and validate token
        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(AuthenticatedUser::from(token_data.claims))
    }
}

/// Development verifier: no signature check.
///
/// WARNING: This must only be used in development environments. It is
/// selected automatically when no JWKS URL is configured.
pub struct InsecureVerifier;

#[async_trait]
impl TokenVerifier for InsecureVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        // Use the dangerous decode API to skip signature verification
        let token_data = jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .map_err(|_| AuthError::MalformedToken)?;

        let claims = token_data.claims;

        // Check expiration manually
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
            return Err(AuthError::TokenExpired);
        }

        Ok(AuthenticatedUser::from(claims))
    }
}
