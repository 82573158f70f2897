// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the domain records and the request/response data
//! structures used by the REST API. All types derive `Serialize`,
//! `Deserialize`, and `ToSchema` for automatic JSON handling and OpenAPI
//! documentation. Wire names are camelCase to match the existing clients.
//!
//! ## Model Categories
//!
//! - **Users**: credential records (email + password hash)
//! - **Specifications**: project specification documents with owned sections
//!
//! Request validation is explicit: each request type exposes `validate()`,
//! returning the list of field errors, and the handlers reject invalid
//! payloads before any domain call is made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FieldError;

// =============================================================================
// Users
// =============================================================================

/// A stored credential record.
///
/// `password` holds the Argon2 PHC hash, never the plaintext. API responses
/// use [`UserResponse`], which strips the hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Surrogate id assigned by the store.
    pub id: i64,
    /// Unique login email.
    pub email: String,
    /// Argon2 PHC hash of the password.
    pub password: String,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// User representation returned over HTTP (password hash stripped).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Request body for POST /api/auth/signup.
///
/// `password` and `confirmPassword` are optional at the serde level so the
/// credential service can report their absence as a mismatch instead of the
/// framework rejecting the body outright.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SignupRequest {
    /// Boundary validation: email shape, password size, name alphabet.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        validate_password(self.password.as_deref(), &mut errors);
        if let Some(name) = &self.name {
            if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
                errors.push(FieldError::new("name", "Name must contain only letters"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request body for POST /api/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        validate_password(Some(&self.password), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email cannot be blank"));
    } else if !looks_like_email(email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }
}

fn validate_password(password: Option<&str>, errors: &mut Vec<FieldError>) {
    match password {
        None | Some("") => errors.push(FieldError::new("password", "Password cannot be blank")),
        Some(p) => {
            let len = p.chars().count();
            if !(6..=20).contains(&len) {
                errors.push(FieldError::new(
                    "password",
                    "Password must be 6-20 characters",
                ));
            }
        }
    }
}

/// Minimal email shape check: one `@` with a non-empty local part and a
/// dotted domain.
fn looks_like_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

// =============================================================================
// Specifications
// =============================================================================

/// An owned child section of a specification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Surrogate id assigned by the store.
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A project specification document with its owned sections, in payload
/// order. Deleting a specification removes all of its sections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    /// Surrogate id assigned by the store.
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_requirements: Option<String>,
    /// Owned sections, ordered as supplied by the client.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Incoming section payload. Sections without an id (or with an id that
/// does not belong to the record being updated) get a fresh one assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for creating or replacing a specification.
///
/// Update semantics are whole-record: every scalar field and the section
/// collection are overwritten from this payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationPayload {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub primary_objective: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub technical_requirements: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionPayload>,
}
