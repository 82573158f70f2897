// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth endpoints: signup and login.
//!
//! Responses carry [`UserResponse`], never the stored record, so the
//! password hash stays inside the service.

use axum::{extract::State, Json};

use crate::{
    accounts::{AuthService, CredentialError},
    error::ApiError,
    models::{LoginRequest, SignupRequest, UserResponse},
    state::AppState,
};

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failure or password mismatch"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate().map_err(ApiError::validation)?;

    let service = AuthService::new(&state.db);
    let user = service.signup(&request).map_err(signup_error)?;
    Ok(Json(user.into()))
}

/// Verify credentials.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate().map_err(ApiError::validation)?;

    let service = AuthService::new(&state.db);
    let user = service.login(&request).map_err(login_error)?;
    Ok(Json(user.into()))
}

fn signup_error(e: CredentialError) -> ApiError {
    match e {
        CredentialError::DuplicateEmail(email) => {
            ApiError::conflict(format!("Email already exists: {email}"))
        }
        CredentialError::PasswordMismatch(message) => ApiError::bad_request(message),
        CredentialError::Store(e) => e.into(),
        CredentialError::Hash(e) => {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal("signup failed")
        }
    }
}

fn login_error(e: CredentialError) -> ApiError {
    match e {
        // Unknown email and wrong password collapse into the same response.
        CredentialError::PasswordMismatch(message) => ApiError::unauthorized(message),
        CredentialError::Store(e) => e.into(),
        other => {
            tracing::error!(error = %other, "login failed unexpectedly");
            ApiError::internal("login failed")
        }
    }
}
