// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup and login orchestration over the credential store.

use crate::models::{LoginRequest, SignupRequest, User};
use crate::password::{self, HashError};
use crate::storage::{Database, NewUser, StoreError, UserRepository};

/// Errors raised by signup and login.
///
/// `PasswordMismatch` is deliberately shared between the signup
/// confirmation check and every login failure: a failed login never reveals
/// whether the email or the password was wrong.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    PasswordMismatch(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Orchestrates account creation and credential verification.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
        }
    }

    /// Register a new account.
    ///
    /// The email must be unused and `password`/`confirmPassword` must both
    /// be present and equal. On success the stored record carries the hash,
    /// never the plaintext.
    pub fn signup(&self, request: &SignupRequest) -> Result<User, CredentialError> {
        if self.users.find_by_email(&request.email)?.is_some() {
            return Err(CredentialError::DuplicateEmail(request.email.clone()));
        }

        let (password, confirm) = match (&request.password, &request.confirm_password) {
            (Some(p), Some(c)) => (p, c),
            _ => {
                return Err(CredentialError::PasswordMismatch(
                    "Password and confirm password are required".to_string(),
                ))
            }
        };
        if password != confirm {
            return Err(CredentialError::PasswordMismatch(
                "Password and confirm password do not match".to_string(),
            ));
        }

        let user = self.users.create(NewUser {
            email: request.email.clone(),
            password_hash: password::hash(password)?,
            name: request.name.clone(),
        })?;

        tracing::info!(user_id = user.id, email = %user.email, "account created");
        Ok(user)
    }

    /// Verify credentials and return the matching record.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub fn login(&self, request: &LoginRequest) -> Result<User, CredentialError> {
        match self.users.find_by_email(&request.email)? {
            Some(user) if password::verify(&user.password, &request.password) => Ok(user),
            _ => Err(CredentialError::PasswordMismatch(
                "Invalid credentials".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: Some("secret1".to_string()),
            confirm_password: Some("secret1".to_string()),
            name: None,
        }
    }

    #[test]
    fn signup_hashes_the_password_and_persists() {
        let (db, _dir) = temp_db();
        let service = AuthService::new(&db);

        let user = service.signup(&signup_request("a@b.com")).unwrap();
        assert_ne!(user.password, "secret1");
        assert!(user.password.starts_with("$argon2"));

        let stored = UserRepository::new(&db)
            .find_by_email("a@b.com")
            .unwrap()
            .unwrap();
        assert_eq!(stored, user);
        assert_ne!(stored.password, "secret1");
    }

    #[test]
    fn duplicate_signup_fails_and_keeps_one_record() {
        let (db, _dir) = temp_db();
        let service = AuthService::new(&db);

        let first = service.signup(&signup_request("a@b.com")).unwrap();
        let err = service.signup(&signup_request("a@b.com")).unwrap_err();
        assert!(matches!(err, CredentialError::DuplicateEmail(ref e) if e == "a@b.com"));

        let stored = UserRepository::new(&db)
            .find_by_email("a@b.com")
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
    }

    #[test]
    fn mismatched_confirmation_creates_nothing() {
        let (db, _dir) = temp_db();
        let service = AuthService::new(&db);

        let mut request = signup_request("a@b.com");
        request.confirm_password = Some("different".to_string());
        let err = service.signup(&request).unwrap_err();
        assert!(matches!(err, CredentialError::PasswordMismatch(_)));

        assert!(UserRepository::new(&db)
            .find_by_email("a@b.com")
            .unwrap()
            .is_none());
    }

    #[test]
    fn missing_confirmation_creates_nothing() {
        let (db, _dir) = temp_db();
        let service = AuthService::new(&db);

        let mut request = signup_request("a@b.com");
        request.confirm_password = None;
        let err = service.signup(&request).unwrap_err();
        assert!(matches!(err, CredentialError::PasswordMismatch(_)));

        assert!(UserRepository::new(&db)
            .find_by_email("a@b.com")
            .unwrap()
            .is_none());
    }

    #[test]
    fn login_returns_the_matching_record() {
        let (db, _dir) = temp_db();
        let service = AuthService::new(&db);
        service.signup(&signup_request("a@b.com")).unwrap();

        let user = service
            .login(&LoginRequest {
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
            })
            .unwrap();
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn wrong_password_and_unknown_email_fail_alike() {
        let (db, _dir) = temp_db();
        let service = AuthService::new(&db);
        service.signup(&signup_request("a@b.com")).unwrap();

        let wrong_password = service
            .login(&LoginRequest {
                email: "a@b.com".to_string(),
                password: "wrong-1".to_string(),
            })
            .unwrap_err();
        let unknown_email = service
            .login(&LoginRequest {
                email: "ghost@b.com".to_string(),
                password: "secret1".to_string(),
            })
            .unwrap_err();

        assert!(matches!(wrong_password, CredentialError::PasswordMismatch(_)));
        assert!(matches!(unknown_email, CredentialError::PasswordMismatch(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}
