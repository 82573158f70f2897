// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: persistence of email/password-hash records.
//!
//! Email uniqueness is enforced by the `users_by_email` index row, written
//! in the same transaction as the user row itself.

use chrono::Utc;
use redb::ReadableTable;

use super::super::database::{
    next_id, Database, StoreError, StoreResult, COUNTERS, USERS, USERS_BY_EMAIL,
};
use crate::models::User;

/// Input record for creating a credential row. `password_hash` must already
/// be the one-way hash, never the plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

/// Repository for credential records.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Look up a user by exact email match.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USERS_BY_EMAIL)?;

        let Some(id) = index.get(email)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => {
                tracing::warn!(email, id, "email index points at a missing user row");
                Ok(None)
            }
        }
    }

    /// Persist a new credential record, assigning its id.
    ///
    /// Fails with [`StoreError::EmailTaken`] if the email already has an
    /// index row; the check and both inserts share one write transaction.
    pub fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut index = write_txn.open_table(USERS_BY_EMAIL)?;
            if index.get(new_user.email.as_str())?.is_some() {
                return Err(StoreError::EmailTaken(new_user.email));
            }

            let mut counters = write_txn.open_table(COUNTERS)?;
            let id = next_id(&mut counters, "users")?;
            drop(counters);

            let user = User {
                id,
                email: new_user.email,
                password: new_user.password_hash,
                name: new_user.name,
                created_at: Utc::now(),
            };

            let mut users = write_txn.open_table(USERS)?;
            users.insert(id as u64, serde_json::to_vec(&user)?.as_slice())?;
            index.insert(user.email.as_str(), id as u64)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
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

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            name: None,
        }
    }

    #[test]
    fn create_then_find_by_email() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let created = repo.create(new_user("a@b.com")).unwrap();
        assert_eq!(created.id, 1);

        let found = repo.find_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn find_unknown_email_returns_none() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        assert!(repo.find_by_email("nobody@b.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let first = repo.create(new_user("a@b.com")).unwrap();
        let err = repo.create(new_user("a@b.com")).unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken(ref email) if email == "a@b.com"));

        // The original row is untouched.
        let found = repo.find_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn emails_are_matched_exactly() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        repo.create(new_user("a@b.com")).unwrap();
        assert!(repo.find_by_email("A@B.COM").unwrap().is_none());
    }
}
