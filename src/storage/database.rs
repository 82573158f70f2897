// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded database handle and table definitions.

use std::path::Path;

use redb::{ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary user table: id → serialized user record (JSON bytes).
pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Uniqueness index: email → user id. Written in the same transaction as
/// the user row; an existing entry means the email is taken.
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_email");

/// Primary specification table: id → serialized scalar fields (JSON bytes).
pub(crate) const SPECIFICATIONS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("specifications");

/// Owned section rows: composite key `spec_id_be ++ position_be` → JSON.
/// The big-endian layout keeps a specification's sections contiguous and in
/// payload order, so listing is a prefix range scan and cascade delete is a
/// range delete.
pub(crate) const SECTIONS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("sections");

/// Sequence table: name → last issued value. Surrogate integer ids come
/// from here, incremented inside the caller's write transaction.
pub(crate) const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("email already exists: {0}")]
    EmailTaken(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Database
// =============================================================================

/// Handle to the embedded ACID database.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(SPECIFICATIONS)?;
            let _ = write_txn.open_table(SECTIONS)?;
            let _ = write_txn.open_table(COUNTERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Verify the database file is readable. Used by the readiness probe.
    pub fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS)?;
        let _ = table.get("users")?;
        Ok(())
    }

    pub(crate) fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }
}

/// Issue the next id from a named sequence.
///
/// The increment is visible only when the caller's transaction commits, so
/// an aborted insert never burns an id.
pub(crate) fn next_id(
    counters: &mut redb::Table<'_, &str, u64>,
    sequence: &str,
) -> StoreResult<i64> {
    let next = counters.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    counters.insert(sequence, next)?;
    Ok(next as i64)
}
