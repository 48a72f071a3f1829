// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::Table;

/// Failures surfaced by the store, the seeding adapter and the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad input at write time: negative amount, unparseable date or number.
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No {table} record with id {id}")]
    NotFound { table: Table, id: i64 },
    /// A row of a seed file could not be imported; nothing from that file was kept.
    #[error("Cannot seed from {} (line {line}): {reason}", path.display())]
    Seed {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    /// A persisted row no longer parses. The store needs operator attention.
    #[error("Corrupt {table} record {id}: {reason}")]
    Data {
        table: Table,
        id: i64,
        reason: String,
    },
    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
