// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-time import of the CSV seed files into empty tables.
//!
//! Seed files may omit optional columns or carry extra ones; rows are mapped onto
//! the canonical column order of the target table before insertion. A single bad
//! row aborts the whole file and leaves the table empty.

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::db::{Persist, Store};
use crate::errors::{LedgerError, Result};
use crate::models::{NewExpense, NewIncome, Table};

#[derive(Debug, Clone)]
pub struct SeedSources {
    pub expenses: PathBuf,
    pub income: PathBuf,
}

impl SeedSources {
    /// `<dir>/expenses.csv` and `<dir>/income.csv`.
    pub fn in_dir(dir: &Path) -> Self {
        SeedSources {
            expenses: dir.join("expenses.csv"),
            income: dir.join("income.csv"),
        }
    }

    pub fn path_for(&self, table: Table) -> &Path {
        match table {
            Table::Expenses => &self.expenses,
            Table::Income => &self.income,
        }
    }
}

/// Rows imported per table; `None` means the table was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub expenses: Option<usize>,
    pub income: Option<usize>,
}

/// Seed each table that is empty and has a seed file present.
pub fn seed_if_empty(store: &mut Store, sources: &SeedSources) -> Result<SeedReport> {
    Ok(SeedReport {
        expenses: seed_table(store, Table::Expenses, sources.path_for(Table::Expenses))?,
        income: seed_table(store, Table::Income, sources.path_for(Table::Income))?,
    })
}

/// Import `path` into `table` when the table is empty and the file exists.
/// Returns the number of imported rows, or `None` if seeding did not run.
pub fn seed_table(store: &mut Store, table: Table, path: &Path) -> Result<Option<usize>> {
    let existing = store.count(table)?;
    if existing > 0 {
        debug!(%table, existing, "table not empty, skipping seed");
        return Ok(None);
    }
    if !path.exists() {
        debug!(%table, path = %path.display(), "no seed file");
        return Ok(None);
    }
    let n = match table {
        Table::Expenses => seed_from::<NewExpense>(store, path)?,
        Table::Income => seed_from::<NewIncome>(store, path)?,
    };
    info!(%table, rows = n, path = %path.display(), "seeded table");
    Ok(Some(n))
}

/// Builds a draft from cells already arranged in canonical column order.
trait FromCells: Persist + Sized {
    fn from_cells(cells: &[Option<String>]) -> Result<Self>;
}

impl FromCells for NewExpense {
    fn from_cells(cells: &[Option<String>]) -> Result<Self> {
        NewExpense::parse(
            required(&cells[0], "date")?,
            cells[1].as_deref(),
            cells[2].as_deref(),
            required(&cells[3], "amount")?,
        )
    }
}

impl FromCells for NewIncome {
    fn from_cells(cells: &[Option<String>]) -> Result<Self> {
        NewIncome::parse(
            required(&cells[0], "date")?,
            cells[1].as_deref(),
            cells[2].as_deref(),
            cells[3].as_deref(),
            required(&cells[4], "amount")?,
        )
    }
}

fn required<'a>(cell: &'a Option<String>, column: &str) -> Result<&'a str> {
    cell.as_deref()
        .ok_or_else(|| LedgerError::Validation(format!("{} is missing", column)))
}

fn seed_from<D: FromCells>(store: &mut Store, path: &Path) -> Result<usize> {
    let drafts = read_drafts::<D>(path)?;
    // Rows already parsed; a failure here belongs to the file as a whole.
    store.insert_batch(&drafts).map_err(|e| LedgerError::Seed {
        path: path.to_path_buf(),
        line: 0,
        reason: e.to_string(),
    })?;
    Ok(drafts.len())
}

fn read_drafts<D: FromCells>(path: &Path) -> Result<Vec<D>> {
    let fail = |line: u64, reason: String| LedgerError::Seed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| fail(0, e.to_string()))?;

    let headers = rdr.headers().map_err(|e| fail(1, e.to_string()))?.clone();
    // Position of each canonical column in the file, if present at all.
    let layout: Vec<Option<usize>> = D::TABLE
        .columns()
        .iter()
        .map(|col| headers.iter().position(|h| h.eq_ignore_ascii_case(col)))
        .collect();

    let mut drafts = Vec::new();
    for result in rdr.records() {
        let rec = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            fail(line, e.to_string())
        })?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let cells: Vec<Option<String>> = layout
            .iter()
            .map(|idx| {
                idx.and_then(|i| rec.get(i))
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect();
        let draft = D::from_cells(&cells).map_err(|e| match e {
            LedgerError::Validation(reason) => fail(line, reason),
            other => fail(line, other.to_string()),
        })?;
        drafts.push(draft);
    }
    Ok(drafts)
}
