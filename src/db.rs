// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store: the `expenses` and `income` tables in SQLite.
//!
//! Dates are kept as `YYYY-MM-DD` text and amounts as decimal text. Rows written
//! by other tools (REAL amounts, datetime text) are still readable.

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;

use crate::errors::{LedgerError, Result};
use crate::models::{
    check_amount, Draft, Expense, IncomeEntry, NewExpense, NewIncome, Record, Table,
};
use crate::utils::{parse_date, DATE_FMT};

/// Drafts that know how to bind themselves in canonical column order.
pub trait Persist: Draft {
    fn values(&self) -> Vec<Value>;
}

/// Records that can be rebuilt from a `SELECT id, <columns>` row.
pub trait FromRow: Record + Sized {
    fn from_row(row: &Row<'_>) -> Result<Self>;
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Store {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Store {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Store { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create both tables if absent. Existing tables are left untouched.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
        CREATE TABLE IF NOT EXISTS expenses(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            category TEXT,
            description TEXT,
            amount TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

        CREATE TABLE IF NOT EXISTS income(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            source TEXT,
            category TEXT,
            description TEXT,
            amount TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);
        "#,
        )?;
        Ok(())
    }

    pub fn count(&self, table: Table) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        Ok(self.conn.query_row(&sql, [], |r| r.get(0))?)
    }

    /// Persist one record and return its newly assigned id.
    pub fn insert<D: Persist>(&self, draft: &D) -> Result<i64> {
        draft.validate()?;
        self.conn
            .execute(&insert_sql(D::TABLE), params_from_iter(draft.values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert every draft in one transaction; the first failure rolls all of them back.
    pub fn insert_batch<D: Persist>(&mut self, drafts: &[D]) -> Result<Vec<i64>> {
        for d in drafts {
            d.validate()?;
        }
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(drafts.len());
        {
            let mut stmt = tx.prepare(&insert_sql(D::TABLE))?;
            for d in drafts {
                stmt.execute(params_from_iter(d.values()))?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Replace the full row with this id.
    pub fn update<D: Persist>(&self, id: i64, draft: &D) -> Result<()> {
        draft.validate()?;
        let table = D::TABLE;
        let cols = table.columns();
        let assignments: Vec<String> = cols
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}=?{}", c, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id=?{}",
            table.name(),
            assignments.join(", "),
            cols.len() + 1
        );
        let mut values = draft.values();
        values.push(Value::Integer(id));
        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(LedgerError::NotFound { table, id });
        }
        Ok(())
    }

    pub fn delete(&self, table: Table, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id=?1", table.name());
        let changed = self.conn.execute(&sql, params![id])?;
        if changed == 0 {
            return Err(LedgerError::NotFound { table, id });
        }
        Ok(())
    }

    pub fn get<R: FromRow>(&self, id: i64) -> Result<R> {
        let sql = format!("{} WHERE id=?1", select_sql(R::TABLE));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => R::from_row(row),
            None => Err(LedgerError::NotFound {
                table: R::TABLE,
                id,
            }),
        }
    }

    /// All rows of the record's table, ordered by id.
    pub fn scan<R: FromRow>(&self) -> Result<Vec<R>> {
        let sql = format!("{} ORDER BY id", select_sql(R::TABLE));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(R::from_row(row)?);
        }
        Ok(out)
    }
}

fn insert_sql(table: Table) -> String {
    let cols = table.columns();
    let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {}({}) VALUES ({})",
        table.name(),
        cols.join(", "),
        placeholders.join(", ")
    )
}

fn select_sql(table: Table) -> String {
    format!("SELECT id, {} FROM {}", table.columns().join(", "), table.name())
}

fn text(v: &Option<String>) -> Value {
    match v {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

fn corrupt(table: Table, id: i64, reason: impl Into<String>) -> LedgerError {
    LedgerError::Data {
        table,
        id,
        reason: reason.into(),
    }
}

fn date_at(table: Table, id: i64, row: &Row<'_>, idx: usize) -> Result<chrono::NaiveDate> {
    let raw: Option<String> = row
        .get(idx)
        .map_err(|e| corrupt(table, id, format!("unreadable date: {}", e)))?;
    let raw = raw.ok_or_else(|| corrupt(table, id, "date is missing"))?;
    parse_date(&raw).map_err(|_| corrupt(table, id, format!("unparseable date '{}'", raw)))
}

fn amount_at(table: Table, id: i64, row: &Row<'_>, idx: usize) -> Result<Decimal> {
    let amount = match row.get_ref(idx)? {
        ValueRef::Integer(i) => Decimal::from(i),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map_err(|_| corrupt(table, id, format!("amount {} is not representable", f)))?,
        ValueRef::Text(t) => {
            let s = String::from_utf8_lossy(t);
            s.trim()
                .parse::<Decimal>()
                .map_err(|_| corrupt(table, id, format!("unparseable amount '{}'", s)))?
        }
        ValueRef::Null | ValueRef::Blob(_) => return Err(corrupt(table, id, "amount is missing")),
    };
    check_amount(amount).map_err(|reason| corrupt(table, id, reason))?;
    Ok(amount)
}

impl Persist for NewExpense {
    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.date.format(DATE_FMT).to_string()),
            text(&self.category),
            text(&self.description),
            Value::Text(self.amount.to_string()),
        ]
    }
}

impl Persist for NewIncome {
    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.date.format(DATE_FMT).to_string()),
            text(&self.source),
            text(&self.category),
            text(&self.description),
            Value::Text(self.amount.to_string()),
        ]
    }
}

impl FromRow for Expense {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        let id: i64 = row.get(0)?;
        let t = Table::Expenses;
        Ok(Expense {
            id,
            date: date_at(t, id, row, 1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            amount: amount_at(t, id, row, 4)?,
        })
    }
}

impl FromRow for IncomeEntry {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        let id: i64 = row.get(0)?;
        let t = Table::Income;
        Ok(IncomeEntry {
            id,
            date: date_at(t, id, row, 1)?,
            source: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            amount: amount_at(t, id, row, 5)?,
        })
    }
}
