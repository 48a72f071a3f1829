// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{LedgerError, Result};
use crate::utils::{clean_text, parse_date, parse_decimal};

/// The two persisted record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Expenses,
    Income,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Expenses => "expenses",
            Table::Income => "income",
        }
    }

    /// Canonical column order, without the id.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Expenses => &["date", "category", "description", "amount"],
            Table::Income => &["date", "source", "category", "description", "amount"],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub source: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
}

/// Expense fields as entered, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncome {
    pub date: NaiveDate,
    pub source: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
}

/// Largest amount a single record may carry (one trillion). Keeps every
/// aggregate well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Read access shared by persisted records of either table.
pub trait Record: Clone {
    const TABLE: Table;

    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
}

/// A record body without an id; what inserts and full-row updates take.
pub trait Draft {
    const TABLE: Table;
    type Saved: Record;

    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
    fn with_id(self, id: i64) -> Self::Saved;

    /// Amount must lie in `0..=MAX_AMOUNT`. Text fields are free-form and optional.
    fn validate(&self) -> Result<()> {
        check_amount(self.amount()).map_err(LedgerError::Validation)
    }
}

/// Shared by write-time validation and the store's read path.
pub fn check_amount(amount: Decimal) -> std::result::Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("amount must not be negative, got {}", amount));
    }
    if amount > MAX_AMOUNT {
        return Err(format!("amount {} exceeds the limit of {}", amount, MAX_AMOUNT));
    }
    Ok(())
}

impl Record for Expense {
    const TABLE: Table = Table::Expenses;

    fn date(&self) -> NaiveDate {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Record for IncomeEntry {
    const TABLE: Table = Table::Income;

    fn date(&self) -> NaiveDate {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Draft for NewExpense {
    const TABLE: Table = Table::Expenses;
    type Saved = Expense;

    fn date(&self) -> NaiveDate {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn with_id(self, id: i64) -> Expense {
        Expense {
            id,
            date: self.date,
            category: self.category,
            description: self.description,
            amount: self.amount,
        }
    }
}

impl Draft for NewIncome {
    const TABLE: Table = Table::Income;
    type Saved = IncomeEntry;

    fn date(&self) -> NaiveDate {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn with_id(self, id: i64) -> IncomeEntry {
        IncomeEntry {
            id,
            date: self.date,
            source: self.source,
            category: self.category,
            description: self.description,
            amount: self.amount,
        }
    }
}

impl NewExpense {
    /// Build from raw form fields. Rejects unparseable dates and amounts and
    /// negative amounts with `LedgerError::Validation`.
    pub fn parse(
        date: &str,
        category: Option<&str>,
        description: Option<&str>,
        amount: &str,
    ) -> Result<Self> {
        let draft = NewExpense {
            date: parse_date(date)?,
            category: clean_text(category),
            description: clean_text(description),
            amount: parse_decimal(amount)?,
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl NewIncome {
    pub fn parse(
        date: &str,
        source: Option<&str>,
        category: Option<&str>,
        description: Option<&str>,
        amount: &str,
    ) -> Result<Self> {
        let draft = NewIncome {
            date: parse_date(date)?,
            source: clean_text(source),
            category: clean_text(category),
            description: clean_text(description),
            amount: parse_decimal(amount)?,
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl From<Expense> for NewExpense {
    fn from(e: Expense) -> Self {
        NewExpense {
            date: e.date,
            category: e.category,
            description: e.description,
            amount: e.amount,
        }
    }
}

impl From<IncomeEntry> for NewIncome {
    fn from(i: IncomeEntry) -> Self {
        NewIncome {
            date: i.date,
            source: i.source,
            category: i.category,
            description: i.description,
            amount: i.amount,
        }
    }
}
