// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory view over both tables plus the dashboard aggregates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::db::Store;
use crate::errors::Result;
use crate::models::{Expense, IncomeEntry, Record};

/// Label for expenses without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

pub const REVERSED_RANGE_WARNING: &str = "Start date must be before end date.";

/// Full contents of both tables at the time of the last load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub income: Vec<IncomeEntry>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.income.is_empty()
    }
}

/// Cached projection of the store. Call `invalidate` after every write.
#[derive(Debug, Default)]
pub struct Ledger {
    cache: Option<Snapshot>,
    reads: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, reading both tables first if nothing is cached.
    /// A persisted row that no longer parses fails the whole load.
    pub fn load(&mut self, store: &Store) -> Result<&Snapshot> {
        if self.cache.is_none() {
            let expenses = store.scan::<Expense>()?;
            let income = store.scan::<IncomeEntry>()?;
            self.reads += 1;
            debug!(
                expenses = expenses.len(),
                income = income.len(),
                "loaded ledger from store"
            );
            self.cache = Some(Snapshot { expenses, income });
        }
        Ok(self.cache.get_or_insert_with(Snapshot::default))
    }

    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("ledger cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of times `load` has gone to the store.
    pub fn store_reads(&self) -> u64 {
        self.reads
    }
}

/// Closed date interval. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn filter_by_date<R: Record>(records: &[R], range: DateRange) -> Vec<R> {
    if range.is_reversed() {
        warn!(start = %range.start, end = %range.end, "{}", REVERSED_RANGE_WARNING);
    }
    within(records, range)
}

fn within<R: Record>(records: &[R], range: DateRange) -> Vec<R> {
    records
        .iter()
        .filter(|r| range.contains(r.date()))
        .cloned()
        .collect()
}

/// Amounts are capped at `MAX_AMOUNT` on write and on read, so the sum stays
/// far below `Decimal::MAX`.
pub fn total_amount<R: Record>(records: &[R]) -> Decimal {
    records.iter().map(Record::amount).sum()
}

pub fn profit(expenses: &[Expense], income: &[IncomeEntry]) -> Decimal {
    total_amount(income) - total_amount(expenses)
}

/// Sum of expense amounts per category, keyed in sorted order.
pub fn category_totals(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for e in expenses {
        let key = e.category.as_deref().unwrap_or(UNCATEGORIZED).to_string();
        *totals.entry(key).or_insert(Decimal::ZERO) += e.amount;
    }
    totals
}

/// Income amounts by date, ascending. Same-day entries stay separate, in id order.
pub fn income_series(income: &[IncomeEntry]) -> Vec<(NaiveDate, Decimal)> {
    let mut sorted: Vec<&IncomeEntry> = income.iter().collect();
    sorted.sort_by_key(|i| (i.date, i.id));
    sorted.into_iter().map(|i| (i.date, i.amount)).collect()
}

/// Earliest and latest date across both tables.
pub fn date_bounds(expenses: &[Expense], income: &[IncomeEntry]) -> Option<DateRange> {
    let dates = expenses
        .iter()
        .map(|e| e.date)
        .chain(income.iter().map(|i| i.date));
    let (min, max) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })?;
    Some(DateRange::new(min, max))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    /// Share of all expenses in the period, in percent.
    pub percent: Decimal,
}

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub range: DateRange,
    pub expenses: Vec<Expense>,
    pub income: Vec<IncomeEntry>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub profit: Decimal,
    pub categories: Vec<CategoryShare>,
    pub income_series: Vec<(NaiveDate, Decimal)>,
    pub warnings: Vec<String>,
}

impl PeriodReport {
    /// A reversed range is reported through `warnings` only, not logged.
    pub fn build(snapshot: &Snapshot, range: DateRange) -> Self {
        let mut warnings = Vec::new();
        if range.is_reversed() {
            warnings.push(REVERSED_RANGE_WARNING.to_string());
        }
        let expenses = within(&snapshot.expenses, range);
        let income = within(&snapshot.income, range);
        let total_income = total_amount(&income);
        let total_expenses = total_amount(&expenses);
        let categories = category_totals(&expenses)
            .into_iter()
            .map(|(category, total)| CategoryShare {
                percent: percent_of(total, total_expenses),
                category,
                total,
            })
            .collect();
        let income_series = income_series(&income);
        PeriodReport {
            range,
            total_income,
            total_expenses,
            profit: profit(&expenses, &income),
            categories,
            income_series,
            expenses,
            income,
            warnings,
        }
    }
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp(1))
        .unwrap_or(Decimal::ZERO)
}

/// Fill missing bounds from the data. `None` when a bound is missing and both
/// tables are empty.
pub fn resolve_range(
    snapshot: &Snapshot,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<DateRange> {
    match (start, end) {
        (Some(s), Some(e)) => Some(DateRange::new(s, e)),
        _ => {
            let bounds = date_bounds(&snapshot.expenses, &snapshot.income)?;
            Some(DateRange::new(
                start.unwrap_or(bounds.start),
                end.unwrap_or(bounds.end),
            ))
        }
    }
}
