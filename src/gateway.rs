// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Validated write path. Every successful write invalidates the ledger cache
//! before returning; a failed write leaves the cache alone.

use tracing::info;

use crate::db::{Persist, Store};
use crate::errors::Result;
use crate::ledger::Ledger;
use crate::models::{Expense, IncomeEntry, NewExpense, NewIncome, Table};

pub struct Gateway<'a> {
    store: &'a Store,
    ledger: &'a mut Ledger,
}

impl<'a> Gateway<'a> {
    pub fn new(store: &'a Store, ledger: &'a mut Ledger) -> Self {
        Gateway { store, ledger }
    }

    pub fn add_expense(&mut self, draft: NewExpense) -> Result<Expense> {
        self.add(draft)
    }

    pub fn update_expense(&mut self, id: i64, draft: NewExpense) -> Result<Expense> {
        self.update(id, draft)
    }

    pub fn delete_expense(&mut self, id: i64) -> Result<()> {
        self.delete(Table::Expenses, id)
    }

    pub fn add_income(&mut self, draft: NewIncome) -> Result<IncomeEntry> {
        self.add(draft)
    }

    pub fn update_income(&mut self, id: i64, draft: NewIncome) -> Result<IncomeEntry> {
        self.update(id, draft)
    }

    pub fn delete_income(&mut self, id: i64) -> Result<()> {
        self.delete(Table::Income, id)
    }

    fn add<D: Persist>(&mut self, draft: D) -> Result<D::Saved> {
        draft.validate()?;
        let id = self.store.insert(&draft)?;
        self.ledger.invalidate();
        let table = D::TABLE;
        info!(%table, id, "record added");
        Ok(draft.with_id(id))
    }

    fn update<D: Persist>(&mut self, id: i64, draft: D) -> Result<D::Saved> {
        draft.validate()?;
        self.store.update(id, &draft)?;
        self.ledger.invalidate();
        let table = D::TABLE;
        info!(%table, id, "record updated");
        Ok(draft.with_id(id))
    }

    fn delete(&mut self, table: Table, id: i64) -> Result<()> {
        self.store.delete(table, id)?;
        self.ledger.invalidate();
        info!(%table, id, "record deleted");
        Ok(())
    }
}
