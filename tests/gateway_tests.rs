// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use expense_analyzer::db::Store;
use expense_analyzer::errors::LedgerError;
use expense_analyzer::gateway::Gateway;
use expense_analyzer::ledger::Ledger;
use expense_analyzer::models::{NewExpense, NewIncome, Table};
use rust_decimal::Decimal;

fn setup() -> (Store, Ledger) {
    let store = Store::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    (store, Ledger::new())
}

fn rent(amount: &str) -> NewExpense {
    NewExpense {
        amount: amount.parse().unwrap(),
        ..NewExpense::parse("2024-02-10", Some("Rent"), Some("February"), "0").unwrap()
    }
}

#[test]
fn add_is_visible_on_next_load() {
    let (store, mut ledger) = setup();
    assert!(ledger.load(&store).unwrap().expenses.is_empty());

    let saved = Gateway::new(&store, &mut ledger).add_expense(rent("200")).unwrap();
    assert!(saved.id > 0);
    assert!(!ledger.is_cached());

    let snapshot = ledger.load(&store).unwrap();
    assert_eq!(snapshot.expenses, vec![saved]);
}

#[test]
fn update_returns_the_new_row_and_invalidates() {
    let (store, mut ledger) = setup();
    let added = Gateway::new(&store, &mut ledger)
        .add_income(NewIncome::parse("2024-01-20", Some("Etsy"), None, None, "300").unwrap())
        .unwrap();
    ledger.load(&store).unwrap();

    let replacement = NewIncome::parse("2024-01-21", Some("Market"), Some("Sales"), None, "310").unwrap();
    let updated = Gateway::new(&store, &mut ledger)
        .update_income(added.id, replacement)
        .unwrap();
    assert_eq!(updated.id, added.id);
    assert_eq!(updated.source.as_deref(), Some("Market"));

    let snapshot = ledger.load(&store).unwrap();
    assert_eq!(snapshot.income, vec![updated]);
    assert_eq!(snapshot.income[0].amount, Decimal::new(310, 0));
}

#[test]
fn failed_writes_leave_the_cache_alone() {
    let (store, mut ledger) = setup();
    ledger.load(&store).unwrap();

    let negative = NewExpense {
        amount: Decimal::new(-5, 0),
        ..rent("1")
    };
    let err = Gateway::new(&store, &mut ledger)
        .add_expense(negative)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(ledger.is_cached());

    let err = Gateway::new(&store, &mut ledger)
        .update_expense(7, rent("10"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { id: 7, .. }));
    assert!(ledger.is_cached());

    let err = Gateway::new(&store, &mut ledger).delete_income(3).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            table: Table::Income,
            id: 3
        }
    ));
    assert!(ledger.is_cached());
    assert_eq!(ledger.store_reads(), 1);
}

#[test]
fn delete_removes_the_row() {
    let (store, mut ledger) = setup();
    let mut gw = Gateway::new(&store, &mut ledger);
    let a = gw.add_expense(rent("200")).unwrap();
    let b = gw.add_expense(rent("210")).unwrap();
    gw.delete_expense(a.id).unwrap();
    assert!(matches!(
        gw.delete_expense(a.id).unwrap_err(),
        LedgerError::NotFound { .. }
    ));
    drop(gw);

    let snapshot = ledger.load(&store).unwrap();
    assert_eq!(snapshot.expenses.len(), 1);
    assert_eq!(snapshot.expenses[0].id, b.id);
    assert_eq!(store.count(Table::Expenses).unwrap(), 1);
}

#[test]
fn parse_rejects_bad_form_input() {
    assert!(matches!(
        NewExpense::parse("2024-02-30", None, None, "5"),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        NewExpense::parse("2024-02-10", None, None, "five"),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        NewIncome::parse("2024-02-10", None, None, None, "-0.01"),
        Err(LedgerError::Validation(_))
    ));
    let blank = NewExpense::parse(" 2024-02-10 ", Some("  "), Some(""), "0").unwrap();
    assert_eq!(blank.category, None);
    assert_eq!(blank.description, None);
    assert_eq!(blank.amount, Decimal::ZERO);
}

#[test]
fn oversized_amount_is_rejected_before_the_store() {
    let (store, mut ledger) = setup();
    ledger.load(&store).unwrap();
    let err = Gateway::new(&store, &mut ledger)
        .add_expense(rent("1000000000000000000000000000"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(ref m) if m.contains("exceeds")));
    assert!(ledger.is_cached());
    assert_eq!(store.count(Table::Expenses).unwrap(), 0);
}
