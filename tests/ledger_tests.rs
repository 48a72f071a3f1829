// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use expense_analyzer::db::Store;
use expense_analyzer::errors::LedgerError;
use expense_analyzer::ledger::{
    category_totals, date_bounds, filter_by_date, income_series, profit, resolve_range,
    total_amount, DateRange, Ledger, PeriodReport, Snapshot, REVERSED_RANGE_WARNING,
    UNCATEGORIZED,
};
use expense_analyzer::models::{Expense, IncomeEntry, NewExpense, NewIncome, MAX_AMOUNT};
use expense_analyzer::seed::{seed_if_empty, SeedSources};
use rust_decimal::Decimal;
use std::fs;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn expense(id: i64, date: &str, category: Option<&str>, amount: &str) -> Expense {
    Expense {
        id,
        date: d(date),
        category: category.map(str::to_string),
        description: None,
        amount: dec(amount),
    }
}

fn income(id: i64, date: &str, amount: &str) -> IncomeEntry {
    IncomeEntry {
        id,
        date: d(date),
        source: None,
        category: None,
        description: None,
        amount: dec(amount),
    }
}

fn setup() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    store
}

#[test]
fn january_scenario_from_seed_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("expenses.csv"),
        "date,category,amount\n2024-01-05,Supplies,50\n2024-02-10,Rent,200\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("income.csv"),
        "date,source,amount\n2024-01-20,Etsy,300\n",
    )
    .unwrap();
    let mut store = setup();
    seed_if_empty(&mut store, &SeedSources::in_dir(dir.path())).unwrap();

    let mut ledger = Ledger::new();
    let snapshot = ledger.load(&store).unwrap();
    let january = DateRange::new(d("2024-01-01"), d("2024-01-31"));
    let exp = filter_by_date(&snapshot.expenses, january);
    let inc = filter_by_date(&snapshot.income, january);

    assert_eq!(total_amount(&exp), dec("50"));
    assert_eq!(total_amount(&inc), dec("300"));
    assert_eq!(profit(&exp, &inc), dec("250"));
    let cats = category_totals(&exp);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats["Supplies"], dec("50"));
}

#[test]
fn filter_bounds_are_inclusive() {
    let records = vec![
        expense(1, "2023-12-31", None, "1"),
        expense(2, "2024-01-01", None, "2"),
        expense(3, "2024-01-15", None, "3"),
        expense(4, "2024-01-31", None, "4"),
        expense(5, "2024-02-01", None, "5"),
    ];
    let out = filter_by_date(&records, DateRange::new(d("2024-01-01"), d("2024-01-31")));
    let ids: Vec<i64> = out.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[test]
fn reversed_range_runs_but_warns() {
    let snapshot = Snapshot {
        expenses: vec![expense(1, "2024-01-10", Some("Rent"), "100")],
        income: vec![income(1, "2024-01-10", "80")],
    };
    let range = DateRange::new(d("2024-01-31"), d("2024-01-01"));
    assert!(range.is_reversed());
    assert!(filter_by_date(&snapshot.expenses, range).is_empty());

    let report = PeriodReport::build(&snapshot, range);
    assert_eq!(report.warnings, vec![REVERSED_RANGE_WARNING.to_string()]);
    assert_eq!(report.total_expenses, Decimal::ZERO);
    assert_eq!(report.profit, Decimal::ZERO);
}

#[test]
fn totals_of_empty_sets_are_zero() {
    let none_e: Vec<Expense> = Vec::new();
    let none_i: Vec<IncomeEntry> = Vec::new();
    assert_eq!(total_amount(&none_e), Decimal::ZERO);
    assert_eq!(profit(&none_e, &none_i), Decimal::ZERO);
}

#[test]
fn total_is_order_independent() {
    let mut records = vec![
        expense(1, "2024-01-01", None, "0.10"),
        expense(2, "2024-01-02", None, "0.20"),
        expense(3, "2024-01-03", None, "1234.567"),
    ];
    let forward = total_amount(&records);
    records.reverse();
    assert_eq!(forward, total_amount(&records));
    assert_eq!(forward, dec("1234.867"));
}

#[test]
fn profit_can_go_negative() {
    let exp = vec![expense(1, "2024-01-01", None, "500")];
    let inc = vec![income(1, "2024-01-02", "120.25")];
    assert_eq!(profit(&exp, &inc), dec("-379.75"));
}

#[test]
fn uncategorized_expenses_get_their_own_group() {
    let exp = vec![
        expense(1, "2024-01-01", Some("Supplies"), "10"),
        expense(2, "2024-01-02", None, "7.5"),
        expense(3, "2024-01-03", Some("Supplies"), "5"),
        expense(4, "2024-01-04", None, "2.5"),
    ];
    let cats = category_totals(&exp);
    assert_eq!(cats[UNCATEGORIZED], dec("10"));
    assert_eq!(cats["Supplies"], dec("15"));
    let keys: Vec<&String> = cats.keys().collect();
    assert_eq!(keys, vec!["Supplies", "Uncategorized"]);
}

#[test]
fn income_series_is_sorted_and_keeps_same_day_entries() {
    let inc = vec![
        income(3, "2024-03-01", "30"),
        income(1, "2024-01-20", "300"),
        income(2, "2024-01-20", "45"),
    ];
    let series = income_series(&inc);
    assert_eq!(
        series,
        vec![
            (d("2024-01-20"), dec("300")),
            (d("2024-01-20"), dec("45")),
            (d("2024-03-01"), dec("30")),
        ]
    );
}

#[test]
fn load_is_cached_until_invalidated() {
    let store = setup();
    store
        .insert(&NewExpense::parse("2024-01-05", Some("Supplies"), None, "50").unwrap())
        .unwrap();
    let mut ledger = Ledger::new();
    ledger.load(&store).unwrap();
    ledger.load(&store).unwrap();
    assert_eq!(ledger.store_reads(), 1);

    store
        .insert(&NewIncome::parse("2024-01-20", Some("Etsy"), None, None, "300").unwrap())
        .unwrap();
    assert!(ledger.load(&store).unwrap().income.is_empty());

    ledger.invalidate();
    ledger.invalidate();
    assert!(!ledger.is_cached());
    assert_eq!(ledger.load(&store).unwrap().income.len(), 1);
    ledger.load(&store).unwrap();
    assert_eq!(ledger.store_reads(), 2);
}

#[test]
fn load_fails_closed_on_corrupt_rows() {
    let store = setup();
    store
        .insert(&NewExpense::parse("2024-01-05", None, None, "50").unwrap())
        .unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO income(date, source, amount) VALUES ('2024-13-40', 'Etsy', '300')",
            [],
        )
        .unwrap();
    let mut ledger = Ledger::new();
    let err = ledger.load(&store).unwrap_err();
    assert!(matches!(err, LedgerError::Data { .. }));
    assert!(!ledger.is_cached());
}

#[test]
fn bounds_default_missing_filter_ends() {
    let snapshot = Snapshot {
        expenses: vec![expense(1, "2024-02-10", None, "1")],
        income: vec![income(1, "2024-01-20", "1"), income(2, "2024-03-05", "1")],
    };
    let bounds = date_bounds(&snapshot.expenses, &snapshot.income).unwrap();
    assert_eq!(bounds, DateRange::new(d("2024-01-20"), d("2024-03-05")));

    let range = resolve_range(&snapshot, Some(d("2024-02-01")), None).unwrap();
    assert_eq!(range, DateRange::new(d("2024-02-01"), d("2024-03-05")));

    assert_eq!(resolve_range(&Snapshot::default(), None, None), None);
    assert!(resolve_range(&Snapshot::default(), Some(d("2024-01-01")), Some(d("2024-01-02"))).is_some());
}

#[test]
fn period_report_shares_add_up() {
    let snapshot = Snapshot {
        expenses: vec![
            expense(1, "2024-01-05", Some("Supplies"), "25"),
            expense(2, "2024-01-06", Some("Rent"), "75"),
        ],
        income: vec![income(1, "2024-01-20", "300")],
    };
    let report = PeriodReport::build(&snapshot, DateRange::new(d("2024-01-01"), d("2024-01-31")));
    assert!(report.warnings.is_empty());
    assert_eq!(report.total_income, dec("300"));
    assert_eq!(report.total_expenses, dec("100"));
    assert_eq!(report.profit, dec("200"));
    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.categories[0].category, "Rent");
    assert_eq!(report.categories[0].percent, dec("75"));
    assert_eq!(report.categories[1].percent, dec("25"));
    assert_eq!(report.income_series.len(), 1);
}

#[test]
fn largest_allowed_amounts_aggregate_without_overflow() {
    let max = MAX_AMOUNT.to_string();
    let snapshot = Snapshot {
        expenses: vec![
            expense(1, "2024-01-05", Some("Rent"), &max),
            expense(2, "2024-01-06", Some("Rent"), &max),
            expense(3, "2024-01-07", Some("Supplies"), &max),
            expense(4, "2024-01-08", None, &max),
        ],
        income: vec![income(1, "2024-01-20", &max)],
    };
    let report = PeriodReport::build(&snapshot, DateRange::new(d("2024-01-01"), d("2024-01-31")));
    assert_eq!(report.total_expenses, MAX_AMOUNT * Decimal::from(4));
    assert_eq!(report.profit, -(MAX_AMOUNT * Decimal::from(3)));
    let shares: Vec<Decimal> = report.categories.iter().map(|c| c.percent).collect();
    assert_eq!(shares, vec![dec("50"), dec("25"), dec("25")]);
}

#[test]
fn shares_round_to_one_decimal() {
    let snapshot = Snapshot {
        expenses: vec![
            expense(1, "2024-01-05", Some("A"), "1"),
            expense(2, "2024-01-06", Some("B"), "2"),
        ],
        income: Vec::new(),
    };
    let report = PeriodReport::build(&snapshot, DateRange::new(d("2024-01-01"), d("2024-01-31")));
    assert_eq!(report.categories[0].percent, dec("33.3"));
    assert_eq!(report.categories[1].percent, dec("66.7"));
}
