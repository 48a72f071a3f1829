// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::Store;
use crate::ledger::{Ledger, PeriodReport};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

use super::range_from_args;

pub const NO_DATA: &str =
    "No data available. Check your SQLite database or the CSV files in the data folder.";

/// The report for the requested period, or `None` when the store holds nothing.
pub fn report_for(
    store: &Store,
    ledger: &mut Ledger,
    sub: &clap::ArgMatches,
) -> Result<Option<PeriodReport>> {
    let snapshot = ledger.load(store)?;
    if snapshot.is_empty() {
        return Ok(None);
    }
    Ok(range_from_args(snapshot, sub)?.map(|range| PeriodReport::build(snapshot, range)))
}

pub fn handle(store: &Store, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let Some(report) = report_for(store, ledger, sub)? else {
        eprintln!("{}", NO_DATA);
        return Ok(());
    };
    for w in &report.warnings {
        eprintln!("warning: {}", w);
    }
    if maybe_print_json(json_flag, &report)? {
        return Ok(());
    }

    println!("Period {} to {}", report.range.start, report.range.end);
    println!(
        "{}",
        pretty_table(
            &["Total Income", "Total Expenses", "Profit"],
            vec![vec![
                fmt_money(&report.total_income),
                fmt_money(&report.total_expenses),
                fmt_money(&report.profit),
            ]],
        )
    );

    if report.categories.is_empty() {
        println!("No categorized expenses available for the selected date range.");
    } else {
        println!("Expense Breakdown by Category");
        let rows = report
            .categories
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.total),
                    format!("{:.1}%", c.percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Total Amount", "Share"], rows));
    }

    if report.income_series.is_empty() {
        println!("No income records available for the selected date range.");
    } else {
        println!("Income Over Time");
        let rows = report
            .income_series
            .iter()
            .map(|(d, amt)| vec![d.to_string(), fmt_money(amt)])
            .collect();
        println!("{}", pretty_table(&["Date", "Amount"], rows));
    }
    Ok(())
}
