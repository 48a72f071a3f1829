// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::db::Store;
use crate::gateway::Gateway;
use crate::ledger::{filter_by_date, Ledger};
use crate::models::{IncomeEntry, NewIncome};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

use super::{opt_text, range_from_args};

pub fn handle(store: &Store, ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, ledger, sub)?,
        Some(("update", sub)) => update(store, ledger, sub)?,
        Some(("rm", sub)) => remove(store, ledger, sub)?,
        Some(("list", sub)) => list(store, ledger, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewIncome> {
    let field = |name: &str| sub.get_one::<String>(name).map(String::as_str);
    let draft = NewIncome::parse(
        field("date").unwrap_or_default(),
        field("source"),
        field("category"),
        field("description"),
        field("amount").unwrap_or_default(),
    )?;
    Ok(draft)
}

fn add(store: &Store, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let saved = Gateway::new(store, ledger).add_income(draft)?;
    println!(
        "Added income #{} on {}: {}{}",
        saved.id,
        saved.date,
        fmt_money(&saved.amount),
        saved
            .source
            .as_deref()
            .map(|s| format!(" from {}", s))
            .unwrap_or_default()
    );
    Ok(())
}

fn update(store: &Store, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id missing")?;
    let draft = draft_from_args(sub)?;
    let saved = Gateway::new(store, ledger).update_income(id, draft)?;
    println!(
        "Updated income #{}: {} on {}",
        saved.id,
        fmt_money(&saved.amount),
        saved.date
    );
    Ok(())
}

fn remove(store: &Store, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id missing")?;
    Gateway::new(store, ledger).delete_income(id)?;
    println!("Deleted income #{}", id);
    Ok(())
}

fn list(store: &Store, ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let snapshot = ledger.load(store)?;
    let rows: Vec<IncomeEntry> = match range_from_args(snapshot, sub)? {
        Some(range) => filter_by_date(&snapshot.income, range),
        None => Vec::new(),
    };
    if !maybe_print_json(json_flag, &rows)? {
        let data = rows
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.date.to_string(),
                    opt_text(&i.source),
                    opt_text(&i.category),
                    opt_text(&i.description),
                    fmt_money(&i.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Source", "Category", "Description", "Amount"],
                data
            )
        );
    }
    Ok(())
}
