// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn range_args() -> [Arg; 2] {
    [
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("Start date (inclusive); defaults to the earliest record"),
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("End date (inclusive); defaults to the latest record"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn expense_fields() -> Vec<Arg> {
    vec![
        Arg::new("date").long("date").required(true),
        Arg::new("amount")
            .long("amount")
            .required(true)
            .allow_hyphen_values(true),
        Arg::new("category").long("category"),
        Arg::new("description").long("description"),
    ]
}

fn income_fields() -> Vec<Arg> {
    let mut fields = expense_fields();
    fields.insert(2, Arg::new("source").long("source"));
    fields
}

pub fn build_cli() -> Command {
    Command::new("expense-analyzer")
        .version(crate_version!())
        .about("Income and expense dashboard over a local SQLite database")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database file (env: EXPENSE_ANALYZER_DB)"),
        )
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .value_name("DIR")
                .help("Directory holding expenses.csv and income.csv seed files (env: EXPENSE_ANALYZER_DATA)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("init").about("Create the database and seed empty tables"))
        .subcommand(
            Command::new("summary")
                .about("Totals, profit, category breakdown and income over time")
                .args(range_args())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage expense records")
                .subcommand_required(true)
                .subcommand(Command::new("add").args(expense_fields()))
                .subcommand(Command::new("update").arg(id_arg()).args(expense_fields()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("list").args(range_args()).arg(json_flag())),
        )
        .subcommand(
            Command::new("income")
                .about("Manage income records")
                .subcommand_required(true)
                .subcommand(Command::new("add").args(income_fields()))
                .subcommand(Command::new("update").arg(id_arg()).args(income_fields()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("list").args(range_args()).arg(json_flag())),
        )
}
