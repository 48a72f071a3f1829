// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use expense_analyzer::config::{self, Settings};
use expense_analyzer::errors::LedgerError;
use expense_analyzer::ledger::Ledger;
use expense_analyzer::{cli, commands, utils};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    utils::init_tracing(matches.get_flag("verbose"));

    let settings = Settings::resolve(
        matches.get_one::<String>("db").map(String::as_str),
        matches.get_one::<String>("data_dir").map(String::as_str),
    )?;
    let (store, seeded) = config::open_or_init(&settings)?;
    let mut ledger = Ledger::new();

    let outcome = match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", settings.db_path.display());
            for (label, rows) in [("expenses", seeded.expenses), ("income", seeded.income)] {
                if let Some(n) = rows {
                    println!("Seeded {} {} rows from {}", n, label, settings.data_dir.display());
                }
            }
            Ok(())
        }
        Some(("summary", sub)) => commands::summary::handle(&store, &mut ledger, sub),
        Some(("expense", sub)) => commands::expenses::handle(&store, &mut ledger, sub),
        Some(("income", sub)) => commands::income::handle(&store, &mut ledger, sub),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        let corrupt = e
            .chain()
            .any(|c| matches!(c.downcast_ref::<LedgerError>(), Some(LedgerError::Data { .. })));
        if corrupt {
            eprintln!(
                "The database at {} holds records that cannot be read. Repair or restore it before continuing.",
                settings.db_path.display()
            );
        }
    }
    outcome
}
