// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;
use std::sync::Once;

use crate::errors::{LedgerError, Result};

/// Canonical on-disk date format.
pub const DATE_FMT: &str = "%Y-%m-%d";

const DATE_FORMATS: [&str; 3] = [DATE_FMT, "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

static TRACING_INIT: Once = Once::new();

/// Install the global fmt subscriber. `RUST_LOG` wins over the default directive.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let default = if verbose {
            "expense_analyzer=debug"
        } else {
            "expense_analyzer=warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}

/// Parse a calendar date. Datetime input keeps only the date part.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return Ok(d);
        }
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Ok(dt.date());
        }
    }
    Err(LedgerError::Validation(format!(
        "Invalid date '{}', expected YYYY-MM-DD",
        s
    )))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| LedgerError::Validation(format!("Invalid amount '{}'", s)))
}

/// Trim optional text; blank becomes `None`.
pub fn clean_text(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `$1,234.56`, with a leading minus for negative values.
pub fn fmt_money(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    let s = format!("{:.2}", rounded.abs());
    let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
