// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod expenses;
pub mod income;
pub mod summary;

use anyhow::Result;

use crate::ledger::{resolve_range, DateRange, Snapshot};
use crate::utils::parse_date;

/// `--from`/`--to`, with missing ends taken from the data.
pub(crate) fn range_from_args(
    snapshot: &Snapshot,
    sub: &clap::ArgMatches,
) -> Result<Option<DateRange>> {
    let start = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let end = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    Ok(resolve_range(snapshot, start, end))
}

pub(crate) fn opt_text(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}
