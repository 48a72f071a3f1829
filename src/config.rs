// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;

use crate::db::Store;
use crate::seed::{seed_if_empty, SeedReport, SeedSources};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.merrinessfortune", "ExpenseAnalyzer", "expense-analyzer"));

pub const DB_ENV: &str = "EXPENSE_ANALYZER_DB";
pub const DATA_ENV: &str = "EXPENSE_ANALYZER_DATA";
pub const DB_FILE: &str = "business.sqlite";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the database lives and where seed CSVs are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve(db_flag: Option<&str>, data_flag: Option<&str>) -> Result<Self> {
        Self::resolve_with(db_flag, data_flag, |k| std::env::var(k).ok())
    }

    pub fn resolve_with(
        db_flag: Option<&str>,
        data_flag: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let pick = |flag: Option<&str>, key: &str| {
            flag.map(str::to_string)
                .or_else(|| env(key))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let db_path = match pick(db_flag, DB_ENV) {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };
        let data_dir = pick(data_flag, DATA_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Ok(Settings { db_path, data_dir })
    }

    pub fn seed_sources(&self) -> SeedSources {
        SeedSources::in_dir(&self.data_dir)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().join(DB_FILE))
}

/// Open the database, create the schema and seed empty tables.
pub fn open_or_init(settings: &Settings) -> Result<(Store, SeedReport)> {
    let path = &settings.db_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut store = Store::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    store.ensure_schema().context("Create schema")?;
    let report = seed_if_empty(&mut store, &settings.seed_sources())?;
    Ok((store, report))
}
