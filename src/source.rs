use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::http_client;
use crate::synthetic;
use crate::table::RawTable;

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/ashmeetanand13/footy_world/main/df_clean.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
    Synthetic { seed: u64 },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "url {url}"),
            DataSource::File(path) => write!(f, "file {}", path.display()),
            DataSource::Synthetic { seed } => write!(f, "synthetic (seed {seed})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub attempts: usize,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedData {
    pub table: RawTable,
    /// True when the requested source failed and synthetic rows were substituted.
    pub used_fallback: bool,
    pub source: DataSource,
}

pub fn load(source: &DataSource, fetch: &FetchOptions) -> Result<RawTable> {
    let table = match source {
        DataSource::Url(url) => {
            let body = http_client::fetch_text(url, fetch.attempts, fetch.timeout)
                .with_context(|| format!("failed to fetch {url}"))?;
            RawTable::from_csv_reader(body.as_bytes())
                .with_context(|| format!("invalid csv from {url}"))?
        }
        DataSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            RawTable::from_csv_reader(file)
                .with_context(|| format!("invalid csv in {}", path.display()))?
        }
        DataSource::Synthetic { seed } => synthetic::generate(*seed),
    };
    if table.is_empty() {
        return Err(anyhow!("no player rows in {source}"));
    }
    tracing::info!(%source, rows = table.len(), columns = table.columns().len(), "loaded raw table");
    Ok(table)
}

/// Loads `source`, substituting synthetic data generated from `seed` when it fails.
pub fn load_with_fallback(source: &DataSource, fetch: &FetchOptions, seed: u64) -> LoadedData {
    match load(source, fetch) {
        Ok(table) => LoadedData {
            table,
            used_fallback: false,
            source: source.clone(),
        },
        Err(err) => {
            tracing::warn!(%source, error = %format!("{err:#}"), "falling back to synthetic data");
            let fallback = DataSource::Synthetic { seed };
            LoadedData {
                table: synthetic::generate(seed),
                used_fallback: true,
                source: fallback,
            }
        }
    }
}
