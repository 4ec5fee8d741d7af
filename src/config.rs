use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::partition::DEFAULT_MIN_LEAGUE_ROWS;
use crate::pipeline::AggregateOptions;
use crate::projection::DEFAULT_MIN_PLAYING_TIME_90S;
use crate::source::{DEFAULT_DATA_URL, DataSource, FetchOptions};
use crate::synthetic::DEFAULT_SEED;

pub const DEFAULT_OUT_DIR: &str = "league_output";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_url: String,
    pub data_file: Option<PathBuf>,
    pub options: AggregateOptions,
    pub seed: u64,
    pub fetch: FetchOptions,
    pub out_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            data_file: None,
            options: AggregateOptions::default(),
            seed: DEFAULT_SEED,
            fetch: FetchOptions::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` and `.env` when present, then reads the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let data_url = var("LEAGUE_DATA_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
        let data_file = var("LEAGUE_DATA_FILE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let minimum_league_sample_size = var("LEAGUE_MIN_SAMPLE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MIN_LEAGUE_ROWS)
            .max(1);
        let minimum_playing_time_90s = match var("MIN_PLAYING_TIME_90S") {
            Some(v) => parse_playing_time(&v),
            None => Some(DEFAULT_MIN_PLAYING_TIME_90S),
        };
        let seed = var("SYNTHETIC_SEED")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEED);
        let timeout = var("FETCH_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(30)
            .max(1);
        let attempts = var("FETCH_ATTEMPTS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(3)
            .clamp(1, 10);
        let out_dir = var("ANALYZER_OUT_DIR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

        Self {
            data_url,
            data_file,
            options: AggregateOptions {
                minimum_league_sample_size,
                minimum_playing_time_90s,
            },
            seed,
            fetch: FetchOptions {
                attempts,
                timeout: Duration::from_secs(timeout),
            },
            out_dir,
        }
    }

    /// A local file wins over the remote URL.
    pub fn source(&self) -> DataSource {
        match &self.data_file {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::Url(self.data_url.clone()),
        }
    }
}

/// `off`, `none` and `0` disable the filter; an unparsable value keeps the default.
fn parse_playing_time(raw: &str) -> Option<f64> {
    let v = raw.trim().to_ascii_lowercase();
    match v.as_str() {
        "off" | "none" | "disabled" => None,
        _ => match v.parse::<f64>() {
            Ok(n) if n > 0.0 => Some(n),
            Ok(_) => None,
            Err(_) => Some(DEFAULT_MIN_PLAYING_TIME_90S),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(from_map(&[]), AppConfig::default());
    }

    #[test]
    fn env_values_override_defaults() {
        let cfg = from_map(&[
            ("LEAGUE_MIN_SAMPLE", "4"),
            ("MIN_PLAYING_TIME_90S", "off"),
            ("SYNTHETIC_SEED", "9"),
            ("LEAGUE_DATA_FILE", "players.csv"),
            ("FETCH_ATTEMPTS", "50"),
        ]);
        assert_eq!(cfg.options.minimum_league_sample_size, 4);
        assert_eq!(cfg.options.minimum_playing_time_90s, None);
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.fetch.attempts, 10);
        assert_eq!(cfg.source(), DataSource::File(PathBuf::from("players.csv")));
    }

    #[test]
    fn playing_time_parsing() {
        assert_eq!(parse_playing_time("2.5"), Some(2.5));
        assert_eq!(parse_playing_time("0"), None);
        assert_eq!(parse_playing_time("NONE"), None);
        assert_eq!(parse_playing_time("abc"), Some(DEFAULT_MIN_PLAYING_TIME_90S));
    }
}
