use std::time::Instant;

use serde::Serialize;

use crate::availability::Availability;
use crate::defaults::{self, LeagueTable};
use crate::engine;
use crate::error::PipelineError;
use crate::partition::{self, DEFAULT_MIN_LEAGUE_ROWS, DroppedLeague};
use crate::projection::{self, DEFAULT_MIN_PLAYING_TIME_90S, PlayerTable};
use crate::table::{RawTable, REQUIRED_IDENTITY_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateOptions {
    pub minimum_league_sample_size: usize,
    /// `None` keeps every player of a qualifying league.
    pub minimum_playing_time_90s: Option<f64>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            minimum_league_sample_size: DEFAULT_MIN_LEAGUE_ROWS,
            minimum_playing_time_90s: Some(DEFAULT_MIN_PLAYING_TIME_90S),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub leagues: LeagueTable,
    pub players: PlayerTable,
    pub dropped: Vec<DroppedLeague>,
    /// Rows ignored for having no competition.
    pub unassigned_rows: usize,
}

pub fn aggregate(raw: &RawTable, options: &AggregateOptions) -> Result<Aggregation, PipelineError> {
    check_identity_columns(raw)?;
    let started = Instant::now();

    let columns = raw.column_set();
    let availability = Availability::resolve(&columns);
    tracing::debug!(
        computable = availability.computable().len(),
        unavailable = availability.unavailable().len(),
        "resolved metric availability"
    );
    let missing = availability.missing_columns(&columns);
    if !missing.is_empty() {
        tracing::debug!(columns = %missing.join(", "), "source columns absent from input");
    }

    let parts = partition::partition_by_league(raw, options.minimum_league_sample_size);
    if parts.unassigned > 0 {
        tracing::warn!(rows = parts.unassigned, "ignoring rows without a competition");
    }

    let derived = engine::derive_all(&parts.kept, &availability);
    let leagues = defaults::fill_defaults(derived);
    let players = projection::project_players(
        raw,
        &parts.league_names(),
        options.minimum_playing_time_90s,
    );

    let defaulted: usize = leagues.rows.iter().map(|r| r.defaulted_count()).sum();
    tracing::info!(
        rows = raw.len(),
        leagues = leagues.len(),
        dropped = parts.dropped.len(),
        players = players.len(),
        defaulted_cells = defaulted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "aggregated league metrics"
    );

    Ok(Aggregation {
        leagues,
        players,
        dropped: parts.dropped,
        unassigned_rows: parts.unassigned,
    })
}

fn check_identity_columns(raw: &RawTable) -> Result<(), PipelineError> {
    let missing: Vec<String> = REQUIRED_IDENTITY_COLUMNS
        .iter()
        .filter(|col| {
            !raw.has_column(col)
                || (!raw.is_empty() && raw.records().iter().all(|r| r.get(col).is_none()))
        })
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingIdentityColumns { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawRecord;

    #[test]
    fn missing_identity_columns_are_listed() {
        let table = RawTable::from_records(vec![
            RawRecord::new().with_text("Player", "a").with_number("KP", 1.0),
        ]);
        let err = aggregate(&table, &AggregateOptions::default()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingIdentityColumns {
                missing: vec!["Competition".to_string(), "Squad".to_string()],
            }
        );
        assert_eq!(err.to_string(), "missing identity columns: Competition, Squad");
    }

    #[test]
    fn empty_table_with_identity_header_aggregates_to_nothing() {
        let table = RawTable::new(
            vec!["Player".into(), "Squad".into(), "Competition".into()],
            Vec::new(),
        );
        let out = aggregate(&table, &AggregateOptions::default()).expect("aggregates");
        assert!(out.leagues.is_empty());
        assert!(out.players.is_empty());
    }
}
