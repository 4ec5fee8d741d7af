use std::collections::HashSet;

use serde::Serialize;

use crate::catalog;
use crate::formula::PLAYING_TIME_90S;
use crate::table::{
    COMPETITION_COLUMN, PLAYER_COLUMN, POSITION_COLUMN, RawRecord, RawTable, SQUAD_COLUMN,
};

pub const DEFAULT_MIN_PLAYING_TIME_90S: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub player: String,
    pub squad: String,
    pub competition: String,
    pub position: Option<String>,
    /// Aligned with `PlayerTable::columns`; a missing input cell stays `None`.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTable {
    pub columns: Vec<&'static str>,
    pub records: Vec<PlayerRecord>,
}

impl PlayerTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| *c == column)
    }

    pub fn value(&self, record: &PlayerRecord, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| *c == column)?;
        record.values.get(idx).copied().flatten()
    }
}

/// Identity fields plus every known metric column present in `raw`, for rows of
/// qualifying leagues only, in input order.
pub fn project_players(
    raw: &RawTable,
    leagues: &HashSet<&str>,
    minimum_playing_time_90s: Option<f64>,
) -> PlayerTable {
    let present = raw.column_set();
    let columns: Vec<&'static str> = catalog::player_metric_columns()
        .iter()
        .copied()
        .filter(|c| present.contains(c))
        .collect();
    let threshold = minimum_playing_time_90s.filter(|_| present.contains(PLAYING_TIME_90S));

    let records = raw
        .records()
        .iter()
        .filter(|r| {
            r.text(COMPETITION_COLUMN)
                .is_some_and(|league| leagues.contains(league.as_str()))
        })
        .filter(|r| match threshold {
            Some(min) => r.number(PLAYING_TIME_90S).unwrap_or(0.0) >= min,
            None => true,
        })
        .map(|r| project_record(r, &columns))
        .collect();

    PlayerTable { columns, records }
}

fn project_record(record: &RawRecord, columns: &[&'static str]) -> PlayerRecord {
    PlayerRecord {
        player: record.text(PLAYER_COLUMN).unwrap_or_default(),
        squad: record.text(SQUAD_COLUMN).unwrap_or_default(),
        competition: record.text(COMPETITION_COLUMN).unwrap_or_default(),
        position: record.text(POSITION_COLUMN),
        values: columns.iter().map(|c| record.number(c)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, league: &str, nineties: Option<f64>) -> RawRecord {
        let mut r = RawRecord::new()
            .with_text("Player", name)
            .with_text("Squad", "S")
            .with_text("Competition", league)
            .with_number("KP", 3.0);
        if let Some(n) = nineties {
            r = r.with_number(PLAYING_TIME_90S, n);
        }
        r
    }

    #[test]
    fn playing_time_filter_treats_missing_as_zero() {
        let table = RawTable::from_records(vec![
            row("a", "L", Some(6.0)),
            row("b", "L", Some(4.9)),
            row("c", "L", None),
            row("d", "Other", Some(30.0)),
        ]);
        let leagues: HashSet<&str> = ["L"].into_iter().collect();

        let filtered = project_players(&table, &leagues, Some(5.0));
        let names: Vec<&str> = filtered.records.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["a"]);

        let unfiltered = project_players(&table, &leagues, None);
        assert_eq!(unfiltered.len(), 3);
        let c = &unfiltered.records[2];
        assert_eq!(unfiltered.value(c, PLAYING_TIME_90S), None);
        assert_eq!(unfiltered.value(c, "KP"), Some(3.0));
    }

    #[test]
    fn filter_is_skipped_when_column_absent() {
        let table = RawTable::from_records(vec![
            RawRecord::new()
                .with_text("Player", "a")
                .with_text("Squad", "S")
                .with_text("Competition", "L")
                .with_text("Pos", "FW,MF"),
        ]);
        let leagues: HashSet<&str> = ["L"].into_iter().collect();
        let players = project_players(&table, &leagues, Some(5.0));
        assert_eq!(players.len(), 1);
        assert!(players.columns.is_empty());
        assert_eq!(players.records[0].position.as_deref(), Some("FW,MF"));
    }
}
