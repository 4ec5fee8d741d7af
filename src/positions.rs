use std::collections::BTreeMap;

use serde::Serialize;

use crate::projection::{PlayerRecord, PlayerTable};

pub const UNKNOWN_POSITION: &str = "Unknown";

/// Player columns averaged per position on the exported breakdown.
pub const BREAKDOWN_COLUMNS: &[&str] = &[
    "Performance Gls",
    "Ast",
    "KP",
    "Carries PrgC",
    "Tackles Tkl",
    "Int",
    "Touches Touches",
];

/// First tag of a comma-joined position string such as `FW,MF`.
pub fn primary_position(pos: Option<&str>) -> &str {
    pos.and_then(|p| p.split(',').map(str::trim).find(|t| !t.is_empty()))
        .unwrap_or(UNKNOWN_POSITION)
}

fn primary_of(record: &PlayerRecord) -> String {
    primary_position(record.position.as_deref()).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub league: String,
    pub position: String,
    pub players: usize,
    /// Mean of the requested metric over players that carry it.
    pub mean: Option<f64>,
}

/// Player counts per (league, primary position), sorted by league then position.
pub fn position_counts(players: &PlayerTable) -> BTreeMap<(String, String), usize> {
    let mut counts = BTreeMap::new();
    for record in &players.records {
        *counts
            .entry((record.competition.clone(), primary_of(record)))
            .or_insert(0) += 1;
    }
    counts
}

/// Per (league, primary position) count and mean of one projected metric column.
pub fn position_breakdown(players: &PlayerTable, metric: &str) -> Vec<PositionSummary> {
    let mut groups: BTreeMap<(String, String), (usize, f64, usize)> = BTreeMap::new();
    for record in &players.records {
        let entry = groups
            .entry((record.competition.clone(), primary_of(record)))
            .or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(v) = players.value(record, metric) {
            entry.1 += v;
            entry.2 += 1;
        }
    }
    groups
        .into_iter()
        .map(|((league, position), (n, total, with_value))| PositionSummary {
            league,
            position,
            players: n,
            mean: (with_value > 0).then(|| total / with_value as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_position_takes_first_tag() {
        assert_eq!(primary_position(Some("FW,MF")), "FW");
        assert_eq!(primary_position(Some(" DF ")), "DF");
        assert_eq!(primary_position(Some("")), UNKNOWN_POSITION);
        assert_eq!(primary_position(None), UNKNOWN_POSITION);
    }

    #[test]
    fn breakdown_groups_by_league_and_position() {
        let record = |league: &str, pos: &str, kp: Option<f64>| PlayerRecord {
            player: "p".to_string(),
            squad: "s".to_string(),
            competition: league.to_string(),
            position: Some(pos.to_string()),
            values: vec![kp],
        };
        let players = PlayerTable {
            columns: vec!["KP"],
            records: vec![
                record("A", "MF,FW", Some(2.0)),
                record("A", "MF", Some(4.0)),
                record("A", "DF", None),
                record("B", "MF", Some(1.0)),
            ],
        };
        let rows = position_breakdown(&players, "KP");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position, "DF");
        assert_eq!(rows[0].mean, None);
        assert_eq!(rows[1].players, 2);
        assert_eq!(rows[1].mean, Some(3.0));
        let counts = position_counts(&players);
        assert_eq!(counts[&("B".to_string(), "MF".to_string())], 1);
    }
}
