use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::table::{COMPETITION_COLUMN, IDENTITY_COLUMNS, RawRecord, RawTable, SQUAD_COLUMN};

/// Leagues with fewer sampled players than this are dropped.
pub const DEFAULT_MIN_LEAGUE_ROWS: usize = 10;

/// All player rows of one league plus the per-column sums every formula reads from.
///
/// Sums are built once on construction; a column is only present in `sums`
/// when at least one row of this league carries a numeric value for it.
#[derive(Debug, Clone)]
pub struct LeaguePartition<'a> {
    league: String,
    rows: Vec<&'a RawRecord>,
    sums: HashMap<String, f64>,
    squads: usize,
}

impl<'a> LeaguePartition<'a> {
    pub fn new(league: &str, rows: Vec<&'a RawRecord>) -> Self {
        let mut sums: HashMap<String, f64> = HashMap::new();
        let mut squads: HashSet<String> = HashSet::new();
        for row in &rows {
            for column in row.columns() {
                if IDENTITY_COLUMNS.contains(&column) {
                    continue;
                }
                if let Some(v) = row.number(column) {
                    *sums.entry(column.to_string()).or_insert(0.0) += v;
                }
            }
            if let Some(squad) = row.text(SQUAD_COLUMN) {
                squads.insert(squad);
            }
        }
        Self {
            league: league.to_string(),
            rows,
            sums,
            squads: squads.len(),
        }
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn squad_count(&self) -> usize {
        self.squads
    }

    pub fn has(&self, column: &str) -> bool {
        self.sums.contains_key(column)
    }

    pub fn sum(&self, column: &str) -> Option<f64> {
        self.sums.get(column).copied()
    }

    /// Sum across several columns; `None` unless every column is present for this league.
    pub fn sum_of(&self, columns: &[&str]) -> Option<f64> {
        let mut total = 0.0;
        for column in columns {
            total += self.sum(column)?;
        }
        Some(total)
    }

    /// Mean of a per-player value over the players that have it.
    pub fn mean(&self, column: &str) -> Option<f64> {
        let mut total = 0.0;
        let mut n = 0usize;
        for row in &self.rows {
            if let Some(v) = row.number(column) {
                total += v;
                n += 1;
            }
        }
        if n == 0 { None } else { Some(total / n as f64) }
    }

    /// Mean of a pre-normalized per-player ratio, restricted to players whose
    /// denominator is nonzero. Yields 0 when nobody qualifies.
    pub fn mean_of_ratios(&self, value: &str, denominator: &str) -> Option<f64> {
        if !self.has(value) || !self.has(denominator) {
            return None;
        }
        let mut total = 0.0;
        let mut n = 0usize;
        for row in &self.rows {
            let Some(den) = row.number(denominator) else {
                continue;
            };
            if den == 0.0 {
                continue;
            }
            let Some(v) = row.number(value) else {
                continue;
            };
            total += v;
            n += 1;
        }
        if n == 0 {
            Some(0.0)
        } else {
            Some(total / n as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedLeague {
    pub league: String,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct Partitioning<'a> {
    /// Qualifying leagues, sorted by name.
    pub kept: Vec<LeaguePartition<'a>>,
    pub dropped: Vec<DroppedLeague>,
    /// Rows with no competition value.
    pub unassigned: usize,
}

impl Partitioning<'_> {
    pub fn league_names(&self) -> HashSet<&str> {
        self.kept.iter().map(|p| p.league()).collect()
    }
}

pub fn partition_by_league(table: &RawTable, min_rows: usize) -> Partitioning<'_> {
    let mut groups: BTreeMap<String, Vec<&RawRecord>> = BTreeMap::new();
    let mut unassigned = 0usize;
    for record in table.records() {
        match record.text(COMPETITION_COLUMN) {
            Some(league) => groups.entry(league).or_default().push(record),
            None => unassigned += 1,
        }
    }

    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for (league, rows) in groups {
        if rows.len() < min_rows {
            tracing::debug!(league = %league, rows = rows.len(), min_rows, "dropping undersized league");
            dropped.push(DroppedLeague {
                league,
                rows: rows.len(),
            });
            continue;
        }
        kept.push(LeaguePartition::new(&league, rows));
    }

    Partitioning {
        kept,
        dropped,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(league: &str, squad: &str, shots: Option<f64>) -> RawRecord {
        let mut r = RawRecord::new()
            .with_text("Player", "P")
            .with_text("Squad", squad)
            .with_text("Competition", league);
        if let Some(s) = shots {
            r = r.with_number("Standard Sh", s);
        }
        r
    }

    #[test]
    fn partition_drops_small_leagues_and_counts_unassigned() {
        let mut records: Vec<RawRecord> = (0..3).map(|_| row("A", "X", Some(1.0))).collect();
        records.push(row("B", "Y", Some(1.0)));
        records.push(RawRecord::new().with_text("Player", "Q").with_text("Squad", "Z"));
        let table = RawTable::from_records(records);

        let parts = partition_by_league(&table, 2);
        assert_eq!(parts.kept.len(), 1);
        assert_eq!(parts.kept[0].league(), "A");
        assert_eq!(parts.dropped, vec![DroppedLeague { league: "B".to_string(), rows: 1 }]);
        assert_eq!(parts.unassigned, 1);
    }

    #[test]
    fn sums_are_absent_when_no_row_carries_the_column() {
        let records = vec![row("A", "X", None), row("A", "Y", Some(4.0)), row("A", "Y", None)];
        let table = RawTable::from_records(records);
        let parts = partition_by_league(&table, 1);
        let league = &parts.kept[0];
        assert_eq!(league.sum("Standard Sh"), Some(4.0));
        assert_eq!(league.sum("Expected xG"), None);
        assert_eq!(league.sum_of(&["Standard Sh", "Expected xG"]), None);
        assert_eq!(league.squad_count(), 2);
    }

    #[test]
    fn mean_of_ratios_skips_zero_denominators() {
        let records = vec![
            row("A", "X", None).with_number("Total Cmp%", 80.0).with_number("Total Att", 10.0),
            row("A", "X", None).with_number("Total Cmp%", 0.0).with_number("Total Att", 0.0),
            row("A", "X", None).with_number("Total Cmp%", 90.0).with_number("Total Att", 5.0),
        ];
        let table = RawTable::from_records(records);
        let parts = partition_by_league(&table, 1);
        let v = parts.kept[0].mean_of_ratios("Total Cmp%", "Total Att");
        assert_eq!(v, Some(85.0));
    }
}
