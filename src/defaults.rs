use serde::Serialize;

use crate::catalog;
use crate::engine::DerivedLeague;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellOrigin {
    Computed,
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricCell {
    pub value: f64,
    pub origin: CellOrigin,
}

/// One qualifying league. `cells` is aligned with the catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueRow {
    pub league: String,
    pub players: usize,
    pub squads: usize,
    pub cells: Vec<MetricCell>,
}

impl LeagueRow {
    pub fn cell(&self, metric: &str) -> Option<&MetricCell> {
        catalog::position_of(metric).and_then(|i| self.cells.get(i))
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.cell(metric).map(|c| c.value)
    }

    pub fn origin(&self, metric: &str) -> Option<CellOrigin> {
        self.cell(metric).map(|c| c.origin)
    }

    pub fn defaulted_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.origin == CellOrigin::Defaulted)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTable {
    pub metrics: Vec<&'static str>,
    pub rows: Vec<LeagueRow>,
}

impl LeagueTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, league: &str) -> Option<&LeagueRow> {
        self.rows.iter().find(|r| r.league == league)
    }

    pub fn leagues(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.league.as_str())
    }

    /// `(league, value)` pairs for one metric across all rows.
    pub fn column(&self, metric: &str) -> Vec<(&str, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.get(metric).map(|v| (r.league.as_str(), v)))
            .collect()
    }
}

/// Fills every catalog metric a league lacks with its default, recording the origin per cell.
pub fn fill_defaults(derived: Vec<DerivedLeague>) -> LeagueTable {
    let rules = catalog::rules();
    let rows = derived
        .into_iter()
        .map(|league| {
            let cells = rules
                .iter()
                .map(|rule| match league.values.get(rule.name) {
                    Some(&value) => MetricCell {
                        value,
                        origin: CellOrigin::Computed,
                    },
                    None => MetricCell {
                        value: rule.default,
                        origin: CellOrigin::Defaulted,
                    },
                })
                .collect();
            LeagueRow {
                league: league.league,
                players: league.players,
                squads: league.squads,
                cells,
            }
        })
        .collect();

    LeagueTable {
        metrics: catalog::metric_names().collect(),
        rows,
    }
}
