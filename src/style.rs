use std::collections::BTreeMap;

use serde::Serialize;

use crate::defaults::LeagueTable;

pub struct StyleAxis {
    pub label: &'static str,
    pub metric: &'static str,
    pub above: &'static str,
    pub below: &'static str,
}

pub const STYLE_AXES: &[StyleAxis] = &[
    StyleAxis {
        label: "Attack Style",
        metric: "xG Per Shot",
        above: "Quality Chances",
        below: "High Volume",
    },
    StyleAxis {
        label: "Possession Approach",
        metric: "Progressive Carries Per 90",
        above: "Progressive",
        below: "Conservative",
    },
    StyleAxis {
        label: "Passing Identity",
        metric: "Key Passes Per 90",
        above: "Creative",
        below: "Safe",
    },
    StyleAxis {
        label: "Set Piece Emphasis",
        metric: "Corner Success Rate (%)",
        above: "Set Piece Focused",
        below: "Open Play Focused",
    },
    StyleAxis {
        label: "Defensive Approach",
        metric: "Pressing Intensity",
        above: "High Pressing",
        below: "Defensive Block",
    },
    StyleAxis {
        label: "Possession Style",
        metric: "Direct Play Index",
        above: "Direct",
        below: "Possession-based",
    },
];

pub const STYLE_BALANCE: &str = "Style Balance";
const OFFENSE_METRIC: &str = "Offensive Efficiency";
const DEFENSE_METRIC: &str = "Defensive Value Metric";

/// Metrics shown in the cross-league comparison by default.
pub const COMPARISON_METRICS: &[&str] = &[
    "Shots Per 90",
    "xG Per Shot",
    "Possession %",
    "Progressive Carries Per 90",
    "Pass Completion %",
    "Key Passes Per 90",
    "Corners Per Match",
    "Corner Success Rate (%)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueStyle {
    pub league: String,
    /// Axis label to archetype, in axis order with the balance last.
    pub labels: Vec<(&'static str, &'static str)>,
}

impl LeagueStyle {
    pub fn label(&self, axis: &str) -> Option<&'static str> {
        self.labels.iter().find(|(a, _)| *a == axis).map(|(_, l)| *l)
    }
}

fn mean(values: &[(&str, f64)]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|(_, v)| v).sum::<f64>() / values.len() as f64)
}

pub fn classify(table: &LeagueTable) -> Vec<LeagueStyle> {
    let means: Vec<Option<f64>> = STYLE_AXES
        .iter()
        .map(|axis| mean(&table.column(axis.metric)))
        .collect();
    let off_mean = mean(&table.column(OFFENSE_METRIC));
    let def_mean = mean(&table.column(DEFENSE_METRIC));

    table
        .rows
        .iter()
        .map(|row| {
            let mut labels = Vec::with_capacity(STYLE_AXES.len() + 1);
            for (axis, avg) in STYLE_AXES.iter().zip(&means) {
                let (Some(value), Some(avg)) = (row.get(axis.metric), avg) else {
                    continue;
                };
                let label = if value > *avg { axis.above } else { axis.below };
                labels.push((axis.label, label));
            }
            if let (Some(off), Some(def), Some(off_mean), Some(def_mean)) = (
                row.get(OFFENSE_METRIC),
                row.get(DEFENSE_METRIC),
                off_mean,
                def_mean,
            ) {
                let balance = if off > off_mean && def < def_mean {
                    "Attack-Focused"
                } else if off < off_mean && def > def_mean {
                    "Defense-Focused"
                } else {
                    "Balanced"
                };
                labels.push((STYLE_BALANCE, balance));
            }
            LeagueStyle {
                league: row.league.clone(),
                labels,
            }
        })
        .collect()
}

/// Min-max scales each metric across leagues into [0, 1]. A metric with no
/// spread maps to 0.5 for every league. Unknown metrics are skipped.
pub fn normalized_comparison(
    table: &LeagueTable,
    metrics: &[&str],
) -> BTreeMap<String, Vec<(String, f64)>> {
    let mut out: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
    for metric in metrics {
        let column = table.column(metric);
        if column.is_empty() {
            continue;
        }
        let min = column.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let max = column.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        for (league, value) in column {
            let scaled = if span > 0.0 { (value - min) / span } else { 0.5 };
            out.entry(league.to_string())
                .or_default()
                .push((metric.to_string(), scaled));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::defaults::fill_defaults;
    use crate::engine::DerivedLeague;

    fn league(name: &str, values: &[(&'static str, f64)]) -> DerivedLeague {
        DerivedLeague {
            league: name.to_string(),
            players: 10,
            squads: 2,
            values: values.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn labels_follow_the_cross_league_mean() {
        let table = fill_defaults(vec![
            league("A", &[("xG Per Shot", 0.14), ("Offensive Efficiency", 1.2), ("Defensive Value Metric", 40.0)]),
            league("B", &[("xG Per Shot", 0.08), ("Offensive Efficiency", 0.8), ("Defensive Value Metric", 60.0)]),
        ]);
        let styles = classify(&table);
        assert_eq!(styles[0].label("Attack Style"), Some("Quality Chances"));
        assert_eq!(styles[1].label("Attack Style"), Some("High Volume"));
        assert_eq!(styles[0].label(STYLE_BALANCE), Some("Attack-Focused"));
        assert_eq!(styles[1].label(STYLE_BALANCE), Some("Defense-Focused"));
        // Defaulted on both rows, so neither is above the mean.
        assert_eq!(styles[0].label("Defensive Approach"), Some("Defensive Block"));
    }

    #[test]
    fn constant_metric_normalizes_to_half() {
        let table = fill_defaults(vec![
            league("A", &[("Shots Per 90", 10.0)]),
            league("B", &[("Shots Per 90", 14.0)]),
            league("C", &[("Shots Per 90", 12.0)]),
        ]);
        let cmp = normalized_comparison(&table, &["Shots Per 90", "Possession %", "Nope"]);
        assert_eq!(cmp["A"], vec![("Shots Per 90".to_string(), 0.0), ("Possession %".to_string(), 0.5)]);
        assert_eq!(cmp["B"][0].1, 1.0);
        assert_eq!(cmp["C"][0].1, 0.5);
    }
}
