use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::availability::Availability;
use crate::partition::LeaguePartition;

/// Sparse per-league result: only metrics whose formula was defined for this league.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedLeague {
    pub league: String,
    pub players: usize,
    pub squads: usize,
    pub values: BTreeMap<&'static str, f64>,
}

pub fn derive_league(partition: &LeaguePartition<'_>, availability: &Availability) -> DerivedLeague {
    let mut values = BTreeMap::new();
    for rule in availability.computable() {
        if let Some(v) = rule.formula.evaluate(partition) {
            values.insert(rule.name, v);
        }
    }
    DerivedLeague {
        league: partition.league().to_string(),
        players: partition.row_count(),
        squads: partition.squad_count(),
        values,
    }
}

/// Evaluates every computable rule for every partition on the rayon pool.
/// The result is sorted by league name regardless of scheduling.
pub fn derive_all(partitions: &[LeaguePartition<'_>], availability: &Availability) -> Vec<DerivedLeague> {
    let mut derived: Vec<DerivedLeague> = partitions
        .par_iter()
        .map(|p| derive_league(p, availability))
        .collect();
    derived.sort_by(|a, b| a.league.cmp(&b.league));
    derived
}
