use std::collections::HashSet;

use crate::catalog::{self, MetricRule};

/// Which catalog rules can run against a given raw column set.
#[derive(Debug, Clone)]
pub struct Availability {
    computable: Vec<&'static MetricRule>,
    unavailable: Vec<&'static MetricRule>,
}

impl Availability {
    pub fn resolve(columns: &HashSet<&str>) -> Self {
        let (computable, unavailable): (Vec<_>, Vec<_>) = catalog::rules()
            .iter()
            .partition(|rule| rule.is_computable(columns));
        Self {
            computable,
            unavailable,
        }
    }

    pub fn computable(&self) -> &[&'static MetricRule] {
        &self.computable
    }

    pub fn unavailable(&self) -> &[&'static MetricRule] {
        &self.unavailable
    }

    pub fn is_computable(&self, metric: &str) -> bool {
        self.computable.iter().any(|r| r.name == metric)
    }

    /// Source columns named by unavailable rules that are absent from the input.
    pub fn missing_columns(&self, columns: &HashSet<&str>) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for rule in &self.unavailable {
            for col in rule.requires {
                if !columns.contains(col) && seen.insert(*col) {
                    out.push(*col);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_only_columns_leave_nothing_computable() {
        let cols: HashSet<&str> = ["Player", "Squad", "Competition"].into_iter().collect();
        let a = Availability::resolve(&cols);
        assert!(a.computable().is_empty());
        assert_eq!(a.unavailable().len(), catalog::rules().len());
        assert!(a.missing_columns(&cols).contains(&"Standard Sh"));
    }

    #[test]
    fn required_columns_are_an_and() {
        let cols: HashSet<&str> = ["Standard Sh", "Standard SoT"].into_iter().collect();
        let a = Availability::resolve(&cols);
        assert!(a.is_computable("Shot on Target %"));
        assert!(!a.is_computable("Shots Per 90"));
        assert!(!a.missing_columns(&cols).contains(&"Standard Sh"));
    }
}
