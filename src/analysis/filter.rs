//! User exclusions applied to advice after it is computed
//!
//! The transform never sees these rules. Anything filtered out is kept
//! aside so explanations can say why a dependency has no advice.

use crate::config::IssuesConfig;
use crate::model::Advice;
use std::collections::BTreeSet;
use tracing::info;

type Predicate = Box<dyn Fn(&Advice) -> bool + Send + Sync>;

/// Post-filter over produced advice
#[derive(Default)]
pub struct AdviceFilter {
    issues: IssuesConfig,
    predicates: Vec<Predicate>,
}

/// Advice split into what survives and what a rule removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub kept: BTreeSet<Advice>,
    pub filtered: BTreeSet<Advice>,
}

impl AdviceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(issues: &IssuesConfig) -> Self {
        Self {
            issues: issues.clone(),
            predicates: Vec::new(),
        }
    }

    /// Exclude any advice for which `predicate` returns true
    pub fn with_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Advice) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn is_excluded(&self, advice: &Advice) -> bool {
        self.issues.should_exclude(advice) || self.predicates.iter().any(|p| p(advice))
    }

    pub fn apply(&self, advice: BTreeSet<Advice>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for item in advice {
            if self.is_excluded(&item) {
                info!("Filtered advice: {}", item);
                outcome.filtered.insert(item);
            } else {
                outcome.kept.insert(item);
            }
        }
        outcome
    }
}

impl FilterOutcome {
    pub fn was_filtered(&self, identifier: &str) -> bool {
        self.filtered
            .iter()
            .any(|a| a.coordinates.identifier == identifier)
    }
}

impl std::fmt::Display for FilterOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} advice kept, {} filtered",
            self.kept.len(),
            self.filtered.len()
        )
    }
}
