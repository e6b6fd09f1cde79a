//! Advice computation for a module
//!
//! Each dependency is reduced independently by a [`UsageTransform`], then
//! the combined advice goes through the user's [`AdviceFilter`].

mod filter;
mod transform;

pub use filter::{AdviceFilter, FilterOutcome};
pub use transform::{StandardTransform, UsageTransform};

use crate::graph::Coordinates;
use crate::model::{Advice, AdviceError, Location, Reason, Usage, Variant};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Declarations and observed usages of one module
#[derive(Debug, Clone)]
pub struct ModuleInput {
    pub project: Coordinates,

    /// Known variants; `main` alone when empty
    pub variants: Vec<Variant>,

    pub locations: Vec<Location>,

    pub usages: BTreeMap<Coordinates, Vec<Usage>>,
}

impl ModuleInput {
    pub fn new(project: Coordinates) -> Self {
        Self {
            project,
            variants: Vec::new(),
            locations: Vec::new(),
            usages: BTreeMap::new(),
        }
    }

    fn known_variants(&self) -> Vec<Variant> {
        if self.variants.is_empty() {
            vec![Variant::main()]
        } else {
            self.variants.clone()
        }
    }

    /// Every dependency with its usages. Declared dependencies without any
    /// observation are unused in every variant.
    pub fn dependencies(&self) -> Vec<(Coordinates, Vec<Usage>)> {
        let mut dependencies: Vec<(Coordinates, Vec<Usage>)> = self
            .usages
            .iter()
            .map(|(coordinates, usages)| (coordinates.clone(), usages.clone()))
            .collect();

        let observed: BTreeSet<&str> = self
            .usages
            .keys()
            .map(|c| c.identifier.as_str())
            .collect();
        let unobserved: BTreeSet<&str> = self
            .locations
            .iter()
            .map(Location::identifier)
            .filter(|id| !observed.contains(id))
            .collect();

        for identifier in unobserved {
            let usages = self
                .known_variants()
                .into_iter()
                .map(|variant| Usage::new(variant, crate::model::Bucket::None, [Reason::Unused]))
                .collect();
            dependencies.push((Coordinates::from_identifier(identifier), usages));
        }

        dependencies
    }
}

/// Advice for one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAnalysis {
    pub project: Coordinates,
    pub advice: BTreeSet<Advice>,
    /// Advice a user rule removed
    pub filtered: BTreeSet<Advice>,
}

impl ModuleAnalysis {
    pub fn advice_for(&self, identifier: &str) -> Vec<&Advice> {
        self.advice
            .iter()
            .filter(|a| a.coordinates.identifier == identifier)
            .collect()
    }

    pub fn was_filtered(&self, identifier: &str) -> bool {
        self.filtered
            .iter()
            .any(|a| a.coordinates.identifier == identifier)
    }
}

/// Computes advice for modules
pub struct ProjectAnalyzer {
    filter: AdviceFilter,
    parallel: bool,
}

impl ProjectAnalyzer {
    pub fn new() -> Self {
        Self {
            filter: AdviceFilter::new(),
            parallel: false,
        }
    }

    pub fn with_filter(mut self, filter: AdviceFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn analyze(&self, module: &ModuleInput) -> Result<ModuleAnalysis, AdviceError> {
        self.run(module, self.parallel)
    }

    /// Like [`analyze`](Self::analyze), reducing dependencies on the rayon pool
    pub fn analyze_parallel(&self, module: &ModuleInput) -> Result<ModuleAnalysis, AdviceError> {
        self.run(module, true)
    }

    pub fn analyze_modules(&self, modules: &[ModuleInput]) -> Result<Vec<ModuleAnalysis>, AdviceError> {
        if self.parallel {
            return self.analyze_modules_parallel(modules);
        }
        modules.iter().map(|m| self.run(m, false)).collect()
    }

    /// Modules on the rayon pool, results in input order
    pub fn analyze_modules_parallel(
        &self,
        modules: &[ModuleInput],
    ) -> Result<Vec<ModuleAnalysis>, AdviceError> {
        info!("Analyzing {} modules in parallel...", modules.len());
        modules.par_iter().map(|m| self.run(m, true)).collect()
    }

    fn run(&self, module: &ModuleInput, parallel: bool) -> Result<ModuleAnalysis, AdviceError> {
        let dependencies = module.dependencies();
        debug!(
            "Analyzing {}: {} dependencies, {} declarations",
            module.project,
            dependencies.len(),
            module.locations.len()
        );

        let reduce = |(coordinates, usages): &(Coordinates, Vec<Usage>)| {
            StandardTransform::new(coordinates, &module.locations).reduce(usages)
        };

        let per_dependency: Vec<BTreeSet<Advice>> = if parallel {
            dependencies.par_iter().map(reduce).collect::<Result<_, _>>()?
        } else {
            dependencies.iter().map(reduce).collect::<Result<_, _>>()?
        };

        let advice: BTreeSet<Advice> = per_dependency.into_iter().flatten().collect();
        let outcome = self.filter.apply(advice);

        info!("{}: {}", module.project, outcome);

        Ok(ModuleAnalysis {
            project: module.project.clone(),
            advice: outcome.kept,
            filtered: outcome.filtered,
        })
    }
}

impl Default for ProjectAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
