use super::{Bucket, Reason, Variant};
use crate::graph::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a dependency is used in one variant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Usage {
    pub variant: Variant,
    pub bucket: Bucket,
    #[serde(default)]
    pub reasons: Vec<Reason>,
}

impl Usage {
    /// Duplicate reasons are dropped, first occurrence wins
    pub fn new(variant: Variant, bucket: Bucket, reasons: impl IntoIterator<Item = Reason>) -> Self {
        let mut unique: Vec<Reason> = Vec::new();
        for reason in reasons {
            if !unique.contains(&reason) {
                unique.push(reason);
            }
        }
        Self {
            variant,
            bucket,
            reasons: unique,
        }
    }

    /// Placeholder for a variant with no observation at all
    pub fn undeclared(variant: Variant) -> Self {
        Self::new(variant, Bucket::None, [Reason::Undeclared])
    }

    /// Configuration this usage calls for
    pub fn configuration(&self) -> String {
        self.bucket.configuration(&self.variant)
    }

    pub fn is_used(&self) -> bool {
        self.bucket.is_used()
    }

    pub fn provides_compile_time_annotations(&self) -> bool {
        self.reasons.iter().any(Reason::is_compile_time_annotations)
    }
}

/// Collects usages per dependency and makes sure every dependency has one
/// usage for each known variant
pub struct UsageBuilder {
    variants: Vec<Variant>,
    usages: BTreeMap<Coordinates, Vec<Usage>>,
}

impl UsageBuilder {
    pub fn new(variants: impl IntoIterator<Item = Variant>) -> Self {
        let mut known: Vec<Variant> = Vec::new();
        for variant in variants {
            if !known.contains(&variant) {
                known.push(variant);
            }
        }
        Self {
            variants: known,
            usages: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, coordinates: Coordinates, usage: Usage) -> &mut Self {
        let usages = self.usages.entry(coordinates).or_default();
        if !usages.contains(&usage) {
            usages.push(usage);
        }
        self
    }

    /// Usages per dependency, sorted by variant, with a `NONE` usage tagged
    /// [`Reason::Undeclared`] for every variant that had no observation
    pub fn build(self) -> BTreeMap<Coordinates, Vec<Usage>> {
        let variants = self.variants;
        self.usages
            .into_iter()
            .map(|(coordinates, mut usages)| {
                for variant in &variants {
                    if !usages.iter().any(|u| &u.variant == variant) {
                        usages.push(Usage::undeclared(variant.clone()));
                    }
                }
                usages.sort();
                (coordinates, usages)
            })
            .collect()
    }
}
