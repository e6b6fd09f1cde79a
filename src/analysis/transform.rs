//! Turns declarations and observed usages of one dependency into advice
//!
//! Dispatch is on how many times the dependency is declared (zero, once,
//! many) and whether every variant agrees on a bucket. Usages that agree on
//! a bucket are first collapsed into a single `main` usage.

use crate::graph::Coordinates;
use crate::model::{Advice, AdviceError, Bucket, Location, Usage, Variant};
use std::collections::BTreeSet;
use tracing::debug;

/// Reduces the usages of one dependency to a set of advice
pub trait UsageTransform {
    fn reduce(&self, usages: &[Usage]) -> Result<BTreeSet<Advice>, AdviceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declared {
    Never,
    Once,
    Many,
}

pub struct StandardTransform {
    /// Coordinates used on every advice produced
    coordinates: Coordinates,

    /// Declarations of this dependency only
    locations: Vec<Location>,
}

impl StandardTransform {
    pub fn new(coordinates: &Coordinates, locations: &[Location]) -> Self {
        let mut matching: Vec<Location> = locations
            .iter()
            .filter(|l| l.identifier() == coordinates.identifier)
            .cloned()
            .collect();
        matching.sort();
        matching.dedup();

        Self {
            coordinates: coordinates.without_default_capability(),
            locations: matching,
        }
    }

    fn declared(&self) -> Declared {
        match self.locations.len() {
            0 => Declared::Never,
            1 => Declared::Once,
            _ => Declared::Many,
        }
    }

    fn add(&self, advice: &mut BTreeSet<Advice>, to: String) {
        advice.insert(Advice::of_add(self.coordinates.clone(), to));
    }

    fn remove(&self, advice: &mut BTreeSet<Advice>, location: &Location) {
        advice.insert(Advice::of_remove(
            self.coordinates.clone(),
            location.configuration_name(),
        ));
    }

    /// No-op changes are skipped
    fn change(
        &self,
        advice: &mut BTreeSet<Advice>,
        location: &Location,
        to: String,
    ) -> Result<(), AdviceError> {
        if location.configuration_name() != to {
            advice.insert(Advice::of_change(
                self.coordinates.clone(),
                location.configuration_name(),
                to,
            )?);
        }
        Ok(())
    }

    fn undeclared_single_bucket(&self, advice: &mut BTreeSet<Advice>, usage: &Usage) {
        // Transitive runtime-only and compile-only usage is left alone
        match usage.bucket {
            Bucket::None | Bucket::RuntimeOnly | Bucket::CompileOnly => {}
            Bucket::Api | Bucket::Impl => self.add(advice, usage.configuration()),
        }
    }

    fn undeclared_many_buckets(&self, advice: &mut BTreeSet<Advice>, usages: &[Usage]) {
        for usage in usages.iter().filter(|u| u.is_used()) {
            self.add(advice, usage.configuration());
        }
    }

    fn declared_once_single_bucket(
        &self,
        advice: &mut BTreeSet<Advice>,
        location: &Location,
        usage: &Usage,
    ) -> Result<(), AdviceError> {
        if location.bucket() == usage.bucket {
            return Ok(());
        }
        // A compileOnly declaration is trusted
        if location.bucket() == Bucket::CompileOnly {
            return Ok(());
        }
        // So is a runtimeOnly one, unless nothing uses it
        if location.bucket() == Bucket::RuntimeOnly && usage.is_used() {
            return Ok(());
        }

        match usage.bucket {
            Bucket::None => self.remove(advice, location),
            Bucket::RuntimeOnly => {}
            Bucket::Api | Bucket::Impl | Bucket::CompileOnly => {
                let to = qualify_like(location, usage.bucket);
                self.change(advice, location, to)?;
            }
        }
        Ok(())
    }

    fn declared_once_many_buckets(
        &self,
        advice: &mut BTreeSet<Advice>,
        location: &Location,
        usages: &[Usage],
    ) -> Result<(), AdviceError> {
        for usage in usages.iter().filter(|u| u.is_used()) {
            self.change(advice, location, usage.configuration())?;
        }
        Ok(())
    }

    fn declared_many_single_bucket(
        &self,
        advice: &mut BTreeSet<Advice>,
        usage: &Usage,
    ) -> Result<(), AdviceError> {
        let has_main = self.locations.iter().any(Location::is_main);

        for location in &self.locations {
            if !usage.is_used() {
                self.remove(advice, location);
            } else if location.is_main() {
                // The main declaration already covers every variant
            } else if has_main {
                self.remove(advice, location);
            } else {
                let to = qualify_like(location, usage.bucket);
                self.change(advice, location, to)?;
            }
        }
        Ok(())
    }

    fn declared_many_many_buckets(
        &self,
        advice: &mut BTreeSet<Advice>,
        usages: &[Usage],
    ) -> Result<(), AdviceError> {
        let mut remaining: Vec<&Usage> = usages.iter().collect();
        let mut unmatched: Vec<&Location> = Vec::new();

        for location in &self.locations {
            match remaining.iter().position(|u| &u.variant == location.variant()) {
                Some(pos) => {
                    let usage = remaining.remove(pos);
                    if usage.is_used() {
                        self.change(advice, location, usage.configuration())?;
                    } else {
                        self.remove(advice, location);
                    }
                }
                None => unmatched.push(location),
            }
        }

        let main_location = unmatched.iter().find(|l| l.is_main()).copied();
        for usage in remaining.into_iter().filter(|u| u.is_used()) {
            match main_location {
                Some(location) => self.change(advice, location, usage.configuration())?,
                None => self.add(advice, usage.configuration()),
            }
        }
        Ok(())
    }
}

impl UsageTransform for StandardTransform {
    fn reduce(&self, usages: &[Usage]) -> Result<BTreeSet<Advice>, AdviceError> {
        if usages.is_empty() {
            return Err(AdviceError::NoUsages(self.coordinates.identifier.clone()));
        }

        let usages = reduce_usages(usages);
        let single_bucket = usages.len() == 1;
        let mut advice = BTreeSet::new();

        debug!(
            "Reducing {}: {:?} declaration(s), {} usage(s)",
            self.coordinates.identifier,
            self.declared(),
            usages.len()
        );

        match (self.declared(), single_bucket) {
            (Declared::Never, true) => self.undeclared_single_bucket(&mut advice, &usages[0]),
            (Declared::Never, false) => self.undeclared_many_buckets(&mut advice, &usages),
            (Declared::Once, true) => {
                self.declared_once_single_bucket(&mut advice, &self.locations[0], &usages[0])?
            }
            (Declared::Once, false) => {
                self.declared_once_many_buckets(&mut advice, &self.locations[0], &usages)?
            }
            (Declared::Many, true) => self.declared_many_single_bucket(&mut advice, &usages[0])?,
            (Declared::Many, false) => self.declared_many_many_buckets(&mut advice, &usages)?,
        }

        simplify(advice)
    }
}

/// Collapse usages that agree on a bucket into one `main` usage carrying
/// every reason. Otherwise sort by variant.
fn reduce_usages(usages: &[Usage]) -> Vec<Usage> {
    let first = usages[0].bucket;
    if usages.iter().all(|u| u.bucket == first) {
        let reasons = usages.iter().flat_map(|u| u.reasons.iter().cloned());
        return vec![Usage::new(Variant::main(), first, reasons)];
    }

    let mut sorted = usages.to_vec();
    sorted.sort();
    sorted
}

/// Configuration for `bucket` in the variant of an existing declaration
fn qualify_like(location: &Location, bucket: Bucket) -> String {
    bucket.configuration(location.variant())
}

/// An add and a remove for the same coordinates become one change, or
/// nothing when they name the same configuration
fn simplify(mut advice: BTreeSet<Advice>) -> Result<BTreeSet<Advice>, AdviceError> {
    let adds: Vec<Advice> = advice.iter().filter(|a| a.is_any_add()).cloned().collect();
    let mut removes: Vec<Advice> = advice.iter().filter(|a| a.is_any_remove()).cloned().collect();

    for add in adds {
        let Some(pos) = removes.iter().position(|r| r.coordinates == add.coordinates) else {
            continue;
        };
        let remove = removes.remove(pos);
        advice.remove(&add);
        advice.remove(&remove);

        if let (Some(from), Some(to)) = (remove.from_configuration, add.to_configuration) {
            if from != to {
                advice.insert(Advice::of_change(add.coordinates, from, to)?);
            }
        }
    }

    Ok(advice)
}
