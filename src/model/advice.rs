use super::{ends_with_ignore_case, ModelError};
use crate::graph::Coordinates;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdviceError {
    #[error("no usages recorded for '{0}'")]
    NoUsages(String),

    #[error("change advice cannot be from and to the same configuration ({0} in this case)")]
    NoOpChange(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A change to a dependency declaration
///
/// `from_configuration` is absent for dependencies that are not declared;
/// `to_configuration` is absent for dependencies that should be removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Advice {
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_configuration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_configuration: Option<String>,
}

impl Advice {
    pub fn of_add(coordinates: Coordinates, to_configuration: impl Into<String>) -> Self {
        Self {
            coordinates,
            from_configuration: None,
            to_configuration: Some(to_configuration.into()),
        }
    }

    pub fn of_remove(coordinates: Coordinates, from_configuration: impl Into<String>) -> Self {
        Self {
            coordinates,
            from_configuration: Some(from_configuration.into()),
            to_configuration: None,
        }
    }

    pub fn of_change(
        coordinates: Coordinates,
        from_configuration: impl Into<String>,
        to_configuration: impl Into<String>,
    ) -> Result<Self, AdviceError> {
        let from_configuration = from_configuration.into();
        let to_configuration = to_configuration.into();
        if from_configuration == to_configuration {
            return Err(AdviceError::NoOpChange(from_configuration));
        }
        Ok(Self {
            coordinates,
            from_configuration: Some(from_configuration),
            to_configuration: Some(to_configuration),
        })
    }

    fn to_ends_with(&self, suffix: &str) -> bool {
        self.to_configuration
            .as_deref()
            .is_some_and(|to| ends_with_ignore_case(to, suffix))
    }

    fn from_ends_with(&self, suffix: &str) -> bool {
        self.from_configuration
            .as_deref()
            .is_some_and(|from| ends_with_ignore_case(from, suffix))
    }

    /// Target is a compile-only configuration
    pub fn is_compile_only(&self) -> bool {
        self.to_ends_with("compileOnly")
    }

    pub fn is_remove_compile_only(&self) -> bool {
        self.is_remove() && self.from_ends_with("compileOnly")
    }

    pub fn is_runtime_only(&self) -> bool {
        self.to_ends_with("runtimeOnly")
    }

    /// Undeclared and used, other than as compile-only
    pub fn is_add(&self) -> bool {
        self.is_any_add() && !self.is_compile_only()
    }

    pub fn is_any_add(&self) -> bool {
        self.from_configuration.is_none() && self.to_configuration.is_some()
    }

    /// Declared and unused, other than on an annotation processor
    /// configuration
    pub fn is_remove(&self) -> bool {
        self.is_any_remove() && !self.is_compile_only() && !self.is_processor()
    }

    pub fn is_any_remove(&self) -> bool {
        self.to_configuration.is_none()
    }

    /// Declared on the wrong configuration, other than a move to
    /// compile-only or runtime-only
    pub fn is_change(&self) -> bool {
        self.is_any_change() && !self.is_compile_only() && !self.is_runtime_only()
    }

    pub fn is_any_change(&self) -> bool {
        self.from_configuration.is_some() && self.to_configuration.is_some()
    }

    /// Removal of an unused annotation processor
    pub fn is_processor(&self) -> bool {
        self.to_configuration.is_none()
            && (self.from_ends_with("kapt") || self.from_ends_with("annotationProcessor"))
    }

    pub fn is_downgrade(&self) -> bool {
        self.is_remove() || self.is_compile_only() || self.is_runtime_only()
    }

    pub fn is_upgrade(&self) -> bool {
        self.is_any_add() || (self.is_any_change() && self.is_to_api_like())
    }

    pub fn is_to_api_like(&self) -> bool {
        self.to_ends_with("api")
    }
}

impl PartialOrd for Advice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Coordinates, then target configuration, then source configuration.
/// Absent configurations sort first.
impl Ord for Advice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coordinates
            .cmp(&other.coordinates)
            .then_with(|| self.to_configuration.cmp(&other.to_configuration))
            .then_with(|| self.from_configuration.cmp(&other.from_configuration))
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.from_configuration, &self.to_configuration) {
            (None, Some(to)) => write!(f, "add {} to '{}'", self.coordinates, to),
            (Some(from), None) => write!(f, "remove {} from '{}'", self.coordinates, from),
            (Some(from), Some(to)) => {
                write!(f, "change {} from '{}' to '{}'", self.coordinates, from, to)
            }
            (None, None) => write!(f, "{} (no change)", self.coordinates),
        }
    }
}
