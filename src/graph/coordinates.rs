//! Coordinates identify a node in a dependency graph
//!
//! A coordinate is either a local project (`:app`), an external module
//! (`group:name:version`), an included build or a flat file dependency.
//! Two coordinates that differ only in version or variant identification
//! share the same `identifier` and therefore the same graph node.

use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Kind of coordinates. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatesKind {
    Project,
    Module,
    IncludedBuild,
    Flat,
}

impl CoordinatesKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            CoordinatesKind::Project => "project",
            CoordinatesKind::Module => "module",
            CoordinatesKind::IncludedBuild => "included build",
            CoordinatesKind::Flat => "flat",
        }
    }
}

/// Capabilities and attributes that select one variant of a component
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantIdentification {
    pub capabilities: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
}

impl VariantIdentification {
    pub fn new(
        capabilities: impl IntoIterator<Item = String>,
        attributes: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
            attributes: attributes.into_iter().collect(),
        }
    }

    pub fn with_capability(capability: impl Into<String>) -> Self {
        let mut capabilities = BTreeSet::new();
        capabilities.insert(capability.into());
        Self {
            capabilities,
            attributes: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty() && self.attributes.is_empty()
    }
}

/// Identity of a dependency
///
/// Ordering is by kind, then identifier, then version (absent first), then
/// variant identification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub kind: CoordinatesKind,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "VariantIdentification::is_empty")]
    pub variant_identification: VariantIdentification,
}

impl Coordinates {
    fn of(kind: CoordinatesKind, identifier: String, version: Option<String>) -> Self {
        Self {
            kind,
            identifier,
            version,
            variant_identification: VariantIdentification::default(),
        }
    }

    /// Project coordinates. The path must start with `:`.
    pub fn project(path: impl Into<String>) -> Result<Self, ModelError> {
        let path = path.into();
        if !path.starts_with(':') {
            return Err(ModelError::InvalidProjectPath(path));
        }
        Ok(Self::of(CoordinatesKind::Project, path, None))
    }

    pub fn module(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self::of(
            CoordinatesKind::Module,
            identifier.into(),
            Some(version.into()),
        )
    }

    pub fn included_build(identifier: impl Into<String>) -> Self {
        Self::of(CoordinatesKind::IncludedBuild, identifier.into(), None)
    }

    pub fn flat(identifier: impl Into<String>) -> Self {
        Self::of(CoordinatesKind::Flat, identifier.into(), None)
    }

    /// Parse a raw coordinate string
    ///
    /// `":x"` is a project, `"g:a:v"` is a module with version `v`, anything
    /// else is a flat identifier.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(':') {
            return Self::of(CoordinatesKind::Project, raw.to_string(), None);
        }

        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            Self::module(format!("{}:{}", parts[0], parts[1]), parts[2])
        } else {
            Self::flat(raw)
        }
    }

    /// Best guess for an identifier that carries no version
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier.starts_with(':') {
            Self::of(CoordinatesKind::Project, identifier.to_string(), None)
        } else if identifier.contains(':') {
            Self::of(CoordinatesKind::Module, identifier.to_string(), None)
        } else {
            Self::flat(identifier)
        }
    }

    pub fn with_variant_identification(mut self, identification: VariantIdentification) -> Self {
        self.variant_identification = identification;
        self
    }

    /// `identifier[:version]`
    pub fn gav(&self) -> String {
        match &self.version {
            Some(version) => format!("{}:{}", self.identifier, version),
            None => self.identifier.clone(),
        }
    }

    pub fn is_project(&self) -> bool {
        self.kind == CoordinatesKind::Project
    }

    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.variant_identification.capabilities
    }

    /// Whether `capability` is the one a component gets when it declares none
    pub fn is_default_capability(&self, capability: &str) -> bool {
        match self.kind {
            CoordinatesKind::Project => {
                let name = self
                    .identifier
                    .rfind(':')
                    .map(|i| &self.identifier[i..])
                    .unwrap_or(self.identifier.as_str());
                capability.ends_with(name)
            }
            _ => capability == self.identifier,
        }
    }

    pub fn has_default_capability(&self) -> bool {
        let capabilities = self.capabilities();
        capabilities.is_empty() || capabilities.iter().any(|c| self.is_default_capability(c))
    }

    /// Same coordinates with the default capability dropped. If nothing
    /// else remains, the whole variant identification is cleared.
    pub fn without_default_capability(&self) -> Self {
        let remaining: BTreeSet<String> = self
            .capabilities()
            .iter()
            .filter(|c| !self.is_default_capability(c))
            .cloned()
            .collect();

        let mut stripped = self.clone();
        if remaining.is_empty() {
            stripped.variant_identification = VariantIdentification::default();
        } else {
            stripped.variant_identification.capabilities = remaining;
        }
        stripped
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gav())
    }
}
