//! Analysis input files
//!
//! One file describes one module: its classpath graphs, its declarations,
//! the usages observed for each dependency, artifact sizes and bundle
//! traces. YAML, TOML and JSON are accepted.

use crate::analysis::ModuleInput;
use crate::graph::{Coordinates, DependencyGraph, GraphBuilder};
use crate::model::{Location, ModelError, Usage, UsageBuilder, Variant};
use crate::reason::BundleTrace;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInput {
    /// Project path, e.g. `:app`
    pub project: String,

    pub variants: Vec<Variant>,

    /// Classpath view name to `[from, to]` pairs of raw coordinates
    pub graphs: BTreeMap<String, Vec<(String, String)>>,

    pub declarations: Vec<DeclarationRecord>,

    /// Raw coordinates to observed usages
    pub usages: BTreeMap<String, Vec<Usage>>,

    /// Artifact size in bytes, by identifier or gav
    pub sizes: BTreeMap<String, u64>,

    pub bundle_traces: Vec<RawBundleTrace>,
}

/// One dependency declaration in the build script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub identifier: String,
    pub configuration: String,
    /// Inferred from the configuration name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

/// Bundle trace with raw coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawBundleTrace {
    DeclaredParent { parent: String, child: String },
    UsedChild { parent: String, child: String },
    PrimaryMap { primary: String, subordinate: String },
}

impl From<&RawBundleTrace> for BundleTrace {
    fn from(raw: &RawBundleTrace) -> Self {
        match raw {
            RawBundleTrace::DeclaredParent { parent, child } => BundleTrace::DeclaredParent {
                parent: Coordinates::parse(parent),
                child: Coordinates::parse(child),
            },
            RawBundleTrace::UsedChild { parent, child } => BundleTrace::UsedChild {
                parent: Coordinates::parse(parent),
                child: Coordinates::parse(child),
            },
            RawBundleTrace::PrimaryMap {
                primary,
                subordinate,
            } => BundleTrace::PrimaryMap {
                primary: Coordinates::parse(primary),
                subordinate: Coordinates::parse(subordinate),
            },
        }
    }
}

impl AnalysisInput {
    /// Load an input file. The format follows the extension; anything else
    /// is tried as YAML, then JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read input file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let input: Self = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML input")?,
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML input")?,
            "json" => serde_json::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse JSON input")?,
            _ => {
                if let Ok(input) = serde_yaml::from_str(&contents) {
                    input
                } else {
                    serde_json::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse input file")?
                }
            }
        };

        debug!(
            "Loaded {}: {} graphs, {} declarations, {} observed dependencies",
            input.project,
            input.graphs.len(),
            input.declarations.len(),
            input.usages.len()
        );
        Ok(input)
    }

    pub fn project_coordinates(&self) -> Result<Coordinates, ModelError> {
        Coordinates::project(self.project.as_str())
    }

    /// Declared variants, `main` alone when none are listed
    pub fn known_variants(&self) -> Vec<Variant> {
        if self.variants.is_empty() {
            vec![Variant::main()]
        } else {
            self.variants.clone()
        }
    }

    /// One graph per classpath view. The project is always a node, even in
    /// a view without edges.
    pub fn graphs(&self) -> BTreeMap<String, DependencyGraph> {
        self.graphs
            .iter()
            .map(|(view, edges)| {
                let mut builder = GraphBuilder::new().with_root(&self.project);
                builder.edges(edges.iter().map(|(from, to)| (from.as_str(), to.as_str())));
                (view.clone(), builder.build())
            })
            .collect()
    }

    pub fn locations(&self) -> Result<Vec<Location>, ModelError> {
        let variants = self.known_variants();
        self.declarations
            .iter()
            .map(|d| match &d.variant {
                Some(variant) => Location::new(&d.identifier, &d.configuration, variant.clone()),
                None => Location::infer(&d.identifier, &d.configuration, &variants),
            })
            .collect()
    }

    /// Declarations and gap-filled usages, ready for the analyzer
    pub fn module_input(&self) -> Result<ModuleInput, ModelError> {
        let variants = self.known_variants();

        let mut builder = UsageBuilder::new(variants.clone());
        for (raw, usages) in &self.usages {
            let coordinates = Coordinates::parse(raw);
            for usage in usages {
                builder.add(coordinates.clone(), usage.clone());
            }
        }

        let mut module = ModuleInput::new(self.project_coordinates()?);
        module.variants = variants;
        module.locations = self.locations()?;
        module.usages = builder.build();
        Ok(module)
    }

    pub fn bundle_traces(&self) -> Vec<BundleTrace> {
        self.bundle_traces.iter().map(BundleTrace::from).collect()
    }

    pub fn size_of(&self, coordinates: &Coordinates) -> Option<u64> {
        self.sizes
            .get(&coordinates.gav())
            .or_else(|| self.sizes.get(&coordinates.identifier))
            .copied()
    }

    /// Coordinates for what the user asked about, matched by identifier or
    /// gav against usages, graphs and declarations in that order
    pub fn resolve(&self, requested: &str) -> Coordinates {
        let matches = |c: &Coordinates| c.identifier == requested || c.gav() == requested;

        let from_usages = self.usages.keys().map(|raw| Coordinates::parse(raw));
        let from_graphs = self
            .graphs
            .values()
            .flatten()
            .flat_map(|(from, to)| [Coordinates::parse(from), Coordinates::parse(to)]);
        let from_declarations = self
            .declarations
            .iter()
            .map(|d| Coordinates::from_identifier(&d.identifier));

        from_usages
            .chain(from_graphs)
            .chain(from_declarations)
            .find(|c| matches(c))
            .unwrap_or_else(|| Coordinates::parse(requested))
    }
}
