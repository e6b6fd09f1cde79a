//! depadvice - Dependency graph analysis and declaration advice for
//! multi-module Gradle builds
//!
//! This library answers two questions about a module's dependencies: how
//! should each one be declared, and why.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Input** - Load classpath graphs, declarations and observed usages
//! 2. **Graph Building** - One [`DependencyGraph`] per classpath view
//! 3. **Advice** - Reduce each dependency's usages against its declarations
//! 4. **Filtering** - Drop advice matching the user's exclude rules
//! 5. **Explanation** - Shortest paths and reasons behind one dependency's advice
//! 6. **Size Trees** - Dominance-based attribution of artifact sizes

pub mod analysis;
pub mod cache;
pub mod config;
pub mod graph;
pub mod input;
pub mod model;
pub mod reason;
pub mod report;

pub use analysis::{AdviceFilter, ModuleAnalysis, ModuleInput, ProjectAnalyzer, StandardTransform, UsageTransform};
pub use cache::DominanceCache;
pub use config::Config;
pub use graph::{Coordinates, DependencyGraph, DependencySizeTree, DominanceTree, GraphBuilder, GraphError};
pub use input::AnalysisInput;
pub use model::{Advice, AdviceError, Bucket, Location, ModelError, Reason, Usage, Variant};
pub use reason::{BundleTrace, DependencyAdviceExplainer, ReasonError};
pub use report::{AdviceReporter, DominanceTreeWriter};
