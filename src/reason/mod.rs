//! Human-readable explanations for the advice on one dependency

mod bundle;
mod explainer;

pub use bundle::BundleTrace;
pub use explainer::DependencyAdviceExplainer;

use crate::graph::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReasonError {
    #[error("unknown advice type: {0}")]
    UnknownAdvice(String),

    #[error("no bundle trace involves '{target}' (available: {available})")]
    MissingBundleTrace { target: String, available: String },

    #[error("expected a primary map bundle trace for added dependency '{0}'")]
    UnexpectedBundleTrace(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to render explanation: {0}")]
    Render(#[from] std::fmt::Error),
}
