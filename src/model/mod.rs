//! Usage and advice model
//!
//! Declarations are [`Location`]s, observed usage is a [`Usage`] per variant,
//! and the outcome of analysis is a set of [`Advice`].

mod advice;
mod bucket;
mod location;
mod reason;
mod usage;
mod variant;

pub use advice::{Advice, AdviceError};
pub use bucket::Bucket;
pub use location::Location;
pub use reason::{AndroidComponent, ProcessorSource, Reason};
pub use usage::{Usage, UsageBuilder};
pub use variant::{capitalize, qualified_configuration, Variant};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown configuration '{0}': not an api, implementation, compileOnly or runtimeOnly bucket")]
    UnknownConfiguration(String),

    #[error("project path '{0}' must start with ':'")]
    InvalidProjectPath(String),
}

/// Case-insensitive suffix check
pub(crate) fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.is_char_boundary(value.len() - suffix.len())
        && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
