use super::{ends_with_ignore_case, ModelError, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a dependency belongs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "implementation")]
    Impl,
    #[serde(rename = "compileOnly")]
    CompileOnly,
    #[serde(rename = "runtimeOnly")]
    RuntimeOnly,
    /// Not used at all
    #[serde(rename = "none", alias = "n/a")]
    None,
}

impl Bucket {
    pub fn value(&self) -> &'static str {
        match self {
            Bucket::Api => "api",
            Bucket::Impl => "implementation",
            Bucket::CompileOnly => "compileOnly",
            Bucket::RuntimeOnly => "runtimeOnly",
            Bucket::None => "n/a",
        }
    }

    /// Classify a configuration name by its suffix, ignoring case
    ///
    /// `compileOnlyApi` and `providedCompile` count as compile-only.
    pub fn of(configuration: &str) -> Result<Bucket, ModelError> {
        if ends_with_ignore_case(configuration, "compileOnly")
            || ends_with_ignore_case(configuration, "compileOnlyApi")
            || ends_with_ignore_case(configuration, "providedCompile")
        {
            return Ok(Bucket::CompileOnly);
        }

        [Bucket::Api, Bucket::Impl, Bucket::RuntimeOnly]
            .into_iter()
            .find(|bucket| ends_with_ignore_case(configuration, bucket.value()))
            .ok_or_else(|| ModelError::UnknownConfiguration(configuration.to_string()))
    }

    /// Configuration name for this bucket in `variant`. Meaningless for
    /// [`Bucket::None`].
    pub fn configuration(&self, variant: &Variant) -> String {
        variant.configuration(self.value())
    }

    pub fn is_used(&self) -> bool {
        *self != Bucket::None
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
