use super::{Bucket, ModelError, Variant};
use serde::Serialize;
use std::fmt;

/// A declaration of a dependency in a build script
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    identifier: String,
    configuration_name: String,
    variant: Variant,
    bucket: Bucket,
}

impl Location {
    /// The bucket is derived from the configuration name
    pub fn new(
        identifier: impl Into<String>,
        configuration_name: impl Into<String>,
        variant: Variant,
    ) -> Result<Self, ModelError> {
        let configuration_name = configuration_name.into();
        let bucket = Bucket::of(&configuration_name)?;
        Ok(Self {
            identifier: identifier.into(),
            configuration_name,
            variant,
            bucket,
        })
    }

    pub fn main(
        identifier: impl Into<String>,
        configuration_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Self::new(identifier, configuration_name, Variant::main())
    }

    /// Infer the variant from a qualified configuration name such as
    /// `debugImplementation`, falling back to `main`
    pub fn infer(
        identifier: impl Into<String>,
        configuration_name: impl Into<String>,
        variants: &[Variant],
    ) -> Result<Self, ModelError> {
        let configuration_name = configuration_name.into();
        let bucket = Bucket::of(&configuration_name)?;
        let variant = variants
            .iter()
            .filter(|v| !v.is_main())
            .find(|v| {
                configuration_name.len() > v.name().len()
                    && configuration_name.starts_with(v.name())
                    && configuration_name[v.name().len()..].starts_with(|c: char| c.is_uppercase())
            })
            .cloned()
            .unwrap_or_default();
        Ok(Self {
            identifier: identifier.into(),
            configuration_name,
            variant,
            bucket,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn configuration_name(&self) -> &str {
        &self.configuration_name
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn is_main(&self) -> bool {
        self.variant.is_main()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}')", self.configuration_name, self.identifier)
    }
}
