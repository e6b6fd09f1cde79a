use serde::{Deserialize, Serialize};
use std::fmt;

/// A build variant such as `main`, `debug` or `release`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(String);

impl Variant {
    pub const MAIN: &'static str = "main";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }

    /// Configuration name for `base` in this variant
    pub fn configuration(&self, base: &str) -> String {
        qualified_configuration(self, base)
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Variant {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The one naming rule for variant configurations: `base` in `main`,
/// `<variant><Base>` otherwise.
pub fn qualified_configuration(variant: &Variant, base: &str) -> String {
    if variant.is_main() {
        base.to_string()
    } else {
        format!("{}{}", variant.name(), capitalize(base))
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
