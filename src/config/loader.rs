use crate::model::Advice;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for depadvice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which advice to drop after analysis
    pub issues: IssuesConfig,

    /// Display aliases for identifiers, e.g. version catalog accessors
    pub dependency_map: BTreeMap<String, String>,

    /// Report configuration
    pub report: ReportConfig,

    /// Analysis configuration
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuesConfig {
    /// Applies to every kind of advice
    pub on_any: IssueRule,

    /// Remove advice
    pub on_unused_dependencies: IssueRule,

    /// Add advice
    pub on_used_transitive_dependencies: IssueRule,

    /// Change advice
    pub on_incorrect_configuration: IssueRule,

    /// Advice moving a dependency to compileOnly
    pub on_compile_only: IssueRule,

    /// Advice moving a dependency to runtimeOnly
    pub on_runtime_only: IssueRule,

    /// Removal of unused annotation processors
    pub on_unused_annotation_processors: IssueRule,

    /// Never report anything about kapt declarations
    pub ignore_kapt: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueRule {
    /// Identifier or coordinate patterns; `*` matches any run of characters
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Colorize terminal output
    pub colors: bool,

    /// List advice that was filtered out
    pub show_filtered: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analyze dependencies in parallel
    pub parallel: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            colors: true,
            show_filtered: false,
        }
    }
}

impl IssueRule {
    pub fn matches(&self, advice: &Advice) -> bool {
        let identifier = &advice.coordinates.identifier;
        let gav = advice.coordinates.gav();
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, identifier) || glob_match(pattern, &gav))
    }
}

impl IssuesConfig {
    /// Rules that apply to this kind of advice, `on_any` first
    pub fn rules_for<'a>(&'a self, advice: &Advice) -> Vec<&'a IssueRule> {
        let mut rules = vec![&self.on_any];
        if advice.is_remove() {
            rules.push(&self.on_unused_dependencies);
        }
        if advice.is_add() {
            rules.push(&self.on_used_transitive_dependencies);
        }
        if advice.is_change() {
            rules.push(&self.on_incorrect_configuration);
        }
        if advice.is_compile_only() {
            rules.push(&self.on_compile_only);
        }
        if advice.is_runtime_only() {
            rules.push(&self.on_runtime_only);
        }
        if advice.is_processor() {
            rules.push(&self.on_unused_annotation_processors);
        }
        rules
    }

    pub fn should_exclude(&self, advice: &Advice) -> bool {
        if self.ignore_kapt && touches_kapt(advice) {
            return true;
        }
        self.rules_for(advice).iter().any(|rule| rule.matches(advice))
    }
}

fn touches_kapt(advice: &Advice) -> bool {
    [&advice.from_configuration, &advice.to_configuration]
        .into_iter()
        .flatten()
        .any(|c| c.to_ascii_lowercase().ends_with("kapt"))
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".depadvice.yml",
            ".depadvice.yaml",
            ".depadvice.toml",
            "depadvice.yml",
            "depadvice.yaml",
            "depadvice.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}

/// Glob matching where `*` matches any run of characters, e.g.
/// `com.squareup.*`, `*:okio` or `androidx.*:core*`
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return text == pattern;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return false,
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return text == *first,
    };

    if !text.starts_with(first) {
        return false;
    }
    let mut remaining = &text[first.len()..];

    for part in middle {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    remaining.len() >= last.len() && remaining.ends_with(last)
}
