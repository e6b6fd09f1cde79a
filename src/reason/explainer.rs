use super::{BundleTrace, ReasonError};
use crate::graph::{Coordinates, DependencyGraph, GraphError, Node};
use crate::model::{Advice, Reason, Usage};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write;

const RULE_LENGTH: usize = 60;

/// Indentation per hop in a printed path
const HOP_INDENT: &str = "      ";

#[derive(Clone, Copy)]
enum Style {
    Bold,
    Green,
    Red,
    Yellow,
}

/// Explains the advice (or lack of it) for one dependency: the advice
/// itself, the shortest path to it in every classpath view, and the usages
/// that drove the decision
pub struct DependencyAdviceExplainer<'a> {
    project: &'a Coordinates,
    requested: &'a Coordinates,
    target: &'a Coordinates,
    requested_capability: Option<&'a str>,
    usages: &'a [Usage],
    advice: Option<&'a Advice>,
    graphs: &'a BTreeMap<String, DependencyGraph>,
    bundle_traces: &'a [BundleTrace],
    was_filtered: bool,
    dependency_map: Option<&'a BTreeMap<String, String>>,
    colorize: bool,
}

impl<'a> DependencyAdviceExplainer<'a> {
    /// `graphs` maps a classpath view name to its graph
    pub fn new(
        project: &'a Coordinates,
        target: &'a Coordinates,
        graphs: &'a BTreeMap<String, DependencyGraph>,
    ) -> Self {
        Self {
            project,
            requested: target,
            target,
            requested_capability: None,
            usages: &[],
            advice: None,
            graphs,
            bundle_traces: &[],
            was_filtered: false,
            dependency_map: None,
            colorize: false,
        }
    }

    /// What the user typed, when it differs from the resolved target
    pub fn with_requested(mut self, requested: &'a Coordinates) -> Self {
        self.requested = requested;
        self
    }

    pub fn with_capability(mut self, capability: &'a str) -> Self {
        self.requested_capability = Some(capability);
        self
    }

    pub fn with_usages(mut self, usages: &'a [Usage]) -> Self {
        self.usages = usages;
        self
    }

    pub fn with_advice(mut self, advice: Option<&'a Advice>) -> Self {
        self.advice = advice;
        self
    }

    pub fn with_bundle_traces(mut self, traces: &'a [BundleTrace]) -> Self {
        self.bundle_traces = traces;
        self
    }

    pub fn with_filtered(mut self, was_filtered: bool) -> Self {
        self.was_filtered = was_filtered;
        self
    }

    pub fn with_dependency_map(mut self, map: &'a BTreeMap<String, String>) -> Self {
        self.dependency_map = Some(map);
        self
    }

    pub fn with_colors(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn compute_reason(&self) -> Result<String, ReasonError> {
        let mut out = String::new();
        let rule = "-".repeat(RULE_LENGTH);

        writeln!(out)?;
        writeln!(out, "{}", self.paint(&rule, Style::Bold))?;

        let mut question = format!(
            "You asked about the dependency '{}'",
            self.printable_identifier(self.requested)
        );
        if let Some(capability) = self.requested_capability.filter(|c| !c.trim().is_empty()) {
            write!(question, ", with the capability '{}'", capability)?;
        }
        question.push('.');
        writeln!(out, "{}", self.paint(&question, Style::Bold))?;

        writeln!(out, "{}", self.advice_text()?)?;
        writeln!(out, "{}", self.paint(&rule, Style::Bold))?;

        for (name, graph) in self.graphs {
            self.print_graph(&mut out, name, graph)?;
        }

        self.print_usages(&mut out)?;

        Ok(out)
    }

    fn advice_text(&self) -> Result<String, ReasonError> {
        let bundle = self.paint("bundle", Style::Bold);

        let Some(advice) = self.advice else {
            let text = if !self.bundle_traces.is_empty() {
                let trace = self.find_trace().ok_or_else(|| ReasonError::MissingBundleTrace {
                    target: self.target.gav(),
                    available: self
                        .bundle_traces
                        .iter()
                        .map(|t| format!("{} -> {}", t.top(), t.bottom()))
                        .collect::<Vec<_>>()
                        .join(", "),
                })?;
                let (subject, clause) = match trace {
                    BundleTrace::DeclaredParent { parent, .. } => (parent, "which is already declared"),
                    BundleTrace::UsedChild { child, .. } => (child, "which is declared and used"),
                    BundleTrace::PrimaryMap { primary, .. } => {
                        (primary, "which is already present in the dependency graph")
                    }
                };
                format!(
                    "There is no advice regarding this dependency.\nIt was removed because it matched a {} rule for {}, {}.",
                    bundle,
                    self.paint(&self.printable_identifier(subject), Style::Bold),
                    clause
                )
            } else if self.was_filtered {
                format!(
                    "There is no advice regarding this dependency.\nIt was removed because it matched an {} rule.",
                    self.paint("exclude", Style::Bold)
                )
            } else {
                "There is no advice regarding this dependency.".to_string()
            };
            return Ok(text);
        };

        match (&advice.from_configuration, &advice.to_configuration) {
            (None, Some(to)) => {
                let sentence = format!(
                    "You have been advised to add this dependency to '{}'.",
                    self.paint(to, Style::Green)
                );
                match self.find_trace() {
                    None => Ok(sentence),
                    Some(BundleTrace::PrimaryMap {
                        primary,
                        subordinate,
                    }) => Ok(format!(
                        "{}\nIt matched a {} rule: {} was substituted for {}.",
                        sentence,
                        bundle,
                        self.paint(&self.printable_identifier(primary), Style::Bold),
                        self.paint(&self.printable_identifier(subordinate), Style::Bold)
                    )),
                    Some(_) => Err(ReasonError::UnexpectedBundleTrace(self.target.gav())),
                }
            }
            (Some(from), None) if advice.is_remove() || advice.is_processor() => Ok(format!(
                "You have been advised to remove this dependency from '{}'.",
                self.paint(from, Style::Red)
            )),
            (Some(from), Some(to))
                if advice.is_change() || advice.is_runtime_only() || advice.is_compile_only() =>
            {
                Ok(format!(
                    "You have been advised to change this dependency to '{}' from '{}'.",
                    self.paint(to, Style::Green),
                    self.paint(from, Style::Yellow)
                ))
            }
            _ => Err(ReasonError::UnknownAdvice(advice.to_string())),
        }
    }

    fn find_trace(&self) -> Option<&'a BundleTrace> {
        self.bundle_traces.iter().find(|t| t.involves(self.target))
    }

    fn print_graph(
        &self,
        out: &mut String,
        name: &str,
        graph: &DependencyGraph,
    ) -> Result<(), ReasonError> {
        // Every view must be rooted at the project; only the target may be missing
        if !graph.contains(&self.project.identifier) {
            return Err(GraphError::MissingNode(self.project.identifier.clone()).into());
        }

        let target_in_graph = graph
            .nodes()
            .map(Node::coordinates)
            .find(|c| c.identifier == self.target.identifier && self.matches_target_capabilities(c));

        let path = match target_in_graph {
            Some(target) => graph.shortest_path(&self.project.identifier, &target.identifier)?,
            None => Vec::new(),
        };

        writeln!(out)?;
        if path.is_empty() {
            let line = format!(
                "There is no path from {} to {} for {}",
                self.project_name(),
                self.printable_identifier(self.target),
                name
            );
            writeln!(out, "{}", self.paint(&line, Style::Bold))?;
            return Ok(());
        }

        let heading = format!(
            "Shortest path from {} to {} for {}:",
            self.project_name(),
            self.printable_identifier(self.requested),
            name
        );
        writeln!(out, "{}", self.paint(&heading, Style::Bold))?;
        writeln!(out, "{}", self.project.gav())?;

        for (depth, node) in path.iter().skip(1).enumerate() {
            writeln!(
                out,
                "{}\\--- {}{}",
                HOP_INDENT.repeat(depth),
                node.coordinates().gav(),
                capabilities_suffix(node.coordinates())
            )?;
        }
        Ok(())
    }

    fn print_usages(&self, out: &mut String) -> Result<(), ReasonError> {
        if self.usages.is_empty() {
            writeln!(out)?;
            writeln!(out, "No compile-time usages detected for this runtime-only dependency.")?;
            return Ok(());
        }

        for usage in self.usages {
            let source = format!("Source: {}", usage.variant);
            writeln!(out)?;
            writeln!(out, "{}", self.paint(&source, Style::Bold))?;
            writeln!(out, "{}", self.paint(&"-".repeat(source.len()), Style::Bold))?;

            let reasons: Vec<&Reason> = usage.reasons.iter().filter(|r| !r.is_marker()).collect();
            let is_compile_only = reasons.iter().any(|r| r.is_compile_time_annotations());
            for reason in &reasons {
                writeln!(out, "* {}", reason.describe(&usage.variant, is_compile_only))?;
            }
            if reasons.is_empty() {
                writeln!(out, "(no usages)")?;
            }
        }
        Ok(())
    }

    /// Same variant identification, or the target asks for no capability and
    /// the candidate only has its default one
    fn matches_target_capabilities(&self, candidate: &Coordinates) -> bool {
        candidate.variant_identification == self.target.variant_identification
            || (self.target.capabilities().is_empty() && candidate.has_default_capability())
    }

    /// `gav (alias)` when the dependency map knows the coordinates
    fn printable_identifier(&self, coordinates: &Coordinates) -> String {
        let gav = coordinates.gav();
        let mapped = self.dependency_map.and_then(|map| {
            map.get(&gav)
                .or_else(|| map.get(&coordinates.identifier))
                .filter(|alias| !alias.trim().is_empty())
        });
        match mapped {
            Some(alias) => format!("{} ({})", gav, alias),
            None => gav,
        }
    }

    fn project_name(&self) -> String {
        let gav = self.project.gav();
        if gav == ":" {
            "root project".to_string()
        } else {
            gav
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if !self.colorize {
            return text.to_string();
        }
        match style {
            Style::Bold => text.bold().to_string(),
            Style::Green => text.green().to_string(),
            Style::Red => text.red().to_string(),
            Style::Yellow => text.yellow().to_string(),
        }
    }
}

fn capabilities_suffix(node: &Coordinates) -> String {
    let prefix = format!("{}-", node.identifier);
    let capabilities: Vec<&str> = node
        .capabilities()
        .iter()
        .filter(|c| **c != node.identifier)
        .map(|c| c.strip_prefix(prefix.as_str()).unwrap_or(c))
        .collect();

    if capabilities.is_empty() {
        String::new()
    } else {
        format!(" (capabilities: [{}])", capabilities.join(", "))
    }
}
