use crate::analysis::ModuleAnalysis;
use crate::graph::Coordinates;
use crate::model::Advice;
use colored::Colorize;
use miette::Result;

/// Terminal reporter for a module's advice, grouped by kind
pub struct AdviceReporter {
    /// Also list advice removed by exclude rules
    show_filtered: bool,
    colors: bool,
}

impl AdviceReporter {
    pub fn new() -> Self {
        Self {
            show_filtered: false,
            colors: true,
        }
    }

    pub fn with_filtered(mut self, show: bool) -> Self {
        self.show_filtered = show;
        self
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn report(&self, analysis: &ModuleAnalysis) -> Result<()> {
        print!("{}", self.render(analysis));
        Ok(())
    }

    pub fn render(&self, analysis: &ModuleAnalysis) -> String {
        let mut out = String::new();

        if analysis.advice.is_empty() {
            let line = format!("No advice for {}. Dependencies are declared correctly!", analysis.project);
            out.push_str(&self.heading(&line, true));
            out.push('\n');
        } else {
            let sections: [(&str, Vec<&Advice>); 5] = [
                (
                    "Unused dependencies which should be removed:",
                    select(analysis, Advice::is_remove),
                ),
                (
                    "Transitively used dependencies that should be declared directly as indicated:",
                    select(analysis, Advice::is_add),
                ),
                (
                    "Existing dependencies which should be modified to be as indicated:",
                    select(analysis, |a| a.is_any_change() && !a.is_compile_only()),
                ),
                (
                    "Dependencies which could be compile-only:",
                    select(analysis, Advice::is_compile_only),
                ),
                (
                    "Unused annotation processors that should be removed:",
                    select(analysis, Advice::is_processor),
                ),
            ];

            let mut first = true;
            for (title, items) in sections.iter().filter(|(_, items)| !items.is_empty()) {
                if !first {
                    out.push('\n');
                }
                first = false;

                out.push_str(&self.heading(title, false));
                out.push('\n');
                for advice in items {
                    out.push_str(&self.line(advice));
                    out.push('\n');
                }
            }
        }

        if self.show_filtered && !analysis.filtered.is_empty() {
            out.push('\n');
            out.push_str(&self.heading("Advice excluded by configuration:", false));
            out.push('\n');
            for advice in &analysis.filtered {
                out.push_str(&format!("  {}\n", advice));
            }
        }

        out
    }

    fn line(&self, advice: &Advice) -> String {
        let identifier = printable_identifier(&advice.coordinates);
        match (&advice.from_configuration, &advice.to_configuration) {
            (Some(from), Some(to)) => {
                let was = format!("(was {})", from);
                let was = if self.colors {
                    was.dimmed().to_string()
                } else {
                    was
                };
                format!("  {}({}) {}", to, identifier, was)
            }
            (None, Some(to)) => format!("  {}({})", to, identifier),
            (Some(from), None) => format!("  {}({})", from, identifier),
            (None, None) => format!("  {}", identifier),
        }
    }

    fn heading(&self, text: &str, success: bool) -> String {
        match (self.colors, success) {
            (false, _) => text.to_string(),
            (true, true) => text.green().bold().to_string(),
            (true, false) => text.yellow().bold().to_string(),
        }
    }
}

impl Default for AdviceReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn select<P>(analysis: &ModuleAnalysis, predicate: P) -> Vec<&Advice>
where
    P: Fn(&Advice) -> bool,
{
    analysis.advice.iter().filter(|a| predicate(*a)).collect()
}

/// `project(":lib")` for projects, the quoted gav otherwise
fn printable_identifier(coordinates: &Coordinates) -> String {
    let gav = coordinates.gav();
    if coordinates.is_project() {
        format!("project(\"{}\")", gav)
    } else {
        format!("\"{}\"", gav)
    }
}
