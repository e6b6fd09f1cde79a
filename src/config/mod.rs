mod loader;

pub use loader::{glob_match, AnalysisConfig, Config, IssueRule, IssuesConfig, ReportConfig};
