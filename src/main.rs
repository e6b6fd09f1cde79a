use clap::{Parser, Subcommand};
use colored::Colorize;
use depadvice::graph::VariantIdentification;
use depadvice::{
    AdviceFilter, AdviceReporter, AnalysisInput, Config, DependencyAdviceExplainer,
    DependencySizeTree, DominanceCache, DominanceTreeWriter, ModuleAnalysis, ProjectAnalyzer,
};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// depadvice - Dependency declaration advice for Gradle modules
#[derive(Parser, Debug)]
#[command(name = "depadvice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Analyze dependencies in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// List advice removed by exclude rules
    #[arg(long, global = true)]
    show_filtered: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute and print advice for the module
    Advice {
        /// Analysis input file (YAML, TOML or JSON)
        input: PathBuf,
    },

    /// Explain the advice for one dependency
    Reason {
        /// Analysis input file (YAML, TOML or JSON)
        input: PathBuf,

        /// Identifier or coordinates of the dependency, e.g. com.squareup.okio:okio
        #[arg(long)]
        id: String,

        /// Capability of the dependency, for test fixtures and similar variants
        #[arg(long)]
        capability: Option<String>,
    },

    /// Print the dominance size tree of a classpath view
    SizeTree {
        /// Analysis input file (YAML, TOML or JSON)
        input: PathBuf,

        /// Classpath view to print; every view when omitted
        #[arg(long)]
        view: Option<String>,
    },
}

impl Command {
    fn input(&self) -> &Path {
        match self {
            Command::Advice { input }
            | Command::Reason { input, .. }
            | Command::SizeTree { input, .. } => input,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("depadvice v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;
    if !config.report.colors {
        colored::control::set_override(false);
    }

    let input = AnalysisInput::from_file(cli.command.input())?;

    match &cli.command {
        Command::Advice { .. } => run_advice(&config, &input),
        Command::Reason { id, capability, .. } => {
            run_reason(&config, &input, id, capability.as_deref())
        }
        Command::SizeTree { view, .. } => run_size_tree(&input, view.as_deref()),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from next to the input file
        let input_dir = cli
            .command
            .input()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Config::from_default_locations(input_dir)?
    };

    // Override with CLI arguments
    if cli.parallel {
        config.analysis.parallel = true;
    }
    if cli.show_filtered {
        config.report.show_filtered = true;
    }
    if cli.no_color {
        config.report.colors = false;
    }

    Ok(config)
}

fn analyze(config: &Config, input: &AnalysisInput) -> Result<ModuleAnalysis> {
    let module = input
        .module_input()
        .into_diagnostic()
        .wrap_err("Invalid analysis input")?;

    let analyzer = ProjectAnalyzer::new()
        .with_filter(AdviceFilter::from_config(&config.issues))
        .with_parallel(config.analysis.parallel);

    analyzer
        .analyze(&module)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to compute advice for {}", module.project))
}

fn run_advice(config: &Config, input: &AnalysisInput) -> Result<()> {
    let analysis = analyze(config, input)?;

    AdviceReporter::new()
        .with_filtered(config.report.show_filtered)
        .with_colors(config.report.colors)
        .report(&analysis)
}

fn run_reason(
    config: &Config,
    input: &AnalysisInput,
    id: &str,
    capability: Option<&str>,
) -> Result<()> {
    let analysis = analyze(config, input)?;
    let module = input.module_input().into_diagnostic()?;

    let requested = input.resolve(id);
    let target = match capability {
        Some(capability) => requested
            .clone()
            .with_variant_identification(VariantIdentification::with_capability(capability)),
        None => requested.clone(),
    };

    let usages = module
        .dependencies()
        .into_iter()
        .find(|(coordinates, _)| coordinates.identifier == target.identifier)
        .map(|(_, usages)| usages)
        .unwrap_or_default();

    let advice = analysis.advice_for(&target.identifier);
    if advice.len() > 1 {
        debug!(
            "{} has {} pieces of advice; explaining '{}'",
            target,
            advice.len(),
            advice[0]
        );
    }

    let graphs = input.graphs();
    let traces = input.bundle_traces();

    let mut explainer = DependencyAdviceExplainer::new(&module.project, &target, &graphs)
        .with_requested(&requested)
        .with_usages(&usages)
        .with_advice(advice.first().copied())
        .with_bundle_traces(&traces)
        .with_filtered(analysis.was_filtered(&target.identifier))
        .with_dependency_map(&config.dependency_map)
        .with_colors(config.report.colors);
    if let Some(capability) = capability {
        explainer = explainer.with_capability(capability);
    }

    let text = explainer
        .compute_reason()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to explain {}", id))?;
    print!("{}", text);

    Ok(())
}

fn run_size_tree(input: &AnalysisInput, view: Option<&str>) -> Result<()> {
    let graphs = input.graphs();

    let selected: Vec<&String> = match view {
        Some(view) => {
            let name = graphs
                .keys()
                .find(|name| name.as_str() == view)
                .ok_or_else(|| {
                    let available: Vec<&str> = graphs.keys().map(String::as_str).collect();
                    miette::miette!(
                        "No classpath view named '{}' (available: {})",
                        view,
                        available.join(", ")
                    )
                })?;
            vec![name]
        }
        None => graphs.keys().collect(),
    };

    let cache = DominanceCache::new();
    let writer = DominanceTreeWriter::new();

    for (i, name) in selected.iter().enumerate() {
        let tree = cache
            .get_or_compute(&graphs[name.as_str()], &input.project)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to compute dominance tree for {}", name))?;

        let size_tree = DependencySizeTree::from_dominance_tree(
            &tree,
            |coordinates| input.size_of(coordinates),
            DependencySizeTree::by_tree_size_descending,
        );

        if selected.len() > 1 {
            if i > 0 {
                println!();
            }
            println!("{}", format!("{}:", name).bold());
        }
        print!("{}", writer.render(&size_tree));
    }

    info!("{}", cache.stats());
    Ok(())
}
