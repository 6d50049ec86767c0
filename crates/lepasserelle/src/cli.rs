// CLI Interface
//
// This module provides the command-line interface for LeSerpent.

use crate::config::{OutputFormat, ProjectConfig};
use crate::render::renderer_for;
use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use legraphe::{BuildOptions, DependencyGraph, GraphBuilder, GraphError, IgnoreSet};
use lemodule::{project_root, source_root, PathResolver, PythonEnvironment};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// LeSerpent - Python Import Graph Explorer
#[derive(Parser, Debug)]
#[command(name = "leserpent")]
#[command(author = "LeSerpent Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze Python import dependencies starting from one file", long_about = None)]
pub struct Cli {
    /// Path to the Python file to analyze
    #[arg(value_name = "FILE", value_parser = parse_entry_file)]
    pub file: PathBuf,

    /// Truncate imported module names to this many dotted segments
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<NonZeroUsize>,

    /// Leave a module and its submodules out of the graph (repeatable)
    #[arg(long = "ignore", value_name = "MODULE")]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(long = "format", short = 'f', value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the rendered graph to a file
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Interpreter used to discover the module search path
    #[arg(long = "python", value_name = "INTERP")]
    pub python: Option<String>,

    /// Do not run the interpreter; classify the standard library by name
    #[arg(long = "no-probe")]
    pub no_probe: bool,

    /// Report import cycles and fail if any exist
    #[arg(long = "check-cycles")]
    pub check_cycles: bool,

    /// Configuration file (default: <project>/.leserpent/config.toml)
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}

/// Accept only existing `.py` files
fn parse_entry_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", value));
    }
    if path.extension().map_or(true, |ext| ext != "py") {
        return Err("Input file must be a Python file".to_string());
    }
    Ok(path)
}

/// Settings after merging the configuration file with command-line flags
#[derive(Debug, Clone)]
pub struct Settings {
    /// Canonical entry file
    pub entry: PathBuf,
    /// Directory configuration and relative search paths are anchored at
    pub project_dir: PathBuf,
    /// Traversal options
    pub options: BuildOptions,
    /// Extra module search directories
    pub search_paths: Vec<PathBuf>,
    /// Interpreter to probe, `None` to skip probing
    pub interpreter: Option<String>,
    /// Rendering format
    pub format: OutputFormat,
    /// Output file, `None` for standard output
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Run the CLI
    pub fn run(self) -> AnyhowResult<()> {
        init_logging(self.verbose);

        let check_cycles = self.check_cycles;
        let settings = self.settings()?;
        let graph = build(&settings)?;
        write_graph(&graph, &settings)?;

        if check_cycles {
            check_cycles_impl(&graph)?;
        }
        Ok(())
    }

    /// Merge command-line flags over the project configuration
    pub fn settings(self) -> AnyhowResult<Settings> {
        let entry = self
            .file
            .canonicalize()
            .with_context(|| format!("Failed to canonicalize {}", self.file.display()))?;

        let project_dir = match project_root(&entry)? {
            Some(dir) => dir,
            None => source_root(&entry)?,
        };

        let config = match &self.config {
            Some(path) => ProjectConfig::load_file(path)?,
            None => ProjectConfig::load(&project_dir)?,
        };

        let mut ignore = config.analysis.ignore_modules.clone();
        ignore.extend(self.ignore);
        let ignore = IgnoreSet::new(ignore).context("Invalid module in ignore list")?;

        let options = BuildOptions::new()
            .with_max_depth(self.max_depth.or(config.analysis.max_depth))
            .with_ignore_modules(ignore);

        let interpreter = if self.no_probe || !config.python.probe {
            None
        } else {
            Some(self.python.unwrap_or_else(|| config.python.interpreter.clone()))
        };

        Ok(Settings {
            search_paths: config.python.resolved_search_paths(&project_dir),
            format: self.format.unwrap_or(config.output.format),
            output: self.output.or(config.output.path),
            entry,
            project_dir,
            options,
            interpreter,
        })
    }
}

/// Initialize logging
///
/// `RUST_LOG` wins unless `--verbose` is given.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Build the graph described by `settings`
pub fn build(settings: &Settings) -> AnyhowResult<DependencyGraph> {
    let environment = match &settings.interpreter {
        Some(interpreter) => PythonEnvironment::detect(interpreter),
        None => PythonEnvironment::fallback(),
    };

    let resolver = PathResolver::new(environment)
        .with_search_path(source_root(&settings.entry)?)
        .with_search_paths(settings.search_paths.iter().cloned());

    info!("Analyzing {}", settings.entry.display());
    GraphBuilder::new(resolver, settings.options.clone())
        .build(&settings.entry)
        .context("Failed to build dependency graph")
}

fn write_graph(graph: &DependencyGraph, settings: &Settings) -> AnyhowResult<()> {
    let renderer = renderer_for(settings.format);

    match &settings.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            let mut out = BufWriter::new(file);
            renderer
                .render(graph, &mut out)
                .and_then(|_| out.flush())
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("Wrote {}", display_relative(path, &settings.project_dir));
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            renderer
                .render(graph, &mut out)
                .context("Failed to write to standard output")?;
        }
    }
    Ok(())
}

fn check_cycles_impl(graph: &DependencyGraph) -> AnyhowResult<()> {
    match graph.check_acyclic() {
        Ok(()) => Ok(()),
        Err(GraphError::Cyclic(cycles)) => {
            for cycle in &cycles {
                eprintln!("{}", cycle);
            }
            anyhow::bail!("Dependency graph has {} cycle(s)", cycles.len())
        }
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Main entry point for the CLI
pub fn main() -> AnyhowResult<()> {
    let cli = Cli::parse();
    cli.run()
}
