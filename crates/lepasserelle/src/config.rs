// Project Configuration
//
// *La Configuration* (The Configuration) - Project settings for LeSerpent

use anyhow::{Context, Result};
use lemodule::DEFAULT_INTERPRETER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration directory inside a project
pub const CONFIG_DIR: &str = ".leserpent";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".leserpent/config.toml";

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Traversal settings
    pub analysis: AnalysisConfig,

    /// Interpreter settings
    pub python: PythonConfig,

    /// Rendering settings
    pub output: OutputConfig,
}

impl ProjectConfig {
    /// Load configuration from a project directory
    ///
    /// Looks for `.leserpent/config.toml` in the project directory.
    /// If not found, returns default configuration.
    pub fn load<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        let config_path = project_path.as_ref().join(DEFAULT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        Self::load_file(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::debug!("loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Save configuration to a project directory
    ///
    /// Creates `.leserpent` directory if it doesn't exist.
    pub fn save<P: AsRef<Path>>(&self, project_path: P) -> Result<()> {
        let config_dir = project_path.as_ref().join(CONFIG_DIR);
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

        let config_path = config_dir.join("config.toml");

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(&config_path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }
}

/// Traversal configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Truncate imported names to this many segments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<NonZeroUsize>,

    /// Module prefixes left out of the graph
    pub ignore_modules: Vec<String>,
}

/// Interpreter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PythonConfig {
    /// Interpreter probed for its search path
    pub interpreter: String,

    /// Whether to run the interpreter at all
    pub probe: bool,

    /// Extra directories searched after the project source root
    pub search_paths: Vec<PathBuf>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            probe: true,
            search_paths: Vec::new(),
        }
    }
}

impl PythonConfig {
    /// Search paths with relative entries anchored at `base`
    pub fn resolved_search_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    base.join(path)
                }
            })
            .collect()
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Rendering format
    pub format: OutputFormat,

    /// Write to this file instead of standard output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Supported rendering formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented text tree
    #[default]
    Tree,
    /// Graphviz DOT
    Dot,
    /// JSON snapshot
    Json,
}
