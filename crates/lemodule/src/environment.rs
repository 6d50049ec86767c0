// Python Environment
//
// *L'Environnement* (The Environment) - what the target interpreter considers standard
// library, installed packages and compiled-in modules

use crate::stdlib::BUILTIN_MODULE_NAMES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Default interpreter executable
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Script run by [`PythonEnvironment::probe`]; prints one JSON object on stdout
const PROBE_SCRIPT: &str = r#"
import json, sys, sysconfig
paths = sysconfig.get_paths()
print(json.dumps({
    "stdlib_dirs": sorted({paths["stdlib"], paths["platstdlib"]}),
    "site_dirs": sorted({paths["purelib"], paths["platlib"]}),
    "builtin_modules": sorted(sys.builtin_module_names),
    "sys_path": [p for p in sys.path if p],
}))
"#;

/// Errors raised while querying an interpreter
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// The interpreter could not be started
    #[error("failed to run {interpreter}: {source}")]
    Spawn {
        /// Interpreter command
        interpreter: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The interpreter ran but the probe failed
    #[error("{interpreter} exited with {status}: {stderr}")]
    ProbeFailed {
        /// Interpreter command
        interpreter: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The probe printed something unexpected
    #[error("invalid probe output: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// Search layout of a Python interpreter
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PythonEnvironment {
    /// Directories holding the standard library
    pub stdlib_dirs: Vec<PathBuf>,
    /// Directories holding installed packages
    pub site_dirs: Vec<PathBuf>,
    /// Modules compiled into the interpreter
    pub builtin_modules: BTreeSet<String>,
    /// Module search path, in lookup order
    pub sys_path: Vec<PathBuf>,
}

impl PythonEnvironment {
    /// Query `interpreter` for its layout
    pub fn probe(interpreter: &str) -> Result<Self, EnvironmentError> {
        let output = Command::new(interpreter)
            .args(["-c", PROBE_SCRIPT])
            .output()
            .map_err(|source| EnvironmentError::Spawn {
                interpreter: interpreter.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(EnvironmentError::ProbeFailed {
                interpreter: interpreter.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let environment: PythonEnvironment = serde_json::from_slice(&output.stdout)?;
        tracing::debug!(
            interpreter,
            stdlib = environment.stdlib_dirs.len(),
            sys_path = environment.sys_path.len(),
            "probed Python environment"
        );
        Ok(environment.canonicalized())
    }

    /// Probe `interpreter`, falling back to [`fallback`](Self::fallback) on failure
    pub fn detect(interpreter: &str) -> Self {
        match Self::probe(interpreter) {
            Ok(environment) => environment,
            Err(e) => {
                tracing::warn!("Could not probe {}: {}. Using built-in module tables.", interpreter, e);
                Self::fallback()
            }
        }
    }

    /// Environment with no search path, classifying stdlib by compiled-in name tables
    pub fn fallback() -> Self {
        Self {
            builtin_modules: BUILTIN_MODULE_NAMES.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Whether `name` is compiled into the interpreter
    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtin_modules.contains(name)
    }

    /// Whether stdlib locations are known
    pub fn has_stdlib_dirs(&self) -> bool {
        !self.stdlib_dirs.is_empty()
    }

    /// Whether `path` lies in the standard library and not among installed packages
    pub fn is_stdlib_path(&self, path: &Path) -> bool {
        let in_stdlib = self.stdlib_dirs.iter().any(|dir| path.starts_with(dir));
        let in_site = self.site_dirs.iter().any(|dir| path.starts_with(dir));
        in_stdlib && !in_site
    }

    fn canonicalized(mut self) -> Self {
        let canonical = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
            paths
                .into_iter()
                .map(|p| std::fs::canonicalize(&p).unwrap_or(p))
                .collect()
        };
        self.stdlib_dirs = canonical(self.stdlib_dirs);
        self.site_dirs = canonical(self.site_dirs);
        self.sys_path = canonical(self.sys_path);
        self
    }
}
