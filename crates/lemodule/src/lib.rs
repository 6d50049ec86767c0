//! lemodule - Module Naming and Resolution
//!
//! *Le Module* (The Module) - dotted names for source files, module search and provenance

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Dotted module name helpers.
pub mod name;
/// Source path to module name conversion.
pub mod naming;
/// Interpreter layout probing.
pub mod environment;
/// Module search and provenance classification.
pub mod resolver;
/// Standard-library name tables.
pub mod stdlib;

pub use environment::{EnvironmentError, PythonEnvironment, DEFAULT_INTERPRETER};
pub use name::{is_submodule, package_chain};
pub use naming::{
    find_module_root, module_root_path, path_to_module, project_root, source_root, NamingError,
};
pub use resolver::{
    classify, ModuleKind, ModuleResolver, PathResolver, Provenance, ResolvedModule,
};
pub use stdlib::is_known_stdlib;
