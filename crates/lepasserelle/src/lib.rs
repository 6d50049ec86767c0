// lepasserelle - Command-Line Front End
//
// *La Passerelle* (The Bridge) - configuration, rendering and the `leserpent` command

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Command-line interface.
pub mod cli;
/// Project configuration.
pub mod config;
/// Graph renderers.
pub mod render;

pub use cli::{Cli, Settings};
pub use config::{OutputFormat, ProjectConfig};
pub use render::{renderer_for, DotRenderer, GraphRenderer, JsonRenderer, TreeRenderer};
