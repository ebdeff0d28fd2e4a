//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the questline binary.

mod commands;
mod run;

pub use commands::{CacheCommands, Cli, Commands, OutputFormat};
pub use run::{clear_cache, extract_file, load_catalog, load_config, next_quest, show_requirements};
