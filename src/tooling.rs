//! Tooling layer
//!
//! CLI commands, dump rendering and artifact staging built on top of the
//! image core.

pub mod cli;
pub mod format;
pub mod stage;

pub use cli::{Cli, CliContext, Commands};
pub use format::{format_dump_text, format_tree_text, DumpReport};
pub use stage::{stage_files, StagedFile};
