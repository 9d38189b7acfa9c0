//! Error types for image construction, decoding and the CLI layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the node model, codec, resolver, importer and assembler.
///
/// Every variant is fatal to the operation that produced it; no partial tree
/// or partial image is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("Id allocator exhausted: at most {limit} nodes may be created in one session")]
    CapacityExceeded { limit: u64 },

    #[error("Name too long: {name:?} is {len} bytes (max {max})")]
    NameTooLong { name: String, len: usize, max: usize },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("File {name:?} is too large: {len} bytes")]
    ContentTooLarge { name: String, len: usize },

    #[error("Directory {name:?} has too many children: {count}")]
    TooManyChildren { name: String, count: usize },

    #[error("Truncated input: needed {needed} bytes for {field} at offset {offset}, {remaining} remaining")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Unsupported flags {flags:#010x} at offset {offset}")]
    UnsupportedFlags { flags: u32, offset: usize },

    #[error("Unsupported image version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("No entry named {0:?} in this directory")]
    NotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Path is empty")]
    EmptyPath,

    #[error("Path must be relative: {0}")]
    AbsolutePath(String),

    #[error("Offset {0} does not fit in the 4-byte entry offset field")]
    OffsetOverflow(u64),

    #[error("Directory nesting exceeds the maximum depth of {max}")]
    DepthExceeded { max: usize },

    #[error("Failed to import {path:?}: {source}")]
    ImportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VfsError {
    pub(crate) fn import_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VfsError::ImportIo {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by the command layer (CLI, configuration, logging).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Vfs(#[from] VfsError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

pub type Result<T, E = VfsError> = std::result::Result<T, E>;
