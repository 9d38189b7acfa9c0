//! Configuration
//!
//! Layered with the `config` crate. Precedence, lowest to highest: built-in
//! defaults, global file, `vfsimage.toml` in the working directory,
//! `VFSIMAGE__*` environment variables (`__` separates nested keys, e.g.
//! `VFSIMAGE__LOGGING__LEVEL=debug`).

mod facade;
mod sources;

pub use facade::ConfigLoader;

use crate::image::{ImageBuilder, ImageRevision};
use crate::logging::LoggingConfig;
use crate::types::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "vfsimage.toml";

fn default_output() -> PathBuf {
    PathBuf::from("initrd.vfs")
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

/// Image build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Output path used when `build` is not given one
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Layout revision written by `build`
    #[serde(default)]
    pub revision: ImageRevision,

    /// Deepest directory nesting accepted on import and decode
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Follow symbolic links while importing
    #[serde(default = "default_true")]
    pub follow_links: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            revision: ImageRevision::default(),
            max_depth: default_max_depth(),
            follow_links: default_true(),
        }
    }
}

impl ImageConfig {
    /// Builder for `revision` carrying this section's import limits
    pub fn builder(&self, revision: ImageRevision) -> ImageBuilder {
        ImageBuilder::new(revision)
            .max_depth(self.max_depth)
            .follow_links(self.follow_links)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VfsImageConfig {
    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
