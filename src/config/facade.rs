//! ConfigLoader facade over the layered sources.

use super::sources;
use super::VfsImageConfig;
use config::{Config, ConfigError, File};
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a run started in `working_dir`.
    /// Precedence: global file (lowest) -> local file -> environment (highest).
    pub fn load(working_dir: &Path) -> Result<VfsImageConfig, ConfigError> {
        let builder = Config::builder();
        let builder = sources::add_global_file(builder);
        let builder = sources::add_local_file(builder, working_dir);
        let builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<VfsImageConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).required(true));
        let builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    /// Create default configuration.
    pub fn default() -> VfsImageConfig {
        VfsImageConfig::default()
    }
}
