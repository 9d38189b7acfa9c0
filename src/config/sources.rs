//! Configuration sources: global file, working-directory file, environment.

use super::LOCAL_CONFIG_FILE;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::{Path, PathBuf};

/// Global config file (`<platform config dir>/vfsimage/config.toml`)
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "vfsimage")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn add_global_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    }
}

pub fn add_local_file(builder: ConfigBuilder<DefaultState>, dir: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(dir.join(LOCAL_CONFIG_FILE)).required(false))
}

/// VFSIMAGE_ prefix with `__` as the nested key separator
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("VFSIMAGE")
            .separator("__")
            .try_parsing(true),
    )
}
