//! CLI Tooling
//!
//! Command-line interface for building, inspecting and staging VFS images.

use crate::codec::DecodeOptions;
use crate::config::{ConfigLoader, VfsImageConfig};
use crate::error::ApiError;
use crate::image::{parse_image_with, ImageRevision};
use crate::logging::LoggingConfig;
use crate::tooling::format::{format_dump_text, DumpReport};
use crate::tooling::stage::stage_files;
use crate::tree::IdAllocator;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// vfsimage - build and inspect initial ramdisk images
#[derive(Parser, Debug)]
#[command(name = "vfsimage")]
#[command(about = "Build and inspect flat VFS initial ramdisk images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Pack a directory into an image
    Build {
        /// Directory that will act as the root of the virtual filesystem
        root: PathBuf,
        /// Path relative to root of the entry-point file
        #[arg(short, long)]
        entry: String,
        /// Output image path [default: from config, initrd.vfs]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the tagged layout with magic and version after the entry offset
        #[arg(long)]
        tagged: bool,
    },
    /// Print the contents of an existing image
    Dump {
        /// Image file to read
        image: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Show file sizes and a hex preview of contents
        #[arg(long)]
        contents: bool,
    },
    /// Copy build artifacts into a staging directory
    Stage {
        /// Space-separated paths to copy
        #[arg(long, required = true, num_args = 1.., value_delimiter = ' ')]
        files: Vec<PathBuf>,
        /// Space-separated destination paths relative to the staging directory
        #[arg(long, required = true, num_args = 1.., value_delimiter = ' ')]
        dests: Vec<String>,
        /// Staging directory
        #[arg(long)]
        staging_dir: PathBuf,
    },
}

impl Cli {
    /// Fold logging flags over the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Executes commands against a loaded configuration.
pub struct CliContext {
    working_dir: PathBuf,
    config: VfsImageConfig,
    color: bool,
}

impl CliContext {
    pub fn new(working_dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load(&working_dir)?,
        };
        Ok(Self::with_config(working_dir, config))
    }

    pub fn with_config(working_dir: PathBuf, config: VfsImageConfig) -> Self {
        Self {
            working_dir,
            config,
            color: false,
        }
    }

    /// Enable colored text output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &VfsImageConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Build {
                root,
                entry,
                output,
                tagged,
            } => self.build(root, entry, output.as_deref(), *tagged),
            Commands::Dump {
                image,
                format,
                contents,
            } => self.dump(image, format, *contents),
            Commands::Stage {
                files,
                dests,
                staging_dir,
            } => {
                let files: Vec<PathBuf> = files.iter().map(|f| self.resolve(f)).collect();
                let staged = stage_files(&files, dests, &self.resolve(staging_dir))?;
                Ok(staged
                    .iter()
                    .map(|s| {
                        format!(
                            "Copied {} to {}",
                            s.source.display(),
                            s.destination.display()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    fn build(
        &self,
        root: &Path,
        entry: &str,
        output: Option<&Path>,
        tagged: bool,
    ) -> Result<String, ApiError> {
        let revision = if tagged {
            ImageRevision::Tagged
        } else {
            self.config.image.revision
        };
        let builder = self.config.image.builder(revision);
        let root = self.resolve(root);
        let output = self.resolve(output.unwrap_or(&self.config.image.output));

        let mut alloc = IdAllocator::new();
        let image = builder.build_from_dir(&root, entry, &mut alloc)?;
        image.write_to(&output).map_err(|e| ApiError::Io {
            path: output.clone(),
            source: e,
        })?;
        info!(nodes = alloc.allocated(), "Build complete");

        Ok(format!(
            "Wrote {} ({} bytes, {} layout, entry offset {} -> {})",
            output.display(),
            image.len(),
            image.revision().as_str(),
            image.entry_offset(),
            entry
        ))
    }

    fn dump(&self, image: &Path, format: &str, contents: bool) -> Result<String, ApiError> {
        if format != "text" && format != "json" {
            return Err(ApiError::InvalidArgument(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                format
            )));
        }
        let path = self.resolve(image);
        let bytes = std::fs::read(&path).map_err(|e| ApiError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut alloc = IdAllocator::new();
        let options = DecodeOptions {
            max_depth: self.config.image.max_depth,
        };
        let parsed = parse_image_with(&bytes, &mut alloc, &options)?;

        if format == "json" {
            let report = DumpReport::new(&parsed, contents);
            serde_json::to_string_pretty(&report)
                .map_err(|e| ApiError::InvalidArgument(format!("Failed to encode report: {}", e)))
        } else {
            Ok(format_dump_text(&parsed, contents, self.color))
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}
