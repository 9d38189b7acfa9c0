//! Staging: copy build artifacts to their destination paths under a staging
//! directory before it is imaged.

use crate::error::ApiError;
use crate::tree::split_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One copied artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

/// Copy `files[i]` to `staging_dir/dests[i]`, creating parent directories.
pub fn stage_files(
    files: &[PathBuf],
    dests: &[String],
    staging_dir: &Path,
) -> Result<Vec<StagedFile>, ApiError> {
    if files.len() != dests.len() {
        return Err(ApiError::InvalidArgument(format!(
            "Mismatching number of target files ({}) and destination paths ({})",
            files.len(),
            dests.len()
        )));
    }

    let mut staged = Vec::with_capacity(files.len());
    for (source, dest) in files.iter().zip(dests) {
        let parts = split_path(dest)?;
        if parts.contains(&"..") {
            return Err(ApiError::InvalidArgument(format!(
                "Destination {:?} escapes the staging directory",
                dest
            )));
        }
        let destination = parts
            .iter()
            .fold(staging_dir.to_path_buf(), |path, part| path.join(part));

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| ApiError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let bytes = fs::copy(source, &destination).map_err(|e| ApiError::Io {
            path: source.clone(),
            source: e,
        })?;
        info!(
            source = %source.display(),
            destination = %destination.display(),
            bytes,
            "Staged file"
        );
        staged.push(StagedFile {
            source: source.clone(),
            destination,
            bytes,
        });
    }
    Ok(staged)
}
