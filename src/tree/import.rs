//! Host directory import
//!
//! Materializes a host directory as a [`DirectoryNode`]. Entries are visited in
//! lexicographic file-name order so two imports of the same host tree always
//! encode to the same bytes, whatever order the host filesystem lists them in.

use crate::error::{Result, VfsError};
use crate::tree::ids::IdAllocator;
use crate::tree::node::{DirectoryNode, FileNode, Node};
use crate::types::DEFAULT_MAX_DEPTH;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name given to the in-memory root of an imported or decoded tree
pub const ROOT_NAME: &str = "";

/// Importer configuration
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Deepest entry level accepted below the root (top-level entries are depth 1)
    pub max_depth: usize,
    /// Follow symbolic links to their targets
    pub follow_links: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            follow_links: true,
        }
    }
}

struct PendingDir {
    name: String,
    children: Vec<Node>,
}

/// Import a host directory tree.
pub fn import_dir(root: &Path, alloc: &mut IdAllocator, options: &ImportOptions) -> Result<DirectoryNode> {
    let meta = fs::metadata(root).map_err(|e| VfsError::import_io(root, e))?;
    if !meta.is_dir() {
        return Err(VfsError::import_io(root, io::Error::other("not a directory")));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(options.max_depth.saturating_add(1))
        .follow_links(options.follow_links)
        .sort_by_file_name();

    let mut stack = vec![PendingDir {
        name: ROOT_NAME.to_string(),
        children: Vec::new(),
    }];

    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            VfsError::import_io(path, source)
        })?;

        let depth = entry.depth();
        if depth > options.max_depth {
            return Err(VfsError::DepthExceeded {
                max: options.max_depth,
            });
        }

        // Leaving directories: everything deeper than this entry's parent is complete
        while stack.len() > depth {
            close_dir(&mut stack, alloc)?;
        }

        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| {
                VfsError::InvalidName(format!("{:?} is not valid UTF-8", entry.file_name()))
            })?
            .to_string();

        let file_type = entry.file_type();
        if file_type.is_dir() {
            stack.push(PendingDir {
                name,
                children: Vec::new(),
            });
        } else if file_type.is_file() {
            let contents = fs::read(entry.path()).map_err(|e| VfsError::import_io(entry.path(), e))?;
            debug!(path = %entry.path().display(), size = contents.len(), "Imported file");
            let file = FileNode::new(alloc, name, contents)?;
            if let Some(parent) = stack.last_mut() {
                parent.children.push(file.into());
            }
        } else {
            warn!(path = %entry.path().display(), "Skipping entry that is neither a file nor a directory");
        }
    }

    while stack.len() > 1 {
        close_dir(&mut stack, alloc)?;
    }
    let root_dir = stack.pop().ok_or_else(|| {
        VfsError::import_io(root, io::Error::other("import stack underflow"))
    })?;
    let tree = DirectoryNode::new(alloc, root_dir.name, root_dir.children)?;
    debug!(
        root = %root.display(),
        nodes = tree.descendant_count(),
        "Imported directory tree"
    );
    Ok(tree)
}

/// Import a single host file as a [`FileNode`] named after its base name.
pub fn import_file(path: &Path, alloc: &mut IdAllocator) -> Result<FileNode> {
    let meta = fs::metadata(path).map_err(|e| VfsError::import_io(path, e))?;
    if !meta.is_file() {
        return Err(VfsError::import_io(path, io::Error::other("not a regular file")));
    }
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| VfsError::InvalidName(format!("{:?} has no UTF-8 file name", path)))?;
    let contents = fs::read(path).map_err(|e| VfsError::import_io(path, e))?;
    FileNode::new(alloc, name, contents)
}

fn close_dir(stack: &mut Vec<PendingDir>, alloc: &mut IdAllocator) -> Result<()> {
    if let Some(done) = stack.pop() {
        let dir = DirectoryNode::new(alloc, done.name, done.children)?;
        if let Some(parent) = stack.last_mut() {
            parent.children.push(dir.into());
        }
    }
    Ok(())
}
