//! Content offset resolution
//!
//! Offsets depend only on sibling order and encoded sizes, never on ids, so
//! two encodes of the same tree structure always agree.

use crate::error::{Result, VfsError};
use crate::tree::{split_path, DirectoryNode, FileNode, Node};
use crate::types::{ENTRY_FIELD_LEN, HEADER_LEN, SIZE_FIELD_LEN};

/// Distance from the start of a record to its first content byte (or first child)
pub const RECORD_BODY_OFFSET: u64 = (HEADER_LEN + SIZE_FIELD_LEN) as u64;

/// A file located inside a tree together with its content offset.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFile<'a> {
    pub offset: u64,
    pub file: &'a FileNode,
}

impl ResolvedFile<'_> {
    pub fn len(&self) -> u64 {
        self.file.contents().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.file.contents().is_empty()
    }
}

/// Locate the file at `path` below `root`.
///
/// The offset is measured from byte 0 of `encode_tree(root)`, the headerless
/// concatenation of the root's children.
pub fn resolve<'a>(root: &'a DirectoryNode, path: &str) -> Result<ResolvedFile<'a>> {
    let parts = split_path(path)?;
    let (last, parents) = parts.split_last().ok_or(VfsError::EmptyPath)?;

    let mut offset = 0u64;
    let mut dir = root;
    for (i, part) in parents.iter().enumerate() {
        let (node, skipped) = find_child(dir, part).ok_or_else(|| VfsError::PathNotFound(path.to_string()))?;
        offset += skipped + RECORD_BODY_OFFSET;
        dir = match node {
            Node::Directory(d) => d,
            Node::File(_) => return Err(VfsError::NotADirectory(parts[..=i].join("/"))),
        };
    }

    let (node, skipped) = find_child(dir, last).ok_or_else(|| VfsError::PathNotFound(path.to_string()))?;
    offset += skipped + RECORD_BODY_OFFSET;
    match node {
        Node::File(file) => Ok(ResolvedFile { offset, file }),
        Node::Directory(_) => Err(VfsError::NotAFile(path.to_string())),
    }
}

/// Offset of the contents of `path`, from the start of `root`'s encoded children.
pub fn content_offset(root: &DirectoryNode, path: &str) -> Result<u64> {
    resolve(root, path).map(|r| r.offset)
}

/// Offset of the contents of `path`, from the start of `dir`'s own record
/// (header and child count included).
pub fn record_content_offset(dir: &DirectoryNode, path: &str) -> Result<u64> {
    Ok(RECORD_BODY_OFFSET + content_offset(dir, path)?)
}

/// Value stored in an image's leading field: the absolute offset from byte 0
/// of the image to the entry file's first content byte.
///
/// `preamble_len` is the number of bytes between the entry field and the
/// first record.
pub fn entry_offset(root: &DirectoryNode, entry: &str, preamble_len: usize) -> Result<u32> {
    let offset = (ENTRY_FIELD_LEN + preamble_len) as u64 + content_offset(root, entry)?;
    u32::try_from(offset).map_err(|_| VfsError::OffsetOverflow(offset))
}

/// First child named `name` and the encoded size of the siblings before it
fn find_child<'a>(dir: &'a DirectoryNode, name: &str) -> Option<(&'a Node, u64)> {
    let mut skipped = 0u64;
    for child in dir.children() {
        if child.name() == name {
            return Some((child, skipped));
        }
        skipped += child.encoded_len();
    }
    None
}
