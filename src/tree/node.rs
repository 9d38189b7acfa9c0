//! Filesystem node types

use crate::error::{Result, VfsError};
use crate::tree::ids::IdAllocator;
use crate::tree::path::split_path;
use crate::types::{NodeId, NodeKind, HEADER_LEN, NAME_LEN, SIZE_FIELD_LEN};

/// File node representation
#[derive(Debug, Clone)]
pub struct FileNode {
    id: NodeId,
    name: String,
    contents: Vec<u8>,
}

/// Directory node representation
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    id: NodeId,
    name: String,
    children: Vec<Node>, // construction order, preserved on encode
}

/// Tree node
#[derive(Debug, Clone)]
pub enum Node {
    File(FileNode),
    Directory(DirectoryNode),
}

/// Check a node name against the 64-byte name field.
///
/// Names may not contain NUL since decoding stops at the first zero byte.
pub fn validate_name(name: &str) -> Result<()> {
    if name.len() > NAME_LEN {
        return Err(VfsError::NameTooLong {
            name: name.to_string(),
            len: name.len(),
            max: NAME_LEN,
        });
    }
    if name.as_bytes().contains(&0) {
        return Err(VfsError::InvalidName(format!(
            "{:?} contains a NUL byte",
            name
        )));
    }
    Ok(())
}

impl FileNode {
    pub fn new(
        alloc: &mut IdAllocator,
        name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let name = name.into();
        let contents = contents.into();
        validate_name(&name)?;
        if contents.len() > u32::MAX as usize {
            return Err(VfsError::ContentTooLarge {
                name,
                len: contents.len(),
            });
        }
        Ok(FileNode {
            id: alloc.allocate()?,
            name,
            contents,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

impl DirectoryNode {
    pub fn new(alloc: &mut IdAllocator, name: impl Into<String>, children: Vec<Node>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        if children.len() > u32::MAX as usize {
            return Err(VfsError::TooManyChildren {
                name,
                count: children.len(),
            });
        }
        Ok(DirectoryNode {
            id: alloc.allocate()?,
            name,
            children,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if this directory contains a child by a given name.
    pub fn has(&self, name: &str) -> bool {
        self.children.iter().any(|child| child.name() == name)
    }

    /// Get a child by name. The first match wins when names repeat.
    pub fn get(&self, name: &str) -> Result<&Node> {
        self.children
            .iter()
            .find(|child| child.name() == name)
            .ok_or_else(|| VfsError::NotFound(name.to_string()))
    }

    /// Walk a relative slash-separated path below this directory.
    pub fn lookup(&self, path: &str) -> Result<&Node> {
        let parts = split_path(path)?;
        let (last, parents) = parts.split_last().ok_or(VfsError::EmptyPath)?;
        let mut dir = self;
        for (i, part) in parents.iter().enumerate() {
            let node = dir
                .get(part)
                .map_err(|_| VfsError::PathNotFound(path.to_string()))?;
            dir = node
                .as_dir()
                .ok_or_else(|| VfsError::NotADirectory(parts[..=i].join("/")))?;
        }
        dir.get(last)
            .map_err(|_| VfsError::PathNotFound(path.to_string()))
    }

    /// Encoded size of this directory's children without its own header,
    /// i.e. the size of the directory when written as an image root.
    pub fn children_encoded_len(&self) -> u64 {
        self.children.iter().map(Node::encoded_len).sum()
    }

    /// Total number of nodes below this directory, excluding itself.
    pub fn descendant_count(&self) -> u64 {
        self.children
            .iter()
            .map(|child| match child {
                Node::File(_) => 1,
                Node::Directory(dir) => 1 + dir.descendant_count(),
            })
            .sum()
    }
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::File(f) => f.id,
            Node::Directory(d) => d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Directory(d) => &d.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    pub fn as_dir(&self) -> Option<&DirectoryNode> {
        match self {
            Node::File(_) => None,
            Node::Directory(d) => Some(d),
        }
    }

    /// Size in bytes of this node's full record, including any subtree.
    pub fn encoded_len(&self) -> u64 {
        let fixed = (HEADER_LEN + SIZE_FIELD_LEN) as u64;
        match self {
            Node::File(f) => fixed + f.contents.len() as u64,
            Node::Directory(d) => fixed + d.children_encoded_len(),
        }
    }

    /// Compare names, kinds, contents and child order, ignoring ids.
    pub fn same_structure(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::File(a), Node::File(b)) => a.name == b.name && a.contents == b.contents,
            (Node::Directory(a), Node::Directory(b)) => a.same_structure(b),
            _ => false,
        }
    }
}

impl DirectoryNode {
    pub fn same_structure(&self, other: &DirectoryNode) -> bool {
        self.name == other.name
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.same_structure(b))
    }
}

impl From<FileNode> for Node {
    fn from(file: FileNode) -> Self {
        Node::File(file)
    }
}

impl From<DirectoryNode> for Node {
    fn from(dir: DirectoryNode) -> Self {
        Node::Directory(dir)
    }
}
