//! Record decoding

use crate::codec::cursor::Cursor;
use crate::error::{Result, VfsError};
use crate::tree::{DirectoryNode, FileNode, IdAllocator, Node, ROOT_NAME};
use crate::types::{NodeKind, DEFAULT_MAX_DEPTH, FLAGS_RESERVED, HEADER_LEN, NAME_LEN, SIZE_FIELD_LEN};
use tracing::debug;

/// Decoder configuration
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Deepest record level accepted (top-level records are depth 1)
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decode a buffer of concatenated top-level records into an anonymous root.
pub fn decode_tree(bytes: &[u8], alloc: &mut IdAllocator) -> Result<DirectoryNode> {
    decode_tree_with(Cursor::new(bytes), alloc, &DecodeOptions::default())
}

/// Decode every record remaining in `cursor`.
///
/// Ids stored in the input are not reused; each decoded node takes a fresh
/// id from `alloc`.
pub fn decode_tree_with(
    cursor: Cursor<'_>,
    alloc: &mut IdAllocator,
    options: &DecodeOptions,
) -> Result<DirectoryNode> {
    let mut decoder = Decoder {
        cursor,
        alloc,
        max_depth: options.max_depth,
    };
    let mut children = Vec::new();
    while !decoder.cursor.is_empty() {
        children.push(decoder.decode_node(1)?);
    }
    let root = DirectoryNode::new(decoder.alloc, ROOT_NAME, children)?;
    debug!(records = root.children().len(), "Decoded image tree");
    Ok(root)
}

/// Decode exactly one record from the front of `bytes`.
///
/// Returns the node and the number of bytes it occupied.
pub fn decode_record(bytes: &[u8], alloc: &mut IdAllocator) -> Result<(Node, usize)> {
    let mut decoder = Decoder {
        cursor: Cursor::new(bytes),
        alloc,
        max_depth: DEFAULT_MAX_DEPTH,
    };
    let node = decoder.decode_node(1)?;
    Ok((node, decoder.cursor.position()))
}

struct Decoder<'a, 'b> {
    cursor: Cursor<'a>,
    alloc: &'b mut IdAllocator,
    max_depth: usize,
}

impl Decoder<'_, '_> {
    fn decode_node(&mut self, depth: usize) -> Result<Node> {
        if depth > self.max_depth {
            return Err(VfsError::DepthExceeded {
                max: self.max_depth,
            });
        }

        // The stored id only identified the node in the tree that wrote it
        let _stored_id = self.cursor.read_u32_le("file id")?;
        let flags_offset = self.cursor.position();
        let flags = self.cursor.read_u32_le("flags")?;
        if flags & FLAGS_RESERVED != 0 {
            return Err(VfsError::UnsupportedFlags {
                flags,
                offset: flags_offset,
            });
        }
        let name = decode_name(&self.cursor.read_array::<NAME_LEN>("name")?)?;
        let size = self.cursor.read_u32_le("size")? as usize;

        match NodeKind::from_flags(flags) {
            NodeKind::File => {
                let contents = self.cursor.take(size, "file contents")?;
                Ok(FileNode::new(self.alloc, name, contents)?.into())
            }
            NodeKind::Directory => {
                // Each child needs at least a header and a size field
                let min_len = size.saturating_mul(HEADER_LEN + SIZE_FIELD_LEN);
                if min_len > self.cursor.remaining() {
                    return Err(VfsError::Truncated {
                        field: "directory children",
                        offset: self.cursor.position(),
                        needed: min_len,
                        remaining: self.cursor.remaining(),
                    });
                }
                let mut children = Vec::with_capacity(size);
                for _ in 0..size {
                    children.push(self.decode_node(depth + 1)?);
                }
                Ok(DirectoryNode::new(self.alloc, name, children)?.into())
            }
        }
    }
}

/// Names are zero-padded on encode; decoding stops at the first zero byte.
fn decode_name(raw: &[u8; NAME_LEN]) -> Result<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
    String::from_utf8(raw[..end].to_vec())
        .map_err(|e| VfsError::InvalidName(format!("stored name is not UTF-8: {}", e)))
}
