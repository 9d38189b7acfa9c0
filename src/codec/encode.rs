//! Record encoding

use crate::tree::{DirectoryNode, Node};
use crate::types::NAME_LEN;

/// Encode one node record (header + tail, subtree included).
pub fn encode_node(node: &Node) -> Vec<u8> {
    let mut out = Vec::with_capacity(node.encoded_len() as usize);
    write_node(node, &mut out);
    out
}

/// Encode a directory as an image root: the concatenation of its children's
/// records, with no header or child count for the root itself.
pub fn encode_tree(root: &DirectoryNode) -> Vec<u8> {
    let mut out = Vec::with_capacity(root.children_encoded_len() as usize);
    for child in root.children() {
        write_node(child, &mut out);
    }
    out
}

/// Append one node record to `out`, depth-first pre-order.
pub fn write_node(node: &Node, out: &mut Vec<u8>) {
    write_header(node, out);
    match node {
        Node::File(file) => {
            // Lengths were bounded to u32 at construction
            out.extend_from_slice(&(file.contents().len() as u32).to_le_bytes());
            out.extend_from_slice(file.contents());
        }
        Node::Directory(dir) => {
            out.extend_from_slice(&(dir.children().len() as u32).to_le_bytes());
            for child in dir.children() {
                write_node(child, out);
            }
        }
    }
}

fn write_header(node: &Node, out: &mut Vec<u8>) {
    out.extend_from_slice(&node.id().to_le_bytes());
    out.extend_from_slice(&node.kind().flags().to_le_bytes());
    let name = node.name().as_bytes();
    out.extend_from_slice(name);
    out.resize(out.len() + (NAME_LEN - name.len()), 0);
}
