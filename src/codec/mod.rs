//! Binary codec for VFS node records
//!
//! Every node is written as a fixed 72-byte header followed by a type-specific
//! tail. All integers are unsigned little-endian.
//!
//! ```text
//! FileID(4) | Flags(4) | Name(64, zero-padded) | ContentLen(4) | Content     (file)
//! FileID(4) | Flags(4) | Name(64, zero-padded) | ChildCount(4) | ChildRecord* (directory)
//! ```
//!
//! Flags bit 0 is set for files. Bits 1..31 are reserved and rejected on decode.
//! An image root is never written as a record: only its children are.

pub mod cursor;
pub mod decode;
pub mod encode;

pub use cursor::Cursor;
pub use decode::{decode_record, decode_tree, decode_tree_with, DecodeOptions};
pub use encode::{encode_node, encode_tree, write_node};
