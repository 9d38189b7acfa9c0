//! Core types and wire-format constants for VFS images.

/// NodeId: per-session unique identifier written into every record header
pub type NodeId = u32;

/// Width of the zero-padded name field
pub const NAME_LEN: usize = 64;

/// FileID (4) + Flags (4) + Name (64)
pub const HEADER_LEN: usize = 4 + 4 + NAME_LEN;

/// Content length of a file or child count of a directory
pub const SIZE_FIELD_LEN: usize = 4;

/// Leading entry offset field of an image
pub const ENTRY_FIELD_LEN: usize = 4;

/// Flag bit 0: set for files, clear for directories
pub const FLAG_FILE: u32 = 1;

/// Bits 1..31 of the flags word are reserved and must be zero
pub const FLAGS_RESERVED: u32 = !FLAG_FILE;

/// Magic written after the entry offset in tagged images
pub const IMAGE_MAGIC: [u8; 4] = *b"VFSI";

/// Current tagged image version
pub const IMAGE_VERSION: u32 = 1;

/// Magic (4) + version (4)
pub const PREAMBLE_LEN: usize = 8;

/// Default bound on directory nesting for import and decode
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Node kind, encoded as flag bit 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn flags(self) -> u32 {
        match self {
            NodeKind::File => FLAG_FILE,
            NodeKind::Directory => 0,
        }
    }

    pub fn from_flags(flags: u32) -> Self {
        if flags & FLAG_FILE != 0 {
            NodeKind::File
        } else {
            NodeKind::Directory
        }
    }
}
