//! vfsimage: flat VFS images for an initial RAM disk
//!
//! Packs a directory tree into a single self-describing byte stream whose
//! leading field is the absolute offset of the entry program's contents, so
//! a kernel can jump to it without a loader.

pub mod codec;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod resolver;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{ApiError, VfsError};
pub use image::{parse_image, Image, ImageBuilder, ImageRevision, ParsedImage};
pub use tree::{DirectoryNode, FileNode, IdAllocator, Node};
