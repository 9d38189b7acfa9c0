//! In-memory filesystem tree: nodes, id allocation, path handling and host import.

pub mod ids;
pub mod import;
pub mod node;
pub mod path;

pub use ids::IdAllocator;
pub use import::{import_dir, import_file, ImportOptions, ROOT_NAME};
pub use node::{validate_name, DirectoryNode, FileNode, Node};
pub use path::split_path;
