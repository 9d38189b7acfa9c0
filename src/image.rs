//! Image assembly and parsing
//!
//! ```text
//! legacy:  [0,4) entry offset | [4,..)  records
//! tagged:  [0,4) entry offset | [4,8) "VFSI" | [8,12) version | [12,..) records
//! ```
//!
//! The entry offset is always first and always absolute, so a kernel that only
//! reads the leading field can jump to the entry program in either revision.

use crate::codec::{decode_tree_with, encode_tree, Cursor, DecodeOptions};
use crate::error::{Result, VfsError};
use crate::resolver::{entry_offset, RECORD_BODY_OFFSET};
use crate::tree::{import_dir, DirectoryNode, FileNode, IdAllocator, ImportOptions, Node};
use crate::types::{ENTRY_FIELD_LEN, IMAGE_MAGIC, IMAGE_VERSION, PREAMBLE_LEN};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Image layout revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRevision {
    /// Entry offset followed directly by records, as the kernel reads them
    #[default]
    Legacy,
    /// Entry offset, magic and version, then records
    Tagged,
}

impl ImageRevision {
    /// Bytes between the entry offset field and the first record
    pub fn preamble_len(self) -> usize {
        match self {
            ImageRevision::Legacy => 0,
            ImageRevision::Tagged => PREAMBLE_LEN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageRevision::Legacy => "legacy",
            ImageRevision::Tagged => "tagged",
        }
    }
}

/// An assembled image, ready to be written.
#[derive(Debug, Clone)]
pub struct Image {
    entry_offset: u32,
    revision: ImageRevision,
    records: Vec<u8>,
}

impl Image {
    pub fn entry_offset(&self) -> u32 {
        self.entry_offset
    }

    pub fn revision(&self) -> ImageRevision {
        self.revision
    }

    /// Total image size in bytes
    pub fn len(&self) -> usize {
        ENTRY_FIELD_LEN + self.revision.preamble_len() + self.records.len()
    }

    /// True when the image carries no records after its leading fields
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.entry_offset.to_le_bytes());
        if self.revision == ImageRevision::Tagged {
            out.extend_from_slice(&IMAGE_MAGIC);
            out.extend_from_slice(&IMAGE_VERSION.to_le_bytes());
        }
        out.extend_from_slice(&self.records);
        out
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())?;
        info!(
            path = %path.display(),
            bytes = self.len(),
            entry_offset = self.entry_offset,
            revision = self.revision.as_str(),
            "Wrote image"
        );
        Ok(())
    }
}

/// Builds images from trees or host directories.
#[derive(Debug, Clone, Default)]
pub struct ImageBuilder {
    revision: ImageRevision,
    import: ImportOptions,
}

impl ImageBuilder {
    pub fn new(revision: ImageRevision) -> Self {
        Self {
            revision,
            import: ImportOptions::default(),
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.import.max_depth = max_depth;
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.import.follow_links = follow;
        self
    }

    /// Assemble an image whose leading field points at the contents of `entry`.
    pub fn build(&self, tree: &DirectoryNode, entry: &str) -> Result<Image> {
        let offset = entry_offset(tree, entry, self.revision.preamble_len())?;
        let records = encode_tree(tree);
        debug!(entry, offset, records = records.len(), "Assembled image");
        Ok(Image {
            entry_offset: offset,
            revision: self.revision,
            records,
        })
    }

    /// Import `root` from the host filesystem and assemble it.
    pub fn build_from_dir(&self, root: &Path, entry: &str, alloc: &mut IdAllocator) -> Result<Image> {
        let tree = import_dir(root, alloc, &self.import)?;
        self.build(&tree, entry)
    }
}

/// A decoded image.
#[derive(Debug, Clone)]
pub struct ParsedImage {
    pub entry_offset: u32,
    pub revision: ImageRevision,
    pub root: DirectoryNode,
    pub len: usize,
}

impl ParsedImage {
    /// Offset of the first record from the start of the image
    pub fn records_start(&self) -> u64 {
        (ENTRY_FIELD_LEN + self.revision.preamble_len()) as u64
    }

    /// Path and node of the file whose contents begin at the entry offset.
    ///
    /// `None` when the offset does not land on the first content byte of a
    /// file, which a kernel would jump into blindly.
    pub fn entry(&self) -> Option<(String, &FileNode)> {
        let mut prefix = Vec::new();
        find_content_at(
            self.root.children(),
            self.records_start(),
            self.entry_offset as u64,
            &mut prefix,
        )
    }

    pub fn entry_path(&self) -> Option<String> {
        self.entry().map(|(path, _)| path)
    }
}

/// Parse a full image with default decode limits.
pub fn parse_image(bytes: &[u8], alloc: &mut IdAllocator) -> Result<ParsedImage> {
    parse_image_with(bytes, alloc, &DecodeOptions::default())
}

/// Parse a full image. The revision is detected from the magic following the
/// entry offset; images without it are read as legacy. A tagged parse that
/// fails is retried as legacy, since a legacy image may open with a record
/// whose id spells the magic. If both fail the tagged error is returned.
pub fn parse_image_with(bytes: &[u8], alloc: &mut IdAllocator, options: &DecodeOptions) -> Result<ParsedImage> {
    let entry_offset = Cursor::new(bytes).read_u32_le("entry offset")?;

    let magic = bytes.get(ENTRY_FIELD_LEN..ENTRY_FIELD_LEN + IMAGE_MAGIC.len());
    if magic == Some(&IMAGE_MAGIC[..]) {
        return match parse_records(bytes, entry_offset, ImageRevision::Tagged, alloc, options) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                debug!(error = %err, "Tagged parse failed, retrying as legacy");
                parse_records(bytes, entry_offset, ImageRevision::Legacy, alloc, options)
                    .map_err(|_| err)
            }
        };
    }
    parse_records(bytes, entry_offset, ImageRevision::Legacy, alloc, options)
}

/// Decode everything after the entry offset field as `revision`.
fn parse_records(
    bytes: &[u8],
    entry_offset: u32,
    revision: ImageRevision,
    alloc: &mut IdAllocator,
    options: &DecodeOptions,
) -> Result<ParsedImage> {
    let rest = bytes.get(ENTRY_FIELD_LEN..).unwrap_or_default();
    let mut cursor = Cursor::with_base(rest, ENTRY_FIELD_LEN);
    if revision == ImageRevision::Tagged {
        cursor.take(IMAGE_MAGIC.len(), "magic")?;
        let version = cursor.read_u32_le("version")?;
        if version != IMAGE_VERSION {
            return Err(VfsError::UnsupportedVersion {
                found: version,
                supported: IMAGE_VERSION,
            });
        }
    }

    let root = decode_tree_with(cursor, alloc, options)?;
    debug!(
        entry_offset,
        revision = revision.as_str(),
        bytes = bytes.len(),
        "Parsed image"
    );
    Ok(ParsedImage {
        entry_offset,
        revision,
        root,
        len: bytes.len(),
    })
}

fn find_content_at<'a>(
    nodes: &'a [Node],
    mut pos: u64,
    target: u64,
    prefix: &mut Vec<&'a str>,
) -> Option<(String, &'a FileNode)> {
    for node in nodes {
        let body = pos + RECORD_BODY_OFFSET;
        let end = pos + node.encoded_len();
        match node {
            Node::File(file) if target == body => {
                prefix.push(file.name());
                let path = prefix.join("/");
                prefix.pop();
                return Some((path, file));
            }
            // An empty last child starts its contents at the directory's end
            Node::Directory(dir) if target >= body && target <= end => {
                prefix.push(dir.name());
                let found = find_content_at(dir.children(), body, target, prefix);
                prefix.pop();
                if found.is_some() {
                    return found;
                }
            }
            _ => {}
        }
        if target < end {
            return None;
        }
        pos = end;
    }
    None
}
