//! Human-readable and JSON renderings of decoded images.

use crate::image::ParsedImage;
use crate::tree::{DirectoryNode, Node};
use crate::types::NodeKind;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

/// Bytes of file contents shown by `--contents`
const PREVIEW_LEN: usize = 16;

/// JSON shape of `dump --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpReport {
    pub revision: String,
    pub size: u64,
    pub entry_offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_path: Option<String>,
    pub nodes: u64,
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    pub kind: NodeKind,
    /// Content length for files, child count for directories
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

impl DumpReport {
    pub fn new(parsed: &ParsedImage, include_contents: bool) -> Self {
        Self {
            revision: parsed.revision.as_str().to_string(),
            size: parsed.len as u64,
            entry_offset: parsed.entry_offset,
            entry_path: parsed.entry_path(),
            nodes: parsed.root.descendant_count(),
            tree: parsed
                .root
                .children()
                .iter()
                .map(|node| tree_entry(node, include_contents))
                .collect(),
        }
    }
}

fn tree_entry(node: &Node, include_contents: bool) -> TreeEntry {
    match node {
        Node::File(file) => TreeEntry {
            name: file.name().to_string(),
            kind: NodeKind::File,
            size: file.contents().len() as u64,
            preview: include_contents.then(|| preview(file.contents())),
            children: Vec::new(),
        },
        Node::Directory(dir) => TreeEntry {
            name: dir.name().to_string(),
            kind: NodeKind::Directory,
            size: dir.children().len() as u64,
            preview: None,
            children: dir
                .children()
                .iter()
                .map(|child| tree_entry(child, include_contents))
                .collect(),
        },
    }
}

fn preview(contents: &[u8]) -> String {
    let shown = &contents[..contents.len().min(PREVIEW_LEN)];
    if contents.len() > PREVIEW_LEN {
        format!("{}...", hex::encode(shown))
    } else {
        hex::encode(shown)
    }
}

/// Render a directory as an indented tree, one node per line.
///
/// ```text
/// /
/// |-- bin
/// |   `-- init
/// `-- README
/// ```
pub fn format_tree_text(root: &DirectoryNode, include_contents: bool, color: bool) -> String {
    let mut out = String::from("/\n");
    let mut last = Vec::new();
    render_children(root, &mut last, include_contents, color, &mut out);
    out
}

fn render_children(
    dir: &DirectoryNode,
    last: &mut Vec<bool>,
    include_contents: bool,
    color: bool,
    out: &mut String,
) {
    let count = dir.children().len();
    for (i, child) in dir.children().iter().enumerate() {
        for &ancestor_last in last.iter() {
            out.push_str(if ancestor_last { "    " } else { "|   " });
        }
        let is_last = i + 1 == count;
        out.push_str(if is_last { "`-- " } else { "|-- " });

        match child {
            Node::Directory(sub) => {
                if color {
                    out.push_str(&format!("{}\n", sub.name().bold().blue()));
                } else {
                    out.push_str(&format!("{}\n", sub.name()));
                }
                last.push(is_last);
                render_children(sub, last, include_contents, color, out);
                last.pop();
            }
            Node::File(file) => {
                out.push_str(file.name());
                if include_contents {
                    out.push_str(&format!(
                        " ({} bytes) {}",
                        file.contents().len(),
                        preview(file.contents())
                    ));
                }
                out.push('\n');
            }
        }
    }
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

/// Summary table followed by the tree.
pub fn format_dump_text(parsed: &ParsedImage, include_contents: bool, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Image", color)));

    let entry = parsed
        .entry_path()
        .unwrap_or_else(|| "<does not point at file contents>".to_string());
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Revision".to_string(), parsed.revision.as_str().to_string()]);
    table.add_row(vec!["Size".to_string(), format!("{} bytes", parsed.len)]);
    table.add_row(vec![
        "Entry offset".to_string(),
        format!("{} ({})", parsed.entry_offset, entry),
    ]);
    table.add_row(vec![
        "Nodes".to_string(),
        parsed.root.descendant_count().to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Tree", color)));
    out.push_str(&format_tree_text(&parsed.root, include_contents, color));
    out
}
