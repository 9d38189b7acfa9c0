use crate::support::{collect_ids, dir, file, nested_tree};
use std::collections::HashSet;
use vfsimage::codec::{decode_record, decode_tree, encode_node, encode_tree};
use vfsimage::error::VfsError;
use vfsimage::image::{parse_image, ImageBuilder, ImageRevision};
use vfsimage::resolver::{content_offset, record_content_offset};
use vfsimage::tree::{DirectoryNode, IdAllocator, Node};
use vfsimage::types::{FLAG_FILE, IMAGE_MAGIC};

#[test]
fn flat_single_file_record() {
    let mut alloc = IdAllocator::new();
    let node = file(&mut alloc, "hello", b"world");
    let bytes = encode_node(&node);

    assert_eq!(bytes.len(), 81);
    assert_eq!(&bytes[0..4], &node.id().to_le_bytes());
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), FLAG_FILE);
    assert_eq!(&bytes[8..13], b"hello");
    assert!(bytes[13..72].iter().all(|&b| b == 0));
    assert_eq!(u32::from_le_bytes(bytes[72..76].try_into().unwrap()), 5);
    assert_eq!(&bytes[76..81], b"world");

    let root = DirectoryNode::new(&mut alloc, "", vec![node]).unwrap();
    assert_eq!(content_offset(&root, "hello").unwrap(), 76);
    assert_eq!(record_content_offset(&root, "hello").unwrap(), 152);

    let mut fresh = IdAllocator::new();
    let (decoded, consumed) = decode_record(&bytes, &mut fresh).unwrap();
    assert_eq!(consumed, 81);
    assert_eq!(decoded.name(), "hello");
    assert_eq!(decoded.as_file().unwrap().contents(), b"world");
}

#[test]
fn nested_tree_offsets() {
    let mut alloc = IdAllocator::new();
    let root = nested_tree(&mut alloc);
    let bytes = encode_tree(&root);

    assert_eq!(content_offset(&root, "file").unwrap(), 76);
    assert_eq!(content_offset(&root, "nested/file").unwrap(), 233);
    assert_eq!(content_offset(&root, "nested/nested3/file").unwrap(), 390);

    assert_eq!(&bytes[76..81], b"abcd\n");
    assert_eq!(&bytes[233..238], b"efgh\n");
    // nested2 follows the empty file directly
    assert_eq!(&bytes[398..405], b"nested2");
    assert_eq!(bytes.len(), 81 + 76 + 81 + 76 + 76 + 76);
}

#[test]
fn nested_tree_round_trip_gets_fresh_ids() {
    let mut alloc = IdAllocator::new();
    let root = nested_tree(&mut alloc);
    let bytes = encode_tree(&root);

    let decoded = decode_tree(&bytes, &mut alloc).unwrap();
    assert!(decoded.same_structure(&root));
    assert_eq!(decoded.get("nested2").unwrap().as_dir().unwrap().children().len(), 0);
    assert_eq!(
        decoded
            .lookup("nested/nested3/file")
            .unwrap()
            .as_file()
            .unwrap()
            .contents(),
        b""
    );

    let before: HashSet<u32> = collect_ids(&root).into_iter().collect();
    let after: Vec<u32> = collect_ids(&decoded);
    let unique: HashSet<u32> = after.iter().copied().collect();
    assert_eq!(unique.len(), after.len());
    assert!(before.is_disjoint(&unique));
}

#[test]
fn tagged_image_points_at_entry() {
    let mut alloc = IdAllocator::new();
    let root = nested_tree(&mut alloc);
    let image = ImageBuilder::new(ImageRevision::Tagged)
        .build(&root, "nested/file")
        .unwrap();
    let bytes = image.to_bytes();

    assert_eq!(image.entry_offset(), 4 + 8 + 233);
    assert_eq!(&bytes[4..8], &IMAGE_MAGIC);
    let at = image.entry_offset() as usize;
    assert_eq!(&bytes[at..at + 5], b"efgh\n");

    let parsed = parse_image(&bytes, &mut alloc).unwrap();
    assert_eq!(parsed.revision, ImageRevision::Tagged);
    assert_eq!(parsed.entry_path().as_deref(), Some("nested/file"));
    assert!(parsed.root.same_structure(&root));
}

#[test]
fn default_image_is_entry_then_records() {
    let mut alloc = IdAllocator::new();
    let root = nested_tree(&mut alloc);
    let image = ImageBuilder::default().build(&root, "file").unwrap();
    let bytes = image.to_bytes();

    assert_eq!(image.revision(), ImageRevision::Legacy);
    assert_eq!(image.entry_offset(), 80);
    assert_eq!(&bytes[0..4], &80u32.to_le_bytes());
    assert_eq!(&bytes[4..], encode_tree(&root).as_slice());
    assert_eq!(&bytes[80..85], b"abcd\n");

    let parsed = parse_image(&bytes, &mut alloc).unwrap();
    assert_eq!(parsed.revision, ImageRevision::Legacy);
    assert_eq!(parsed.entry_path().as_deref(), Some("file"));
}

#[test]
fn missing_entry_is_rejected() {
    let mut alloc = IdAllocator::new();
    let root = nested_tree(&mut alloc);
    let builder = ImageBuilder::default();

    assert!(matches!(
        builder.build(&root, "nested/missing"),
        Err(VfsError::PathNotFound(_))
    ));
    assert!(matches!(
        builder.build(&root, "nested2"),
        Err(VfsError::NotAFile(_))
    ));
    assert!(matches!(
        builder.build(&root, "file/inner"),
        Err(VfsError::NotADirectory(_))
    ));

    let empty = DirectoryNode::new(&mut alloc, "", vec![]).unwrap();
    assert!(matches!(
        builder.build(&empty, "init"),
        Err(VfsError::PathNotFound(_))
    ));
}

#[test]
fn truncated_image_reports_offset() {
    let mut alloc = IdAllocator::new();
    let root = nested_tree(&mut alloc);
    let bytes = ImageBuilder::default().build(&root, "file").unwrap().to_bytes();

    let cut = &bytes[..bytes.len() - 3];
    match parse_image(cut, &mut alloc) {
        Err(VfsError::Truncated { offset, .. }) => assert!(offset >= 12),
        other => panic!("expected truncation, got {other:?}"),
    }
}

#[test]
fn unsupported_version_is_rejected() {
    let mut alloc = IdAllocator::new();
    let init = file(&mut alloc, "init", b"x");
    let root = DirectoryNode::new(&mut alloc, "", vec![init]).unwrap();
    let mut bytes = ImageBuilder::new(ImageRevision::Tagged)
        .build(&root, "init")
        .unwrap()
        .to_bytes();
    bytes[8..12].copy_from_slice(&7u32.to_le_bytes());

    assert!(matches!(
        parse_image(&bytes, &mut alloc),
        Err(VfsError::UnsupportedVersion { found: 7, .. })
    ));
}

#[test]
fn sibling_order_is_preserved() {
    let mut alloc = IdAllocator::new();
    let children: Vec<Node> = ["zeta", "alpha", "mid"]
        .iter()
        .map(|name| file(&mut alloc, name, name.as_bytes()))
        .collect();
    let sub = dir(&mut alloc, "d", children);
    let root = DirectoryNode::new(&mut alloc, "", vec![sub]).unwrap();

    let decoded = decode_tree(&encode_tree(&root), &mut alloc).unwrap();
    let names: Vec<&str> = decoded
        .get("d")
        .unwrap()
        .as_dir()
        .unwrap()
        .children()
        .iter()
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}
