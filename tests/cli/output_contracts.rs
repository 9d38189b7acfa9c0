use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vfsimage::codec::decode_tree;
use vfsimage::config::VfsImageConfig;
use vfsimage::error::ApiError;
use vfsimage::image::ImageRevision;
use vfsimage::tooling::cli::{CliContext, Commands};
use vfsimage::tree::IdAllocator;

fn workspace(temp: &TempDir) -> CliContext {
    let root = temp.path().join("initrd");
    fs::create_dir_all(root.join("bin")).unwrap();
    fs::write(root.join("bin/init"), b"\x7fELF-init").unwrap();
    fs::write(root.join("motd"), b"hello\n").unwrap();
    CliContext::with_config(temp.path().to_path_buf(), VfsImageConfig::default())
}

fn build(ctx: &CliContext, tagged: bool) -> String {
    ctx.execute(&Commands::Build {
        root: PathBuf::from("initrd"),
        entry: "bin/init".to_string(),
        output: Some(PathBuf::from("out.vfs")),
        tagged,
    })
    .unwrap()
}

#[test]
fn build_writes_image_and_summary() {
    let temp = TempDir::new().unwrap();
    let ctx = workspace(&temp);

    let output = build(&ctx, false);
    assert!(output.contains("out.vfs"));
    assert!(output.contains("legacy"));
    assert!(output.contains("bin/init"));

    let bytes = fs::read(temp.path().join("out.vfs")).unwrap();
    let offset = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
    assert_eq!(&bytes[offset..offset + 9], b"\x7fELF-init");

    // Records start right after the entry offset, where the kernel reads them
    let mut alloc = IdAllocator::new();
    let root = decode_tree(&bytes[4..], &mut alloc).unwrap();
    assert_eq!(root.children().len(), 2);
}

#[test]
fn build_uses_configured_output() {
    let temp = TempDir::new().unwrap();
    workspace(&temp);
    let mut config = VfsImageConfig::default();
    config.image.output = PathBuf::from("ramdisk.img");
    config.image.revision = ImageRevision::Tagged;
    let ctx = CliContext::with_config(temp.path().to_path_buf(), config);

    let output = ctx
        .execute(&Commands::Build {
            root: PathBuf::from("initrd"),
            entry: "motd".to_string(),
            output: None,
            tagged: false,
        })
        .unwrap();
    assert!(output.contains("tagged"));
    assert!(temp.path().join("ramdisk.img").exists());
}

#[test]
fn dump_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    let ctx = workspace(&temp);
    build(&ctx, true);

    let output = ctx
        .execute(&Commands::Dump {
            image: PathBuf::from("out.vfs"),
            format: "json".to_string(),
            contents: true,
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.get("revision").and_then(|v| v.as_str()), Some("tagged"));
    assert!(parsed.get("size").and_then(|v| v.as_u64()).is_some());
    assert!(parsed.get("entry_offset").and_then(|v| v.as_u64()).is_some());
    assert_eq!(
        parsed.get("entry_path").and_then(|v| v.as_str()),
        Some("bin/init")
    );
    assert_eq!(parsed.get("nodes").and_then(|v| v.as_u64()), Some(3));

    let tree = parsed.get("tree").and_then(|v| v.as_array()).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].get("name").and_then(|v| v.as_str()), Some("bin"));
    assert_eq!(tree[0].get("kind").and_then(|v| v.as_str()), Some("directory"));
    let init = &tree[0].get("children").and_then(|v| v.as_array()).unwrap()[0];
    assert_eq!(init.get("kind").and_then(|v| v.as_str()), Some("file"));
    assert_eq!(init.get("size").and_then(|v| v.as_u64()), Some(9));
    assert!(init.get("preview").and_then(|v| v.as_str()).is_some());
}

#[test]
fn dump_text_shows_tree() {
    let temp = TempDir::new().unwrap();
    let ctx = workspace(&temp);
    build(&ctx, false);

    let output = ctx
        .execute(&Commands::Dump {
            image: PathBuf::from("out.vfs"),
            format: "text".to_string(),
            contents: false,
        })
        .unwrap();
    assert!(output.contains("legacy"));
    assert!(output.contains("|-- bin\n|   `-- init\n`-- motd\n"));
}

#[test]
fn dump_missing_image_is_io_error() {
    let temp = TempDir::new().unwrap();
    let ctx = workspace(&temp);
    let err = ctx
        .execute(&Commands::Dump {
            image: PathBuf::from("absent.vfs"),
            format: "text".to_string(),
            contents: false,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Io { .. }));
}

#[test]
fn build_with_missing_entry_fails() {
    let temp = TempDir::new().unwrap();
    let ctx = workspace(&temp);
    let err = ctx
        .execute(&Commands::Build {
            root: PathBuf::from("initrd"),
            entry: "bin/sh".to_string(),
            output: None,
            tagged: false,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Vfs(_)));
    assert!(!temp.path().join("initrd.vfs").exists());
}

#[test]
fn stage_then_build() {
    let temp = TempDir::new().unwrap();
    let ctx = CliContext::with_config(temp.path().to_path_buf(), VfsImageConfig::default());
    fs::write(temp.path().join("init.elf"), b"\x7fELF").unwrap();
    fs::write(temp.path().join("sh.elf"), b"\x7fELF-sh").unwrap();

    let output = ctx
        .execute(&Commands::Stage {
            files: vec![PathBuf::from("init.elf"), PathBuf::from("sh.elf")],
            dests: vec!["init".to_string(), "bin/sh".to_string()],
            staging_dir: PathBuf::from("staging"),
        })
        .unwrap();
    assert_eq!(output.lines().count(), 2);

    ctx.execute(&Commands::Build {
        root: PathBuf::from("staging"),
        entry: "init".to_string(),
        output: Some(PathBuf::from("staged.vfs")),
        tagged: false,
    })
    .unwrap();
    assert!(temp.path().join("staged.vfs").exists());
}
