use clap::{CommandFactory, Parser};
use vfsimage::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["vfsimage", "build", "initrd", "--entry", "bin/init"],
        vec!["vfsimage", "build", "initrd", "-e", "init", "-o", "out.vfs"],
        vec!["vfsimage", "build", "initrd", "--entry", "init", "--tagged"],
        vec!["vfsimage", "dump", "initrd.vfs"],
        vec!["vfsimage", "dump", "initrd.vfs", "--format", "json", "--contents"],
        vec![
            "vfsimage",
            "stage",
            "--files",
            "a.elf",
            "--dests",
            "bin/a",
            "--staging-dir",
            "initrd",
        ],
        vec!["vfsimage", "--verbose", "dump", "initrd.vfs"],
        vec!["vfsimage", "dump", "initrd.vfs", "--log-format", "json"],
        vec!["vfsimage", "--config", "custom.toml", "build", "r", "-e", "init"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected parse success for {:?}", args);
    }
}

#[test]
fn parse_invalid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["vfsimage"],
        vec!["vfsimage", "build", "initrd"],
        vec!["vfsimage", "build", "--entry", "init"],
        vec!["vfsimage", "dump"],
        vec!["vfsimage", "stage", "--files", "a", "--staging-dir", "s"],
        vec!["vfsimage", "scan"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_err(), "expected parse failure for {:?}", args);
    }
}

#[test]
fn build_flags_are_mapped() {
    let cli = Cli::try_parse_from([
        "vfsimage", "build", "root", "--entry", "bin/init", "-o", "x.vfs", "--tagged",
    ])
    .unwrap();
    match cli.command {
        Commands::Build {
            root,
            entry,
            output,
            tagged,
        } => {
            assert_eq!(root.to_str(), Some("root"));
            assert_eq!(entry, "bin/init");
            assert_eq!(output.as_deref().and_then(|p| p.to_str()), Some("x.vfs"));
            assert!(tagged);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn help_lists_subcommands() {
    let help = Cli::command().render_help().to_string();
    for token in ["build", "dump", "stage"] {
        assert!(help.contains(token), "help is missing {token}");
    }
}
