//! Integration tests for the merge and audit binaries

use std::fs;
use std::path::Path;
use std::process::Command;

use clap::Parser;
use metaorch_cli::cli::commands::{backup_path, merge_files};
use metaorch_cli::MergeCli;
use metaorch_core::{MergePolicy, MetaorchError, MERGE_MARKER};
use tempfile::TempDir;

const FRAGMENT: &str = "\
[mcp_servers.shop__planner]
command = \"codex\"
cwd = \".app/runtime/mcp/planner\"
tool_timeout_sec = 30

[model_providers.local]
base_url = \"http://localhost\"

[profiles.shop]
model = \"o3\"
";

const CONFIG: &str = "\
model = \"gpt-5\"

[mcp_servers.shop__planner]
command = \"old\"

[mcp_servers.other]
command = \"keep\"
";

fn merge_cli(args: &[&str]) -> MergeCli {
    MergeCli::try_parse_from(std::iter::once("metaorch-merge").chain(args.iter().copied())).unwrap()
}

fn paths(dir: &TempDir) -> (String, String) {
    (
        dir.path().join("fragment.toml").display().to_string(),
        dir.path().join("config.toml").display().to_string(),
    )
}

#[test]
fn merge_replaces_in_place_and_appends_new_sections() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&source, FRAGMENT).unwrap();
    fs::write(&dest, CONFIG).unwrap();

    let outcome = merge_files(&merge_cli(&["-s", &source, "-d", &dest]), &MergePolicy::default()).unwrap();
    assert_eq!(outcome.replaced, vec!["mcp_servers.shop__planner".to_string()]);
    assert_eq!(outcome.appended, vec!["profiles.shop".to_string()]);

    let written = fs::read_to_string(&dest).unwrap();
    assert_eq!(written, outcome.text);
    assert_eq!(
        written,
        format!(
            "model = \"gpt-5\"\n\n\
             [mcp_servers.shop__planner]\n\
             command = \"codex\"\n\
             cwd = \".app/runtime/mcp/planner\"\n\
             tool_timeout_sec = 30\n\n\
             [mcp_servers.other]\n\
             command = \"keep\"\n\n\
             {}\n\
             [profiles.shop]\n\
             model = \"o3\"\n",
            MERGE_MARKER
        )
    );
    assert!(!written.contains("model_providers"));
}

#[test]
fn merge_twice_leaves_document_unchanged() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&source, FRAGMENT).unwrap();
    fs::write(&dest, CONFIG).unwrap();

    let cli = merge_cli(&["-s", &source, "-d", &dest]);
    merge_files(&cli, &MergePolicy::default()).unwrap();
    let first = fs::read_to_string(&dest).unwrap();
    merge_files(&cli, &MergePolicy::default()).unwrap();
    assert_eq!(fs::read_to_string(&dest).unwrap(), first);
}

#[test]
fn missing_destination_is_created() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("fragment.toml");
    let dest = dir.path().join("nested/.codex/config.toml");
    fs::write(&source, FRAGMENT).unwrap();

    let cli = merge_cli(&["-s", &source.display().to_string(), "-d", &dest.display().to_string()]);
    let outcome = merge_files(&cli, &MergePolicy::default()).unwrap();

    assert!(outcome.replaced.is_empty());
    let written = fs::read_to_string(&dest).unwrap();
    assert!(written.starts_with("[mcp_servers.shop__planner]\n"));
    assert!(!written.contains(MERGE_MARKER));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&source, FRAGMENT).unwrap();
    fs::write(&dest, CONFIG).unwrap();

    let outcome = merge_files(
        &merge_cli(&["-s", &source, "-d", &dest, "--dry-run"]),
        &MergePolicy::default(),
    )
    .unwrap();
    assert!(outcome.text.contains("command = \"codex\""));
    assert_eq!(fs::read_to_string(&dest).unwrap(), CONFIG);
}

#[test]
fn backup_keeps_previous_destination() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&source, FRAGMENT).unwrap();
    fs::write(&dest, CONFIG).unwrap();

    merge_files(&merge_cli(&["-s", &source, "-d", &dest, "--backup"]), &MergePolicy::default()).unwrap();
    assert_eq!(fs::read_to_string(backup_path(Path::new(&dest))).unwrap(), CONFIG);
    assert_ne!(fs::read_to_string(&dest).unwrap(), CONFIG);
}

#[test]
fn dry_run_with_backup_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&source, FRAGMENT).unwrap();
    fs::write(&dest, CONFIG).unwrap();

    merge_files(
        &merge_cli(&["-s", &source, "-d", &dest, "--dry-run", "--backup"]),
        &MergePolicy::default(),
    )
    .unwrap();
    assert!(!backup_path(Path::new(&dest)).exists());
    assert_eq!(fs::read_to_string(&dest).unwrap(), CONFIG);
}

#[test]
fn missing_source_is_a_file_error() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&dest, CONFIG).unwrap();

    let err = merge_files(&merge_cli(&["-s", &source, "-d", &dest]), &MergePolicy::default()).unwrap_err();
    assert!(matches!(err, MetaorchError::FileError(_)));
    assert_eq!(fs::read_to_string(&dest).unwrap(), CONFIG);
}

#[test]
fn fragment_without_mergeable_sections_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);
    fs::write(&source, "[model_providers.local]\nbase_url = \"x\"\n").unwrap();

    let err = merge_files(&merge_cli(&["-s", &source, "-d", &dest]), &MergePolicy::default()).unwrap_err();
    assert!(matches!(err, MetaorchError::InvalidInput(_)));
    assert!(!Path::new(&dest).exists());
}

#[test]
fn merge_binary_exit_codes() {
    let dir = TempDir::new().unwrap();
    let (source, dest) = paths(&dir);

    let missing = Command::new(env!("CARGO_BIN_EXE_metaorch-merge"))
        .args(["--source", &source, "--dest", &dest])
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("source fragment not found"));

    fs::write(&source, "[other]\nx = 1\n").unwrap();
    let empty = Command::new(env!("CARGO_BIN_EXE_metaorch-merge"))
        .args(["--source", &source, "--dest", &dest])
        .output()
        .unwrap();
    assert_eq!(empty.status.code(), Some(3));

    fs::write(&source, FRAGMENT).unwrap();
    let ok = Command::new(env!("CARGO_BIN_EXE_metaorch-merge"))
        .env_remove("RUST_LOG")
        .env("METAORCH_MERGE_SOURCE", &source)
        .env("METAORCH_MERGE_DEST", &dest)
        .output()
        .unwrap();
    assert_eq!(ok.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ok.stderr).contains("0 replaced, 2 appended"));
}

#[test]
fn audit_binary_reports_failures() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_metaorch-audit"))
        .args(["--root", &dir.path().display().to_string()])
        .env("NO_COLOR", "1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CONSISTENCY AUDIT: FAIL"));
    assert!(stderr.contains("meta_config.json missing"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("orchestrator_state.json missing"));
    assert!(!stdout.contains("CONSISTENCY AUDIT: PASS"));
}

#[test]
fn audit_binary_json_format() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_metaorch-audit"))
        .env("METAORCH_ROOT", dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], false);
    assert_eq!(report["findings"][0]["message"], "meta_config.json missing");
}

#[test]
fn audit_binary_lists_checks_in_order() {
    let output = Command::new(env!("CARGO_BIN_EXE_metaorch-audit"))
        .arg("--list-checks")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let ids: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(|l| l.split_whitespace().next().map(str::to_string))
        .collect();
    assert_eq!(
        ids,
        vec![
            "primary-config",
            "timeout-consistency",
            "role-workspaces",
            "containment",
            "governance-doc",
            "context-file",
            "mirror-drift",
            "sources-of-truth",
            "workspace-tracker",
            "state-lock",
        ]
    );
}

#[test]
fn audit_binary_missing_root() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_metaorch-audit"))
        .args(["--root", &dir.path().join("absent").display().to_string()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}
