//! CLI command definitions for the merge and audit tools
//!
//! Each tool is a single command, so there are no subcommands; both share
//! the `-v` verbosity flag.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use metaorch_core::{
    merge_with_marker, mergeable_targets, AuditEngine, FsWorkspace, MergeOutcome, MergePolicy,
    MetaorchError, Result,
};

use super::output::{merge_summary, AuditOutput, OutputFormat};
use super::ExitCode;

/// Merge an application's MCP server and profile sections into a shared
/// Codex configuration.
///
/// Sections named `mcp_servers.*` or `profiles.*` in the source replace the
/// same-named sections of the destination; everything else in the
/// destination is kept as is.
#[derive(Parser, Debug)]
#[command(name = "metaorch-merge")]
#[command(about = "Merge app-owned TOML sections into a shared Codex config", long_about = None)]
#[command(version)]
pub struct MergeCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Fragment holding the sections to merge
    #[arg(short, long, env = "METAORCH_MERGE_SOURCE")]
    pub source: PathBuf,

    /// Document to merge into; created when missing
    #[arg(short, long, env = "METAORCH_MERGE_DEST")]
    pub dest: PathBuf,

    /// Print the merged document instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Save the current destination to `<dest>.bak` before writing
    ///
    /// Nothing is saved with `--dry-run`, since nothing is written.
    #[arg(long)]
    pub backup: bool,
}

/// Audit a meta-orchestrator workspace for structural consistency.
#[derive(Parser, Debug)]
#[command(name = "metaorch-audit")]
#[command(about = "Consistency audit for meta-orchestrator workspaces", long_about = None)]
#[command(version)]
pub struct AuditCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Workspace root the layout is resolved against
    #[arg(long, env = "METAORCH_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format for the report
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// List the checks in run order and exit
    #[arg(long)]
    pub list_checks: bool,
}

/// Path of the backup written by `--backup`
pub fn backup_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Read, merge and (unless `dry_run`) write. Nothing is written when the
/// source is missing or holds no mergeable sections.
pub fn merge_files(cli: &MergeCli, policy: &MergePolicy) -> Result<MergeOutcome> {
    if !cli.source.is_file() {
        return Err(MetaorchError::file_error(format!(
            "source fragment not found: {}",
            cli.source.display()
        )));
    }
    let fragment = fs::read_to_string(&cli.source).map_err(|e| {
        MetaorchError::file_error(format!(
            "Failed to read source '{}': {}",
            cli.source.display(),
            e
        ))
    })?;

    let targets = mergeable_targets(&fragment, policy);
    if targets.is_empty() {
        return Err(MetaorchError::invalid_input(format!(
            "no mergeable sections ({}) in {}",
            policy
                .prefixes
                .iter()
                .map(|p| format!("[{}.*]", p))
                .collect::<Vec<_>>()
                .join(", "),
            cli.source.display()
        )));
    }

    let base = if cli.dest.exists() {
        fs::read_to_string(&cli.dest).map_err(|e| {
            MetaorchError::file_error(format!(
                "Failed to read destination '{}': {}",
                cli.dest.display(),
                e
            ))
        })?
    } else {
        info!(dest = %cli.dest.display(), "destination missing, starting from an empty document");
        String::new()
    };

    let outcome = merge_with_marker(&base, &targets, &policy.marker);
    if let Err(e) = toml::from_str::<toml::Value>(&outcome.text) {
        warn!(dest = %cli.dest.display(), error = %e, "merged document is not valid TOML");
    }

    if cli.dry_run {
        return Ok(outcome);
    }

    if cli.backup && cli.dest.exists() {
        let backup = backup_path(&cli.dest);
        fs::write(&backup, &base)?;
        info!(backup = %backup.display(), "wrote backup");
    }
    if let Some(parent) = cli.dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&cli.dest, &outcome.text).map_err(|e| {
        MetaorchError::file_error(format!(
            "Failed to write destination '{}': {}",
            cli.dest.display(),
            e
        ))
    })?;
    info!(
        dest = %cli.dest.display(),
        replaced = outcome.replaced.len(),
        appended = outcome.appended.len(),
        "merge written"
    );

    Ok(outcome)
}

/// Execute the merge command
pub fn execute_merge(cli: &MergeCli) -> Result<ExitCode> {
    let outcome = merge_files(cli, &MergePolicy::default())?;
    if cli.dry_run {
        print!("{}", outcome.text);
    } else {
        eprintln!("{}", merge_summary(&cli.dest, &outcome));
    }
    Ok(ExitCode::Success)
}

/// Execute the audit command
pub fn execute_audit(cli: &AuditCli) -> Result<ExitCode> {
    let engine = AuditEngine::new();

    if cli.list_checks {
        for check in engine.checks() {
            println!("{:<22} {}", check.id(), check.description());
        }
        return Ok(ExitCode::Success);
    }

    if !cli.root.is_dir() {
        return Err(MetaorchError::file_error(format!(
            "workspace root not found: {}",
            cli.root.display()
        )));
    }

    let report = engine.run(&FsWorkspace::new(&cli.root));
    AuditOutput::new(&report).render(cli.format)?;
    Ok(ExitCode::from_report(&report))
}
