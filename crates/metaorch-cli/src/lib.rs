//! Command-line tools for meta-orchestrator workspaces
//!
//! - `metaorch-merge` splices an application's `[mcp_servers.*]` and
//!   `[profiles.*]` sections into a shared Codex config.
//! - `metaorch-audit` runs the consistency audit over a workspace root.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Merge the app's runtime sections into the user's Codex config
//! metaorch-merge --source .app/runtime/codex_mcp_servers.toml --dest ~/.codex/config.toml --backup
//!
//! # Preview without writing
//! metaorch-merge -s .app/runtime/codex_mcp_servers.toml -d ~/.codex/config.toml --dry-run
//!
//! # Audit the current workspace, or emit the report as JSON
//! metaorch-audit
//! metaorch-audit --root /srv/shop --format json
//! ```

pub mod cli;

pub use cli::{AuditCli, AuditOutput, ExitCode, MergeCli, OutputFormat};

/// Run the merge tool and map any error to an exit code
pub fn run_merge_cli(cli: MergeCli) -> ExitCode {
    report_error(cli::commands::execute_merge(&cli))
}

/// Run the audit tool and map any error to an exit code
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use metaorch_cli::{run_audit_cli, AuditCli};
///
/// fn main() {
///     let cli = AuditCli::parse();
///     let exit_code = run_audit_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_audit_cli(cli: AuditCli) -> ExitCode {
    report_error(cli::commands::execute_audit(&cli))
}

fn report_error(result: metaorch_core::Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    }
}
