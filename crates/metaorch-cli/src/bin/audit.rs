//! metaorch-audit
//!
//! # Usage
//!
//! ```bash
//! metaorch-audit --root /srv/shop
//! metaorch-audit --list-checks
//! ```
//!
//! # Exit Codes
//!
//! - 0: No errors (warnings allowed)
//! - 1: At least one error
//! - 4: Workspace root not found
//! - 10: Internal error

use clap::Parser;
use metaorch_cli::{cli::init_tracing, run_audit_cli, AuditCli};

fn main() {
    let cli = AuditCli::parse();
    init_tracing(cli.verbose);

    let exit_code = run_audit_cli(cli);
    std::process::exit(exit_code.into());
}
