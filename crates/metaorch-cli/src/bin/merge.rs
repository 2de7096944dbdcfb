//! metaorch-merge
//!
//! # Usage
//!
//! ```bash
//! metaorch-merge --source .app/runtime/codex_mcp_servers.toml --dest ~/.codex/config.toml
//! ```
//!
//! # Exit Codes
//!
//! - 0: Merge written (or printed with `--dry-run`)
//! - 3: Source holds no mergeable sections
//! - 4: Source missing or a file could not be read or written
//! - 10: Internal error

use clap::Parser;
use metaorch_cli::{cli::init_tracing, run_merge_cli, MergeCli};

fn main() {
    let cli = MergeCli::parse();
    init_tracing(cli.verbose);

    let exit_code = run_merge_cli(cli);
    std::process::exit(exit_code.into());
}
