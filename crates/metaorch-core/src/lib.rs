//! Meta-orchestrator workspace engines
//!
//! Two independent engines that share no runtime state:
//!
//! 1. **Section merge** (`sections/`): splices application-owned
//!    `[mcp_servers.*]` / `[profiles.*]` blocks into a shared Codex-style TOML
//!    document, leaving every other line untouched. Merging is idempotent.
//!
//! 2. **Consistency audit** (`audit/`): a fixed battery of structural and
//!    cross-file checks over a workspace's metadata, aggregated into a
//!    pass/fail [`AuditReport`].
//!
//! ## Example
//!
//! ```rust
//! use metaorch_core::{merge, mergeable_targets, MergePolicy};
//!
//! let fragment = "[mcp_servers.shop__planner]\ncommand = \"codex\"\n";
//! let targets = mergeable_targets(fragment, &MergePolicy::default());
//!
//! let base = "model = \"o3\"\n\n[mcp_servers.shop__planner]\ncommand = \"old\"\n";
//! let merged = merge(base, &targets);
//! assert_eq!(merged, "model = \"o3\"\n\n[mcp_servers.shop__planner]\ncommand = \"codex\"\n");
//! assert_eq!(merge(&merged, &targets), merged);
//! ```
//!
//! ```rust,no_run
//! use metaorch_core::{AuditEngine, FsWorkspace};
//!
//! let report = AuditEngine::new().run(&FsWorkspace::new("."));
//! std::process::exit(report.exit_status());
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod sections;

pub use audit::{
    AuditCheck, AuditEngine, AuditReport, Finding, FindingKind, FsWorkspace, InMemoryWorkspace,
    WorkspaceReader,
};
pub use config::{AuditLayout, MergePolicy, MERGE_MARKER};
pub use error::{MetaorchError, Result};
pub use sections::merge::merge_with_marker;
pub use sections::{header_name, merge, mergeable_targets, parse, MergeOutcome, Section, SectionMap, TargetSet};
