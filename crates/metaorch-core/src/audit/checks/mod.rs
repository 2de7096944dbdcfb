//! The audit check battery
//!
//! Each check reads what it needs through a [`WorkspaceReader`] and returns
//! its own findings. A check never panics and never aborts the run; read or
//! parse failures become error findings naming the artifact.

pub mod containment;
pub mod documents;
pub mod governance;
pub mod meta_config;
pub mod runtime;

use std::path::Path;

use super::json::{parse_with_duplicates, ParsedJson};
use super::workspace::WorkspaceReader;
use super::Finding;
use crate::config::AuditLayout;

/// A single structural or cross-file consistency check
pub trait AuditCheck {
    /// Stable identifier
    fn id(&self) -> &'static str;

    /// One-line description for check listings
    fn description(&self) -> &'static str;

    /// Evaluate the check against a workspace
    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding>;
}

/// The full battery in the order it runs
pub fn default_checks() -> Vec<Box<dyn AuditCheck>> {
    vec![
        Box::new(meta_config::PrimaryConfigCheck),
        Box::new(runtime::TimeoutConsistencyCheck::new()),
        Box::new(runtime::RoleWorkspaceCheck::new()),
        Box::new(containment::ContainmentCheck),
        Box::new(governance::GovernanceDocCheck),
        Box::new(documents::ContextFileCheck),
        Box::new(documents::MirrorDriftCheck),
        Box::new(governance::SourcesOfTruthCheck),
        Box::new(documents::TrackerCheck),
        Box::new(documents::StateLockCheck),
    ]
}

/// Read a file that the check has already confirmed exists
fn read_artifact(
    workspace: &dyn WorkspaceReader,
    path: &str,
    findings: &mut Vec<Finding>,
) -> Option<String> {
    match workspace.read_to_string(Path::new(path)) {
        Ok(text) => Some(text),
        Err(e) => {
            findings.push(Finding::error(format!("failed to read {}: {}", path, e)));
            None
        }
    }
}

/// Read and parse a JSON artifact, reporting absence and syntax errors
fn load_json(
    workspace: &dyn WorkspaceReader,
    path: &str,
    findings: &mut Vec<Finding>,
) -> Option<ParsedJson> {
    if !workspace.exists(Path::new(path)) {
        findings.push(Finding::error(format!("{} missing", path)));
        return None;
    }
    let text = read_artifact(workspace, path, findings)?;
    match parse_with_duplicates(&text) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            findings.push(Finding::error(format!("{} invalid JSON: {}", path, e)));
            None
        }
    }
}
