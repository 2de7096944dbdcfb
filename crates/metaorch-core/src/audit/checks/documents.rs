//! Presence, syntax and mirror checks for workspace documents

use std::path::Path;

use super::{load_json, read_artifact, AuditCheck};
use crate::audit::workspace::WorkspaceReader;
use crate::audit::Finding;
use crate::config::AuditLayout;

/// The agent context file must exist and be valid JSON
pub struct ContextFileCheck;

impl AuditCheck for ContextFileCheck {
    fn id(&self) -> &'static str {
        "context-file"
    }

    fn description(&self) -> &'static str {
        "agent context file exists and is valid JSON"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        load_json(workspace, &layout.agent_context, &mut findings);
        findings
    }
}

/// The workspace tracker must exist and be valid JSON
pub struct TrackerCheck;

impl AuditCheck for TrackerCheck {
    fn id(&self) -> &'static str {
        "workspace-tracker"
    }

    fn description(&self) -> &'static str {
        "workspace tracker exists and is valid JSON"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        load_json(workspace, &layout.tracker, &mut findings);
        findings
    }
}

/// Without the orchestrator state file, role locks may not be enforced
pub struct StateLockCheck;

impl AuditCheck for StateLockCheck {
    fn id(&self) -> &'static str {
        "state-lock"
    }

    fn description(&self) -> &'static str {
        "orchestrator state file is present (advisory)"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        if workspace.exists(Path::new(&layout.state_lock)) {
            Vec::new()
        } else {
            vec![Finding::warning(format!(
                "{} missing (role lock may not be enforced)",
                layout.state_lock
            ))]
        }
    }
}

/// Normalize a generated mirror for comparison with its canonical source.
///
/// Lines containing `marker` are dropped, leading blank lines trimmed and a
/// run of blank lines after a `#` title collapsed to one.
pub fn normalize_mirror(text: &str, marker: &str) -> String {
    let mut lines: Vec<&str> = text.lines().filter(|l| !l.contains(marker)).collect();

    let first = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    lines.drain(..first);

    if lines.first().is_some_and(|l| l.starts_with('#')) {
        let mut idx = 1;
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
        if idx > 2 {
            lines[1] = "";
            lines.drain(2..idx);
        }
    }

    lines.join("\n").trim().to_string()
}

/// The app's essence mirror must match the canonical essence after
/// normalization
pub struct MirrorDriftCheck;

impl AuditCheck for MirrorDriftCheck {
    fn id(&self) -> &'static str {
        "mirror-drift"
    }

    fn description(&self) -> &'static str {
        "mirrored essence matches the canonical essence"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        for path in [&layout.essence, &layout.essence_mirror] {
            if !workspace.exists(Path::new(path)) {
                findings.push(Finding::error(format!("{} missing", path)));
                return findings;
            }
        }

        let canonical = read_artifact(workspace, &layout.essence, &mut findings);
        let mirror = read_artifact(workspace, &layout.essence_mirror, &mut findings);
        let (Some(canonical), Some(mirror)) = (canonical, mirror) else {
            return findings;
        };

        if canonical.trim() != normalize_mirror(&mirror, &layout.mirror_marker) {
            findings.push(Finding::error(format!(
                "{} does not match {} (mirror drift)",
                layout.essence_mirror, layout.essence
            )));
        }
        findings
    }
}
