//! Containment of the application subtree

use std::path::Path;

use super::AuditCheck;
use crate::audit::workspace::WorkspaceReader;
use crate::audit::Finding;
use crate::config::AuditLayout;

/// Markdown under the app directory must not reach into the engine's
/// private namespace or escape upward with relative paths
pub struct ContainmentCheck;

impl AuditCheck for ContainmentCheck {
    fn id(&self) -> &'static str {
        "containment"
    }

    fn description(&self) -> &'static str {
        "application docs contain no engine-relative references"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        let app_dir = Path::new(&layout.app_dir);
        if !workspace.is_dir(app_dir) {
            findings.push(Finding::error(format!("{}/ is missing", layout.app_dir)));
            return findings;
        }

        let files = match workspace.list_files(app_dir) {
            Ok(files) => files,
            Err(e) => {
                findings.push(Finding::error(format!(
                    "failed to scan {}/: {}",
                    layout.app_dir, e
                )));
                return findings;
            }
        };

        let mut violations = Vec::new();
        for file in files
            .iter()
            .filter(|f| f.extension().is_some_and(|ext| ext == "md"))
        {
            match workspace.read_to_string(file) {
                Ok(text) => {
                    if layout.leak_patterns.iter().any(|p| text.contains(p.as_str())) {
                        violations.push(file.display().to_string());
                    }
                }
                Err(e) => findings.push(Finding::error(format!(
                    "failed to read {}: {}",
                    file.display(),
                    e
                ))),
            }
        }

        if !violations.is_empty() {
            findings.push(Finding::error(format!(
                "{}/ contains engine-relative references ({}): {}",
                layout.app_dir,
                layout.leak_patterns.join(" or "),
                violations.join(", ")
            )));
        }
        findings
    }
}
