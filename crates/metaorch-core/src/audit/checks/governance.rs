//! Governance and documentation reference checks
//!
//! These are plain substring searches over Markdown. Documents are never
//! parsed structurally.

use std::path::Path;

use super::{read_artifact, AuditCheck};
use crate::audit::workspace::WorkspaceReader;
use crate::audit::Finding;
use crate::config::AuditLayout;

/// Which orchestrator flavour a governance document declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorKind {
    System,
    App,
}

impl OrchestratorKind {
    pub fn detect(text: &str, layout: &AuditLayout) -> Self {
        if text.contains(layout.system_marker.as_str()) {
            OrchestratorKind::System
        } else {
            OrchestratorKind::App
        }
    }

    pub fn checklist(self, layout: &AuditLayout) -> &'static [&'static str] {
        match self {
            OrchestratorKind::System => layout.system_checklist(),
            OrchestratorKind::App => layout.app_checklist(),
        }
    }
}

/// Required references absent from a governance document
pub fn missing_references<'a>(text: &str, checklist: &[&'a str]) -> Vec<&'a str> {
    checklist
        .iter()
        .copied()
        .filter(|r| !text.contains(r))
        .collect()
}

/// The app governance document must mention every reference of its checklist
pub struct GovernanceDocCheck;

impl AuditCheck for GovernanceDocCheck {
    fn id(&self) -> &'static str {
        "governance-doc"
    }

    fn description(&self) -> &'static str {
        "governance document carries every required reference"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        let path = &layout.governance_doc;
        if !workspace.exists(Path::new(path)) {
            findings.push(Finding::error(format!("Missing required file: {}", path)));
            return findings;
        }
        let Some(text) = read_artifact(workspace, path, &mut findings) else {
            return findings;
        };

        let kind = OrchestratorKind::detect(&text, layout);
        let missing = missing_references(&text, kind.checklist(layout));
        if !missing.is_empty() {
            findings.push(Finding::error(format!(
                "{} missing required references: {}",
                path,
                missing.join(", ")
            )));
        }
        findings
    }
}

/// Both user-facing READMEs must carry the source-of-truth section
pub struct SourcesOfTruthCheck;

impl AuditCheck for SourcesOfTruthCheck {
    fn id(&self) -> &'static str {
        "sources-of-truth"
    }

    fn description(&self) -> &'static str {
        "documentation declares its sources of truth"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        for doc in &layout.docs {
            if !workspace.exists(Path::new(doc)) {
                findings.push(Finding::error(format!("Missing doc: {}", doc)));
                continue;
            }
            let Some(text) = read_artifact(workspace, doc, &mut findings) else {
                continue;
            };
            if !text.contains(layout.docs_marker.as_str()) {
                findings.push(Finding::error(format!(
                    "{} section missing in {}",
                    layout.docs_marker, doc
                )));
            }
        }
        findings
    }
}
