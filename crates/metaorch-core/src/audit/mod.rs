//! Consistency audit engine
//!
//! Runs a fixed battery of independent checks over a workspace and collects
//! their findings into an [`AuditReport`]. Checks are pure: each returns its
//! own findings and none can stop another from running.

pub mod checks;
pub mod json;
pub mod workspace;

pub use checks::{default_checks, AuditCheck};
pub use workspace::{FsWorkspace, InMemoryWorkspace, WorkspaceReader};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::AuditLayout;

/// Banner printed to stderr before the list of errors
pub const FAIL_BANNER: &str = "CONSISTENCY AUDIT: FAIL";
/// Banner printed to stdout before the list of warnings
pub const WARN_BANNER: &str = "CONSISTENCY AUDIT: WARNINGS";
/// Banner printed to stdout when there are no errors
pub const PASS_BANNER: &str = "CONSISTENCY AUDIT: PASS";

/// Whether a finding fails the audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Error,
    Warning,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::Error => write!(f, "error"),
            FindingKind::Warning => write!(f, "warning"),
        }
    }
}

/// A single error or warning emitted by a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FindingKind::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FindingKind::Error => write!(f, "- ERROR: {}", self.message),
            FindingKind::Warning => write!(f, "- WARN: {}", self.message),
        }
    }
}

/// Findings of one audit run, in check order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    passed: bool,
    findings: Vec<Finding>,
}

impl Default for AuditReport {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditReport {
    pub fn new() -> Self {
        Self {
            passed: true,
            findings: Vec::new(),
        }
    }

    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut report = Self::new();
        report.extend(findings);
        report
    }

    pub fn add_finding(&mut self, finding: Finding) {
        if finding.is_error() {
            self.passed = false;
        }
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.add_finding(finding);
        }
    }

    /// True iff no error was found; warnings never flip this
    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind == FindingKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind == FindingKind::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Process exit status: 0 on pass, 1 on fail
    pub fn exit_status(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }

    /// Lines destined for stderr (empty when the audit passed)
    pub fn error_lines(&self) -> Vec<String> {
        if self.passed {
            return Vec::new();
        }
        let mut lines = vec![String::new(), FAIL_BANNER.to_string()];
        lines.extend(self.errors().map(ToString::to_string));
        lines
    }

    /// Lines destined for stdout
    pub fn info_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.warning_count() > 0 {
            lines.push(String::new());
            lines.push(WARN_BANNER.to_string());
            lines.extend(self.warnings().map(ToString::to_string));
        }
        if self.passed {
            lines.push(PASS_BANNER.to_string());
        }
        lines
    }
}

/// Runs the registered checks in order against one workspace
pub struct AuditEngine {
    layout: AuditLayout,
    checks: Vec<Box<dyn AuditCheck>>,
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditEngine {
    /// Engine with the default layout and the full check battery
    pub fn new() -> Self {
        Self::with_layout(AuditLayout::default())
    }

    /// Engine with the full check battery over a custom layout
    pub fn with_layout(layout: AuditLayout) -> Self {
        Self {
            layout,
            checks: default_checks(),
        }
    }

    /// Engine with no checks registered
    pub fn empty(layout: AuditLayout) -> Self {
        Self {
            layout,
            checks: Vec::new(),
        }
    }

    pub fn register(&mut self, check: Box<dyn AuditCheck>) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Box<dyn AuditCheck>] {
        &self.checks
    }

    pub fn layout(&self) -> &AuditLayout {
        &self.layout
    }

    /// Run every check and concatenate the findings
    pub fn run(&self, workspace: &dyn WorkspaceReader) -> AuditReport {
        let mut report = AuditReport::new();
        for check in &self.checks {
            let findings = check.run(workspace, &self.layout);
            debug!(
                check = check.id(),
                findings = findings.len(),
                "check completed"
            );
            report.extend(findings);
        }
        info!(
            passed = report.passed(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "audit finished"
        );
        report
    }
}
