//! Cross-checks against the generated MCP server runtime document
//!
//! The runtime document is scanned textually for `tool_timeout_sec` and
//! `cwd` assignments; it is never parsed as TOML.

use std::path::Path;

use regex::Regex;
use serde_json::Value;

use super::meta_config::declared_timeout;
use super::{read_artifact, AuditCheck};
use crate::audit::workspace::WorkspaceReader;
use crate::audit::Finding;
use crate::config::AuditLayout;

/// Every `tool_timeout_sec` in the runtime document must equal the declared
/// `mcp_tool_timeout_seconds`
pub struct TimeoutConsistencyCheck {
    pattern: Regex,
}

impl Default for TimeoutConsistencyCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeoutConsistencyCheck {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"tool_timeout_sec\s*=\s*(\d+)").expect("static pattern"),
        }
    }

    /// Observed timeout values as written, in document order
    pub fn observed<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }
}

/// Decimal digits without leading zeros
fn canonical_digits(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// A value too large for `u64` never matches
fn timeout_matches(declared: &Value, observed: &str) -> bool {
    match observed.parse::<u64>() {
        Ok(v) => declared.as_u64() == Some(v) || declared.as_f64().is_some_and(|d| d == v as f64),
        Err(_) => false,
    }
}

/// Observed values that disagree with `declared`, in numeric order without
/// repeats
pub fn mismatched_timeouts<'t>(declared: &Value, observed: &[&'t str]) -> Vec<&'t str> {
    let mut values: Vec<&str> = observed
        .iter()
        .map(|&v| canonical_digits(v))
        .filter(|v| !timeout_matches(declared, v))
        .collect();
    values.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    values.dedup();
    values
}

impl AuditCheck for TimeoutConsistencyCheck {
    fn id(&self) -> &'static str {
        "timeout-consistency"
    }

    fn description(&self) -> &'static str {
        "runtime MCP tool timeouts match the declared timeout"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        let Some(declared) = declared_timeout(workspace, layout) else {
            return findings;
        };

        let runtime = &layout.runtime_servers;
        if !workspace.exists(Path::new(runtime)) {
            findings.push(Finding::warning(format!(
                "{} missing (MCP timeout consistency not checked)",
                runtime
            )));
            return findings;
        }
        let Some(text) = read_artifact(workspace, runtime, &mut findings) else {
            return findings;
        };

        let observed = self.observed(&text);
        if observed.is_empty() {
            findings.push(Finding::warning(format!(
                "No tool_timeout_sec values found in {}",
                runtime
            )));
            return findings;
        }

        let mismatched = mismatched_timeouts(&declared, &observed);
        if !mismatched.is_empty() {
            findings.push(Finding::error(format!(
                "MCP timeout mismatch: {} {}={}, {} has [{}]",
                layout.meta_config,
                layout.timeout_key,
                declared,
                runtime,
                mismatched.join(", ")
            )));
        }
        findings
    }
}

/// Every MCP server `cwd` must be a role workspace under the role subtree
/// that contains the role marker file
pub struct RoleWorkspaceCheck {
    pattern: Regex,
}

impl Default for RoleWorkspaceCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleWorkspaceCheck {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#"(?m)^\s*cwd\s*=\s*["']([^"']+)["']"#).expect("static pattern"),
        }
    }

    /// Raw `cwd` values, in document order
    pub fn paths<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }
}

/// Turn a raw `cwd` into a forward-slash path.
///
/// TOML basic strings escape each backslash, so `\\` and `\` both become
/// one separator, and runs of separators collapse.
pub fn normalize_cwd(raw: &str) -> String {
    let slashed = raw.replace("\\\\", "/").replace('\\', "/");
    let mut out = String::with_capacity(slashed.len());
    for ch in slashed.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Whether a slash-normalized path lies under `subtree` (e.g. `.app/runtime/mcp/`)
fn is_under_subtree(normalized: &str, subtree: &str) -> bool {
    let needle = format!("/{}", subtree.trim_start_matches('/'));
    let probe = if normalized.starts_with('/') {
        normalized.to_string()
    } else {
        format!("/{}", normalized.trim_start_matches("./"))
    };
    probe.contains(&needle)
}

impl AuditCheck for RoleWorkspaceCheck {
    fn id(&self) -> &'static str {
        "role-workspaces"
    }

    fn description(&self) -> &'static str {
        "MCP server working directories are role workspaces with a marker file"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        let runtime = &layout.runtime_servers;
        if !workspace.exists(Path::new(runtime)) {
            return findings;
        }
        let Some(text) = read_artifact(workspace, runtime, &mut findings) else {
            return findings;
        };

        let paths = self.paths(&text);
        if paths.is_empty() {
            findings.push(Finding::warning(format!("No cwd entries found in {}", runtime)));
            return findings;
        }

        for raw in paths {
            let normalized = normalize_cwd(raw);
            if !is_under_subtree(&normalized, &layout.role_subtree) {
                findings.push(Finding::error(format!(
                    "MCP server cwd must point to role workspace under {}: {}",
                    layout.role_subtree, raw
                )));
                continue;
            }

            let marker = Path::new(&normalized).join(&layout.role_marker_file);
            if !workspace.exists(&marker) {
                findings.push(Finding::error(format!(
                    "Missing MCP role {}: {}",
                    layout.role_marker_file,
                    marker.display()
                )));
            }
        }
        findings
    }
}
