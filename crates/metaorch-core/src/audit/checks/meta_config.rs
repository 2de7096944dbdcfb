//! Primary config validity

use serde_json::Value;

use super::{load_json, AuditCheck};
use crate::audit::workspace::WorkspaceReader;
use crate::audit::Finding;
use crate::config::AuditLayout;

/// `meta_config.json` must parse, carry no duplicate keys and declare the
/// timeout and coordination mode
pub struct PrimaryConfigCheck;

impl AuditCheck for PrimaryConfigCheck {
    fn id(&self) -> &'static str {
        "primary-config"
    }

    fn description(&self) -> &'static str {
        "primary config parses without duplicate keys and has required keys"
    }

    fn run(&self, workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        let path = &layout.meta_config;
        let Some(parsed) = load_json(workspace, path, &mut findings) else {
            return findings;
        };

        if !parsed.duplicates.is_empty() {
            let keys: Vec<&str> = parsed.duplicates.iter().map(String::as_str).collect();
            findings.push(Finding::error(format!(
                "{} has duplicate keys: {}",
                path,
                keys.join(", ")
            )));
        }

        let Some(object) = parsed.value.as_object() else {
            findings.push(Finding::error(format!("{} must be a JSON object", path)));
            return findings;
        };

        for key in [&layout.timeout_key, &layout.coordination_key] {
            if !object.contains_key(key.as_str()) {
                findings.push(Finding::error(format!("{} missing {}", path, key)));
            }
        }

        findings
    }
}

/// The declared tool timeout, if the primary config parses and carries one.
///
/// Absence or invalidity is reported by [`PrimaryConfigCheck`], so this stays
/// silent.
pub fn declared_timeout(workspace: &dyn WorkspaceReader, layout: &AuditLayout) -> Option<Value> {
    let mut ignored = Vec::new();
    let parsed = load_json(workspace, &layout.meta_config, &mut ignored)?;
    parsed
        .value
        .get(&layout.timeout_key)
        .filter(|v| !v.is_null())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryWorkspace;

    fn run(ws: &InMemoryWorkspace) -> Vec<Finding> {
        PrimaryConfigCheck.run(ws, &AuditLayout::default())
    }

    #[test]
    fn test_missing_config_is_error() {
        let findings = run(&InMemoryWorkspace::new());
        assert_eq!(findings, vec![Finding::error("meta_config.json missing")]);
    }

    #[test]
    fn test_valid_config_passes() {
        let ws = InMemoryWorkspace::new().with_file(
            "meta_config.json",
            r#"{"mcp_tool_timeout_seconds": 30, "coordination_mode": "docs-first"}"#,
        );
        assert!(run(&ws).is_empty());
    }

    #[test]
    fn test_duplicate_and_missing_keys() {
        let ws = InMemoryWorkspace::new().with_file(
            "meta_config.json",
            r#"{"b": 1, "a": 1, "b": 2, "nested": {"a": 1, "a": 2}}"#,
        );
        let messages: Vec<_> = run(&ws).into_iter().map(|f| f.message).collect();
        assert_eq!(
            messages,
            vec![
                "meta_config.json has duplicate keys: a, b",
                "meta_config.json missing mcp_tool_timeout_seconds",
                "meta_config.json missing coordination_mode",
            ]
        );
    }

    #[test]
    fn test_invalid_json_carries_parser_message() {
        let ws = InMemoryWorkspace::new().with_file("meta_config.json", "{\"a\": 1,}");
        let findings = run(&ws);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("meta_config.json invalid JSON: "));
        assert!(findings[0].message.contains("line 1"));
    }

    #[test]
    fn test_non_object_root() {
        let ws = InMemoryWorkspace::new().with_file("meta_config.json", "[1, 2]");
        assert_eq!(
            run(&ws),
            vec![Finding::error("meta_config.json must be a JSON object")]
        );
    }

    #[test]
    fn test_declared_timeout() {
        let layout = AuditLayout::default();
        let ws = InMemoryWorkspace::new()
            .with_file("meta_config.json", r#"{"mcp_tool_timeout_seconds": 45}"#);
        assert_eq!(declared_timeout(&ws, &layout), Some(serde_json::json!(45)));
        assert_eq!(declared_timeout(&InMemoryWorkspace::new(), &layout), None);
    }
}
