//! Merge policy and audit layout
//!
//! Both engines take their constants from these structs so tests can point
//! them at other names. `Default` carries the values every meta-orchestrator
//! workspace uses.

/// Marker line introducing sections appended by the merger
pub const MERGE_MARKER: &str = "# --- merged by metaorch-merge ---";

/// Which sections of a source fragment may be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    /// Accepted first dot-segments of a section name
    pub prefixes: Vec<String>,
    /// Comment line emitted once before appended sections
    pub marker: String,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            prefixes: vec!["mcp_servers".to_string(), "profiles".to_string()],
            marker: MERGE_MARKER.to_string(),
        }
    }
}

impl MergePolicy {
    /// Replace the recognized prefixes
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the marker comment
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Whether a section name falls in an application-owned namespace
    pub fn is_mergeable(&self, name: &str) -> bool {
        let first = name.split('.').next().unwrap_or("").trim();
        self.prefixes.iter().any(|p| p == first)
    }
}

/// Workspace-relative artifacts and marker strings the audit checks read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLayout {
    pub meta_config: String,
    pub timeout_key: String,
    pub coordination_key: String,
    pub runtime_servers: String,
    pub role_subtree: String,
    pub role_marker_file: String,
    pub app_dir: String,
    pub leak_patterns: Vec<String>,
    pub governance_doc: String,
    pub system_marker: String,
    pub agent_context: String,
    pub essence: String,
    pub essence_mirror: String,
    pub mirror_marker: String,
    pub docs: Vec<String>,
    pub docs_marker: String,
    pub tracker: String,
    pub state_lock: String,
}

impl Default for AuditLayout {
    fn default() -> Self {
        Self {
            meta_config: "meta_config.json".to_string(),
            timeout_key: "mcp_tool_timeout_seconds".to_string(),
            coordination_key: "coordination_mode".to_string(),
            runtime_servers: ".app/runtime/codex_mcp_servers.toml".to_string(),
            role_subtree: ".app/runtime/mcp/".to_string(),
            role_marker_file: "AGENTS.md".to_string(),
            app_dir: ".app".to_string(),
            leak_patterns: vec![".meta/".to_string(), "../".to_string()],
            governance_doc: ".app/AGENTS.md".to_string(),
            system_marker: "System Orchestrator".to_string(),
            agent_context: ".app/agent_context.json".to_string(),
            essence: "essence.md".to_string(),
            essence_mirror: ".app/essence.md".to_string(),
            mirror_marker: "generated mirror".to_string(),
            docs: vec!["README.md".to_string(), "docs/user/README.md".to_string()],
            docs_marker: "Sources of Truth".to_string(),
            tracker: ".workspace/tracker.json".to_string(),
            state_lock: "orchestrator_state.json".to_string(),
        }
    }
}

impl AuditLayout {
    /// References a system orchestrator's governance document must carry
    pub fn system_checklist(&self) -> &'static [&'static str] {
        &[
            "coordination/repo_graph.json",
            "coordination/requests/",
            "coordination/events/",
            "coordination/index.json",
            "compatibility_matrix.json",
            "cross_repo_test_plan.md",
            "agent_context.json",
            "orchestrator_state.json",
            "meta_config.json",
            "Documentation Index",
            "Docs-first rule",
            "Subagent enforcement",
            "Identity confirmation",
            "SYSTEM_OVERRIDES_START",
        ]
    }

    /// References an app orchestrator's governance document must carry
    pub fn app_checklist(&self) -> &'static [&'static str] {
        &[
            "tracker.json",
            "orchestrator_state.json",
            "essence.md",
            "agent_context.json",
            "meta_config.json",
            ".app/roles/",
            "Documentation Index",
            "Docs-first rule",
            "Subagent enforcement",
            "Identity confirmation",
            "APP_OVERRIDES_START",
        ]
    }
}
