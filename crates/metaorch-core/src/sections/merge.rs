//! Splice named sections into an existing document
//!
//! Everything outside the targeted sections is copied through line by line
//! (trailing whitespace stripped). Each targeted name ends up exactly once in
//! the output: at its first original occurrence, or appended at the end
//! under a single marker line.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::{header_name, parse};
use crate::config::{MergePolicy, MERGE_MARKER};

/// Insertion-ordered mapping from section name to replacement body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    entries: Vec<(String, String)>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body. An existing name keeps its position and gets the new body.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        let name = name.into();
        let body = body.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = body,
            None => self.entries.push((name, body)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), b.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, B: Into<String>> FromIterator<(N, B)> for TargetSet {
    fn from_iter<I: IntoIterator<Item = (N, B)>>(iter: I) -> Self {
        let mut set = TargetSet::new();
        for (name, body) in iter {
            set.insert(name, body);
        }
        set
    }
}

/// Result of a merge along with what happened to each target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Merged document, single trailing newline
    pub text: String,
    /// Targets replaced at their original position
    pub replaced: Vec<String>,
    /// Targets appended after the marker (or forming an empty base)
    pub appended: Vec<String>,
    /// Later duplicate occurrences of a target that were removed
    pub duplicates_dropped: usize,
}

/// Extract the sections of `fragment` that `policy` allows to be merged.
///
/// Bodies are the standalone rendering of each section, header included.
pub fn mergeable_targets(fragment: &str, policy: &MergePolicy) -> TargetSet {
    let mut targets = TargetSet::new();
    for section in parse(fragment).iter() {
        if policy.is_mergeable(&section.name) {
            targets.insert(section.name.clone(), section.body());
        } else {
            debug!(section = %section.name, "ignoring section outside merge namespace");
        }
    }
    targets
}

/// Merge `targets` into `base` using the default marker line
pub fn merge(base: &str, targets: &TargetSet) -> String {
    merge_with_marker(base, targets, MERGE_MARKER).text
}

/// Merge `targets` into `base`, introducing appended sections with `marker`
pub fn merge_with_marker(base: &str, targets: &TargetSet, marker: &str) -> MergeOutcome {
    if base.trim().is_empty() {
        let blocks: Vec<String> = targets
            .iter()
            .map(|(_, body)| block_lines(body).join("\n"))
            .collect();
        return MergeOutcome {
            text: finish(&blocks.join("\n\n")),
            replaced: Vec::new(),
            appended: targets.names().map(str::to_string).collect(),
            duplicates_dropped: 0,
        };
    }

    let lines: Vec<&str> = base.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut replaced = Vec::new();
    let mut duplicates_dropped = 0;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim_end();
        let target = header_name(line).and_then(|name| targets.get(name).map(|b| (name, b)));

        let Some((name, body)) = target else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let end = occurrence_end(&lines, i, marker);
        if seen.insert(name.to_string()) {
            // Keep the blank-line separator that trailed the old block.
            let separator = lines[i..end]
                .iter()
                .rev()
                .take_while(|l| l.trim().is_empty())
                .count();
            out.extend(block_lines(body).into_iter().map(str::to_string));
            out.extend(std::iter::repeat(String::new()).take(separator));
            replaced.push(name.to_string());
            debug!(section = name, "replaced section in place");
        } else {
            duplicates_dropped += 1;
            debug!(section = name, "dropped duplicate section occurrence");
        }
        i = end;
    }

    let missing: Vec<(&str, &str)> = targets
        .iter()
        .filter(|(name, _)| !seen.contains(*name))
        .collect();

    if !missing.is_empty() {
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        out.push(String::new());
        out.push(marker.to_string());
        for (name, body) in &missing {
            out.extend(block_lines(body).into_iter().map(str::to_string));
            out.push(String::new());
            debug!(section = name, "appended section");
        }
    }

    MergeOutcome {
        text: finish(&out.join("\n")),
        replaced,
        appended: missing.iter().map(|(n, _)| n.to_string()).collect(),
        duplicates_dropped,
    }
}

/// Index one past the last line of the occurrence starting at `start`
fn occurrence_end(lines: &[&str], start: usize, marker: &str) -> usize {
    lines[start + 1..]
        .iter()
        .position(|l| header_name(l).is_some() || l.trim() == marker)
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len())
}

/// Body lines without leading or trailing blank lines
fn block_lines(body: &str) -> Vec<&str> {
    let lines: Vec<&str> = body.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end].to_vec()
}

fn finish(text: &str) -> String {
    let mut out = text.trim_end().to_string();
    out.push('\n');
    out
}
