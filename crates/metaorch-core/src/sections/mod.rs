//! Line-oriented section parsing for Codex-style TOML documents
//!
//! Only top-level `[name]` headers are recognized. Bodies are kept as
//! verbatim lines; no TOML semantics are interpreted.

pub mod merge;

pub use merge::{merge, mergeable_targets, MergeOutcome, TargetSet};

use std::collections::HashMap;

/// Return the section name if `line` is a section header.
///
/// `[[array.of.tables]]` lines are not headers.
pub fn header_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with("[[") {
        return None;
    }
    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(trimmed[1..trimmed.len() - 1].trim())
    } else {
        None
    }
}

/// A named block of lines, header included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub lines: Vec<String>,
}

impl Section {
    /// Render as a standalone block with trailing blank lines removed
    pub fn body(&self) -> String {
        let mut end = self.lines.len();
        while end > 0 && self.lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        self.lines[..end].join("\n")
    }
}

/// Sections of a document in first-seen order
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl SectionMap {
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&i| &self.sections[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Open `name`, or reopen it if already seen. Returns its slot.
    fn open(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        self.sections.push(Section {
            name: name.to_string(),
            lines: Vec::new(),
        });
        let i = self.sections.len() - 1;
        self.index.insert(name.to_string(), i);
        i
    }
}

/// Split `text` into sections.
///
/// Preamble lines are dropped. A header that repeats appends its lines to the
/// body already collected under that name.
pub fn parse(text: &str) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current: Option<usize> = None;

    for raw in text.lines() {
        let line = raw.trim_end();
        if let Some(name) = header_name(line) {
            current = Some(map.open(name));
        }
        if let Some(slot) = current {
            map.sections[slot].lines.push(line.to_string());
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection() {
        assert_eq!(header_name("[mcp_servers.shop]"), Some("mcp_servers.shop"));
        assert_eq!(header_name("  [ profiles.shop ]  "), Some("profiles.shop"));
        assert_eq!(header_name("[[mcp_servers.shop.tools]]"), None);
        assert_eq!(header_name("key = [1, 2]"), None);
        assert_eq!(header_name("[a] # comment"), None);
        assert_eq!(header_name("["), None);
    }

    #[test]
    fn test_parse_collects_bodies_with_headers() {
        let text = "model = \"o3\"\n\n[a]\nx = 1   \n\n[b.c]\ny = 2\n";
        let map = parse(text);

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["a", "b.c"]);
        assert_eq!(map.get("a").unwrap().lines, vec!["[a]", "x = 1", ""]);
        assert_eq!(map.get("a").unwrap().body(), "[a]\nx = 1");
        assert_eq!(map.get("b.c").unwrap().body(), "[b.c]\ny = 2");
    }

    #[test]
    fn test_preamble_is_not_returned() {
        let map = parse("model = \"o3\"\napproval = \"never\"\n");
        assert!(map.is_empty());
    }

    #[test]
    fn test_array_of_tables_stays_in_open_section() {
        let text = "[a]\nx = 1\n[[a.items]]\nname = \"one\"\n";
        let map = parse(text);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("a").unwrap().body(),
            "[a]\nx = 1\n[[a.items]]\nname = \"one\""
        );
    }

    #[test]
    fn test_repeated_header_concatenates_bodies() {
        let text = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n";
        let map = parse(text);

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().body(), "[a]\nx = 1\n[a]\nz = 3");
        assert_eq!(map.get("b").unwrap().body(), "[b]\ny = 2");
    }
}
