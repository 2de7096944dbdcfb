//! Output formatting for the audit and merge tools
//!
//! The table format is the banner layout: errors on stderr, warnings and the
//! pass banner on stdout. JSON and YAML serialize the whole report to stdout.

use clap::ValueEnum;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

use metaorch_core::audit::{FAIL_BANNER, PASS_BANNER, WARN_BANNER};
use metaorch_core::{AuditReport, MergeOutcome, Result};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Banner lines with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Renders an audit report in one of the output formats
pub struct AuditOutput<'a> {
    report: &'a AuditReport,
}

impl<'a> AuditOutput<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        Self { report }
    }

    /// Render to the process's stdout and stderr
    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Table => {
                let stdout = io::stdout();
                let stderr = io::stderr();
                self.render_table(&mut stdout.lock(), &mut stderr.lock())?;
            }
            OutputFormat::Json => println!("{}", self.to_json()?),
            OutputFormat::Yaml => print!("{}", self.to_yaml()?),
        }
        Ok(())
    }

    /// Write error lines to `err` and the remaining lines to `out`
    pub fn render_table(&self, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        for line in self.report.error_lines() {
            writeln!(err, "{}", paint(&line))?;
        }
        for line in self.report.info_lines() {
            writeln!(out, "{}", paint(&line))?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.report)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self.report)?)
    }
}

/// Color a banner or finding line
fn paint(line: &str) -> String {
    match line {
        FAIL_BANNER => line.red().bold().to_string(),
        WARN_BANNER => line.yellow().bold().to_string(),
        PASS_BANNER => line.green().bold().to_string(),
        _ => {
            if let Some(rest) = line.strip_prefix("- ERROR:") {
                format!("- {}:{}", "ERROR".red(), rest)
            } else if let Some(rest) = line.strip_prefix("- WARN:") {
                format!("- {}:{}", "WARN".yellow(), rest)
            } else {
                line.to_string()
            }
        }
    }
}

/// One-line summary printed after a merge is written
pub fn merge_summary(dest: &Path, outcome: &MergeOutcome) -> String {
    let mut summary = format!(
        "Merged into {}: {} replaced, {} appended",
        dest.display(),
        outcome.replaced.len(),
        outcome.appended.len()
    );
    if outcome.duplicates_dropped > 0 {
        summary.push_str(&format!(
            ", {} duplicate occurrence(s) dropped",
            outcome.duplicates_dropped
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaorch_core::Finding;

    fn render(report: &AuditReport) -> (String, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let mut err = Vec::new();
        AuditOutput::new(report)
            .render_table(&mut out, &mut err)
            .unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_table_pass() {
        let (out, err) = render(&AuditReport::new());
        assert_eq!(out, "CONSISTENCY AUDIT: PASS\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_table_splits_streams() {
        let report = AuditReport::from_findings(vec![
            Finding::error("meta_config.json missing"),
            Finding::warning("orchestrator_state.json missing (role lock may not be enforced)"),
        ]);
        let (out, err) = render(&report);

        assert_eq!(err, "\nCONSISTENCY AUDIT: FAIL\n- ERROR: meta_config.json missing\n");
        assert_eq!(
            out,
            "\nCONSISTENCY AUDIT: WARNINGS\n- WARN: orchestrator_state.json missing (role lock may not be enforced)\n"
        );
    }

    #[test]
    fn test_structured_formats() {
        let report = AuditReport::from_findings(vec![Finding::error("essence.md missing")]);
        let output = AuditOutput::new(&report);

        let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
        assert_eq!(json["passed"], false);
        assert_eq!(json["findings"][0]["kind"], "error");
        assert_eq!(json["findings"][0]["message"], "essence.md missing");

        let yaml = output.to_yaml().unwrap();
        assert!(yaml.contains("passed: false"));
        assert!(yaml.contains("message: essence.md missing"));
    }

    #[test]
    fn test_merge_summary() {
        let outcome = MergeOutcome {
            text: String::new(),
            replaced: vec!["mcp_servers.a".into()],
            appended: vec!["profiles.b".into(), "profiles.c".into()],
            duplicates_dropped: 0,
        };
        assert_eq!(
            merge_summary(Path::new("config.toml"), &outcome),
            "Merged into config.toml: 1 replaced, 2 appended"
        );

        let outcome = MergeOutcome {
            duplicates_dropped: 2,
            ..outcome
        };
        assert!(merge_summary(Path::new("config.toml"), &outcome)
            .ends_with(", 2 duplicate occurrence(s) dropped"));
    }
}
