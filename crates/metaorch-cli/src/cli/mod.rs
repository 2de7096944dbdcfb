//! CLI module for the merge and audit tools
//!
//! Argument parsing lives in `commands`, report rendering in `output`.

pub mod commands;
pub mod output;

pub use commands::{AuditCli, MergeCli};
pub use output::{AuditOutput, OutputFormat};

use metaorch_core::{AuditReport, MetaorchError};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, audit passed
    Success = 0,
    /// Audit reported at least one error
    AuditFailed = 1,
    /// Invalid input, e.g. a fragment with nothing to merge
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from an audit report
    pub fn from_report(report: &AuditReport) -> Self {
        if report.passed() {
            ExitCode::Success
        } else {
            ExitCode::AuditFailed
        }
    }

    /// Determine exit code for an error that aborted a command
    pub fn from_error(err: &MetaorchError) -> Self {
        match err {
            MetaorchError::FileError(_) => ExitCode::FileError,
            MetaorchError::InvalidInput(_) => ExitCode::InvalidInput,
            MetaorchError::SerializationError(_) => ExitCode::InternalError,
        }
    }
}

/// Initialize logging on stderr.
///
/// `RUST_LOG` directives apply on top of the level implied by `verbose`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
