//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use veritar_core::creation::CreationReport;
use veritar_core::verification::Finding;
use veritar_core::verification::VerificationReport;

/// Common output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Reports one classification as soon as it is made.
    ///
    /// `show_warnings` is false when skipped and missing lines are
    /// suppressed for this run.
    fn format_finding(&self, finding: &Finding, show_warnings: bool);

    /// Whether [`OutputFormatter::format_verification_result`] needs the
    /// full list of findings.
    fn collects_findings(&self) -> bool {
        false
    }

    /// Format the verification summary
    fn format_verification_result(
        &self,
        archive: &Path,
        report: &VerificationReport,
        findings: &[Finding],
    ) -> Result<()>;

    /// Format archive creation result
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
