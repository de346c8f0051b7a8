//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use veritar_core::creation::CreationReport;
use veritar_core::formats::CompressionCodec;
use veritar_core::verification::Finding;
use veritar_core::verification::VerificationReport;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct FindingOutput<'a> {
    outcome: &'static str,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl<'a> From<&'a Finding> for FindingOutput<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            outcome: finding.outcome().as_str(),
            subject: finding.subject(),
            path: finding.path(),
            reason: finding.reason(),
        }
    }
}

#[derive(Serialize)]
struct VerificationOutput<'a> {
    archive: String,
    processed: usize,
    verified: usize,
    skipped: usize,
    corrupted: usize,
    missing: usize,
    verdict: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    compression: Option<&'static str>,
    bytes_read: u64,
    duration_ms: u128,
    findings: Vec<FindingOutput<'a>>,
}

impl OutputFormatter for JsonFormatter {
    fn format_finding(&self, _finding: &Finding, _show_warnings: bool) {}

    fn collects_findings(&self) -> bool {
        true
    }

    fn format_verification_result(
        &self,
        archive: &Path,
        report: &VerificationReport,
        findings: &[Finding],
    ) -> Result<()> {
        let statistics = report.statistics;
        let data = VerificationOutput {
            archive: archive.display().to_string(),
            processed: statistics.processed,
            verified: statistics.good,
            skipped: statistics.skipped,
            corrupted: statistics.corrupted,
            missing: statistics.missing,
            verdict: report.verdict.as_str(),
            compression: report.codec.map(CompressionCodec::name),
            bytes_read: report.bytes_read,
            duration_ms: report.duration.as_millis(),
            findings: findings.iter().map(FindingOutput::from).collect(),
        };

        Self::output(&JsonOutput::success("verify", data))
    }

    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        #[derive(Serialize)]
        struct EntryOutput<'a> {
            path: &'a str,
            kind: &'static str,
            size: u64,
            #[serde(skip_serializing_if = "Option::is_none")]
            md5: Option<String>,
        }

        #[derive(Serialize)]
        struct CreationOutput<'a> {
            output_path: String,
            manifest_path: String,
            manifest_entries: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            compression: Option<&'static str>,
            files_added: usize,
            directories_added: usize,
            symlinks_added: usize,
            bytes_written: u64,
            bytes_compressed: u64,
            compression_ratio: f64,
            duration_ms: u128,
            entries: Vec<EntryOutput<'a>>,
            warnings: &'a [String],
        }

        let data = CreationOutput {
            output_path: output_path.display().to_string(),
            manifest_path: report.manifest_path.display().to_string(),
            manifest_entries: report.manifest_entries,
            compression: report.codec.map(CompressionCodec::name),
            files_added: report.files_added,
            directories_added: report.directories_added,
            symlinks_added: report.symlinks_added,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
            entries: report
                .entries
                .iter()
                .map(|entry| EntryOutput {
                    path: &entry.archive_path,
                    kind: entry.kind.label(),
                    size: entry.size,
                    md5: entry.digest.map(|digest| digest.to_hex()),
                })
                .collect(),
            warnings: &report.warnings,
        };

        Self::output(&JsonOutput::success("create", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use veritar_core::MemberKind;

    #[test]
    fn test_finding_output_shape() {
        let finding = Finding::NotRegularFile {
            path: "dir".into(),
            kind: MemberKind::Directory,
        };
        let json = serde_json::to_value(FindingOutput::from(&finding)).unwrap();
        assert_eq!(json["outcome"], "skipped");
        assert_eq!(json["path"], "dir");
        assert_eq!(json["reason"], "directory");
    }

    #[test]
    fn test_error_output_shape() {
        let output = JsonOutput::error("verify", "boom");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["operation"], "verify");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
