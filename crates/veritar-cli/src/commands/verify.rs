//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::error::EXIT_FAILED;
use crate::error::add_archive_context;
use crate::error::add_manifest_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use std::process::ExitCode;
use veritar_core::archive::ArchiveReader;
use veritar_core::manifest::ChecksumManifest;
use veritar_core::verification::Finding;
use veritar_core::verification::OutcomeCallback;
use veritar_core::verification::Verifier;

/// Forwards each finding to the formatter as it is made.
struct FindingPrinter<'a> {
    formatter: &'a dyn OutputFormatter,
    show_warnings: bool,
    findings: Option<Vec<Finding>>,
}

impl OutcomeCallback for FindingPrinter<'_> {
    fn on_finding(&mut self, finding: &Finding) {
        self.formatter.format_finding(finding, self.show_warnings);
        if let Some(findings) = &mut self.findings {
            findings.push(finding.clone());
        }
    }
}

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    // The checksum file is loaded before the archive is touched.
    let manifest = add_manifest_context(
        ChecksumManifest::from_path(&args.checksums),
        &args.checksums,
    )?;
    let reader = add_archive_context(ArchiveReader::open(&args.archive), &args.archive)?;
    tracing::debug!(entries = manifest.len(), "checksum file loaded");

    let mut printer = FindingPrinter {
        formatter,
        show_warnings: !args.no_warn,
        findings: formatter.collects_findings().then(Vec::new),
    };
    let report = Verifier::new(manifest, &mut printer).run(reader);
    let findings = printer.findings.unwrap_or_default();

    formatter.format_verification_result(&args.archive, &report, &findings)?;

    if report.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED))
    }
}
