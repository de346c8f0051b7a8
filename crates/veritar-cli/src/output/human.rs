//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use veritar_core::creation::CreationReport;
use veritar_core::verification::Finding;
use veritar_core::verification::Outcome;
use veritar_core::verification::Statistics;
use veritar_core::verification::Verdict;
use veritar_core::verification::VerificationReport;

/// Width of the outcome tag column.
const TAG_WIDTH: usize = 10;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    stdout: Term,
    stderr: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result
    }

    /// Classification line without styling: padded tag, subject, reason.
    fn finding_line(finding: &Finding) -> String {
        let tag = match finding.outcome() {
            Outcome::Good => "OK",
            Outcome::Skipped => "SKIPPED",
            Outcome::Missing => "MISSING",
            Outcome::Corrupted => "CORRUPT",
        };
        let mut line = format!("{tag:<TAG_WIDTH$}{}", finding.subject());
        if let Some(reason) = finding.reason() {
            line.push_str(&format!(" ({reason})"));
        }
        line
    }

    fn styled_finding_line(&self, finding: &Finding) -> String {
        let line = Self::finding_line(finding);
        if !self.use_colors {
            return line;
        }
        let (tag, rest) = line.split_at(TAG_WIDTH.min(line.len()));
        let tag = match finding.outcome() {
            Outcome::Good => style(tag).green(),
            Outcome::Skipped | Outcome::Missing => style(tag).yellow(),
            Outcome::Corrupted => style(tag).red().bold(),
        };
        format!("{tag}{rest}")
    }

    /// Box-drawn table of the five counters.
    fn summary_table(statistics: &Statistics) -> Vec<String> {
        let rows = [
            ("Processed", statistics.processed),
            ("Verified", statistics.good),
            ("Skipped", statistics.skipped),
            ("Failed", statistics.corrupted),
            ("Missing", statistics.missing),
        ];
        let values: Vec<String> = rows.iter().map(|(_, n)| Self::format_number(*n)).collect();
        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = values.iter().map(String::len).max().unwrap_or(0);

        let rule = |left: &str, middle: &str, right: &str| {
            format!(
                "{left}{}{middle}{}{right}",
                "─".repeat(label_width + 2),
                "─".repeat(value_width + 2)
            )
        };

        let mut lines = vec![rule("┌", "┬", "┐")];
        for ((label, _), value) in rows.iter().zip(&values) {
            lines.push(format!(
                "│ {label:<label_width$} │ {value:>value_width$} │"
            ));
        }
        lines.push(rule("└", "┴", "┘"));
        lines
    }

    fn styled_verdict(&self, verdict: Verdict) -> String {
        if !self.use_colors {
            return verdict.to_string();
        }
        match verdict {
            Verdict::Success => style(verdict).green().bold().to_string(),
            Verdict::MissingChecksums => style(verdict).yellow().bold().to_string(),
            Verdict::Failed => style(verdict).red().bold().to_string(),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_finding(&self, finding: &Finding, show_warnings: bool) {
        let visible = match finding.outcome() {
            Outcome::Good => self.verbose,
            Outcome::Skipped | Outcome::Missing => show_warnings && !self.quiet,
            Outcome::Corrupted => true,
        };
        if !visible {
            return;
        }

        let line = self.styled_finding_line(finding);
        let term = match finding.outcome() {
            Outcome::Good => &self.stdout,
            _ => &self.stderr,
        };
        let _ = term.write_line(&line);
    }

    fn format_verification_result(
        &self,
        _archive: &Path,
        report: &VerificationReport,
        _findings: &[Finding],
    ) -> Result<()> {
        // The summary is printed even in quiet mode.
        for line in Self::summary_table(&report.statistics) {
            let _ = self.stdout.write_line(&line);
        }
        let _ = self
            .stdout
            .write_line(&format!("Verdict: {}", self.styled_verdict(report.verdict)));
        let _ = self.stdout.write_line(&format!(
            "Elapsed: {:.2}s",
            report.duration.as_secs_f64()
        ));

        if self.verbose {
            if let Some(codec) = report.codec {
                let _ = self
                    .stdout
                    .write_line(&format!("Compression: {}", codec.name()));
            }
            let _ = self.stdout.write_line(&format!(
                "Archive data read: {}",
                Self::format_size(report.bytes_read)
            ));
        }

        Ok(())
    }

    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.stdout.write_line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                output_path.display()
            ));
        } else {
            let _ = self
                .stdout
                .write_line(&format!("Archive created: {}", output_path.display()));
        }

        let _ = self.stdout.write_line("");
        let _ = self.stdout.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.stdout.write_line(&format!(
            "  Directories:      {}",
            Self::format_number(report.directories_added)
        ));
        if report.symlinks_added > 0 {
            let _ = self.stdout.write_line(&format!(
                "  Symlinks:         {}",
                Self::format_number(report.symlinks_added)
            ));
        }
        let _ = self.stdout.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));

        if let Some(codec) = report.codec {
            let _ = self.stdout.write_line(&format!(
                "  Compressed size:  {} ({}, ratio {:.2})",
                Self::format_size(report.bytes_compressed),
                codec.name(),
                report.compression_ratio()
            ));
        }
        let _ = self.stdout.write_line(&format!(
            "  Checksum file:    {} ({} entries)",
            report.manifest_path.display(),
            Self::format_number(report.manifest_entries)
        ));

        if self.verbose {
            let _ = self
                .stdout
                .write_line(&format!("  Duration:         {:.2}s", report.duration.as_secs_f64()));
        }

        if report.has_warnings() {
            if self.use_colors {
                let _ = self
                    .stderr
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.stderr.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.stderr.write_line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .stderr
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.stderr.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
