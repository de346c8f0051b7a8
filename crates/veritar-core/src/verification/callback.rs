//! Observer hooks for a verification run.

use super::finding::Finding;
use crate::archive::Member;

/// Receives every finding as soon as it is classified.
///
/// The trait requires `Send` to allow use in multi-threaded contexts.
///
/// # Examples
///
/// ```
/// use veritar_core::verification::Finding;
/// use veritar_core::verification::OutcomeCallback;
///
/// struct PrintFindings;
///
/// impl OutcomeCallback for PrintFindings {
///     fn on_finding(&mut self, finding: &Finding) {
///         println!("{finding}");
///     }
/// }
/// ```
pub trait OutcomeCallback: Send {
    /// Called when a member header has been read, before its content.
    fn on_member(&mut self, _member: &Member) {}

    /// Called once per finding, in archive order, remnants last.
    fn on_finding(&mut self, finding: &Finding);
}

/// No-op implementation of `OutcomeCallback`.
#[derive(Debug, Default)]
pub struct NoopCallback;

impl OutcomeCallback for NoopCallback {
    fn on_finding(&mut self, _finding: &Finding) {}
}

/// Callback that keeps every finding in order.
#[derive(Debug, Default)]
pub struct FindingLog {
    /// Findings received so far.
    pub findings: Vec<Finding>,
}

impl FindingLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutcomeCallback for FindingLog {
    fn on_finding(&mut self, finding: &Finding) {
        self.findings.push(finding.clone());
    }
}
