use chrono::Utc;
use serde::Serialize;
use vigil_core::{
    PushOutcome, RemediationCycleResult, ScanReport, Verdict, VigilConfig, VigilError,
};
use vigil_scan::checkov::CheckovScanner;

use crate::advisor::{Advisory, RemediationAdvisor};
use crate::llm::ChatBackend;
use crate::push::BranchPusher;

/// Outcome of one scan-plus-advise pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    /// Total failed checks the scanner reported.
    pub total_findings: usize,
    /// Advisories produced for the top findings, in emission order.
    pub advisories: Vec<Advisory>,
}

/// Top-level Scan–Advise–Verify orchestrator.
///
/// Drives one step at a time, synchronously blocking on each external
/// invocation: run the scanner, parse the report artifact, advise on the
/// top findings, and — on an explicit remediation request — push the fix
/// branch and re-scan to verify resolution. A failure in one cycle is not
/// process-fatal; the caller may issue a fresh command.
pub struct RemediationOrchestrator<B: ChatBackend> {
    scanner: CheckovScanner,
    advisor: RemediationAdvisor<B>,
    pusher: BranchPusher,
    max_advisories: usize,
}

impl<B: ChatBackend> RemediationOrchestrator<B> {
    /// Build an orchestrator from the configuration and a chat backend.
    pub fn new(config: &VigilConfig, backend: B) -> Self {
        Self {
            scanner: CheckovScanner::new(&config.scan),
            advisor: RemediationAdvisor::new(backend),
            pusher: BranchPusher::new(&config.push),
            max_advisories: config.scan.max_advisories,
        }
    }

    /// Run the scanner and parse the report artifact.
    ///
    /// Parsing is always attempted, even when the scanner exited non-zero —
    /// Checkov exits non-zero whenever checks fail.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Launch`] if the scanner cannot be started and
    /// [`VigilError::MalformedReport`] if the artifact is missing or
    /// unparsable. Both fail this cycle only, not the process.
    pub fn scan(&self) -> Result<ScanReport, VigilError> {
        self.scanner.scan()?;
        self.scanner.load_report()
    }

    /// Advise on the top findings of a report, in emission order.
    ///
    /// Each advisory is handed to `emit` as soon as it is produced, so the
    /// caller can stream suggestions instead of waiting for the batch. A
    /// failed advisory is emitted like any other and never aborts the
    /// remaining findings.
    ///
    /// Selection is by report emission order, not severity — a deliberate
    /// simplicity trade-off, and Checkov's JSON carries no severity field
    /// to rank on anyway.
    pub async fn advise(
        &mut self,
        report: &ScanReport,
        mut emit: impl FnMut(&Advisory),
    ) -> ScanSummary {
        let mut advisories = Vec::new();
        for finding in report.findings.iter().take(self.max_advisories) {
            let advisory = self.advisor.suggest_fix(finding).await;
            emit(&advisory);
            advisories.push(advisory);
        }
        ScanSummary {
            total_findings: report.findings.len(),
            advisories,
        }
    }

    /// Scan, then advise on the top findings.
    ///
    /// # Errors
    ///
    /// Propagates scan errors; see [`Self::scan`].
    pub async fn scan_and_advise(
        &mut self,
        emit: impl FnMut(&Advisory),
    ) -> Result<ScanSummary, VigilError> {
        let report = self.scan()?;
        Ok(self.advise(&report, emit).await)
    }

    /// Run one push-plus-verify remediation cycle.
    ///
    /// The push outcome never blocks reverification: even after a rejected
    /// push the scanner runs again so the caller sees current state. The
    /// verdict is `Resolved` when the post-fix report is clean,
    /// `Unresolved` when findings remain, and `Inconclusive` when the
    /// reverify artifact cannot be parsed — surfaced distinctly, never
    /// silently treated as resolved.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Launch`] if the reverify scanner cannot be
    /// started at all.
    pub async fn remediation_cycle(&mut self) -> Result<RemediationCycleResult, VigilError> {
        let push = match self.pusher.push() {
            Ok(message) => PushOutcome {
                success: true,
                message,
            },
            Err(e) => PushOutcome {
                success: false,
                message: e.to_string(),
            },
        };

        self.scanner.scan()?;
        let (verdict, remaining) = match self.scanner.load_report() {
            Ok(report) if report.is_clean() => (Verdict::Resolved, 0),
            Ok(report) => (Verdict::Unresolved, report.findings.len()),
            Err(_) => (Verdict::Inconclusive, 0),
        };

        Ok(RemediationCycleResult {
            push,
            verdict,
            remaining,
            completed_at: Utc::now(),
        })
    }

    /// Free-text chat on the advisory conversation, outside the finding
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Advisory`] on backend failure; the
    /// conversation is left unmodified.
    pub async fn chat(&mut self, text: &str) -> Result<String, VigilError> {
        self.advisor.chat(text).await
    }

    /// The advisor owning this session's conversation.
    pub fn advisor(&self) -> &RemediationAdvisor<B> {
        &self.advisor
    }
}
