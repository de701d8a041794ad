use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scanner-reported policy violation.
///
/// Parsed from a Checkov `failed_checks` entry. Immutable once parsed; the
/// same `check_id` can legitimately appear multiple times in one report when
/// a rule fails on several resources.
///
/// # Examples
///
/// ```
/// use vigil_core::Finding;
///
/// let finding = Finding {
///     check_id: "CKV_AWS_18".into(),
///     check_name: "Ensure the S3 bucket has access logging enabled".into(),
///     resource: "aws_s3_bucket.logs".into(),
///     file_path: "/main.tf".into(),
///     code_block: vec![(12, "resource \"aws_s3_bucket\" \"logs\" {".into())],
/// };
/// assert_eq!(finding.check_id, "CKV_AWS_18");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Stable identifier of the violated rule (e.g. `CKV_AWS_18`).
    #[serde(default)]
    pub check_id: String,
    /// Human-readable rule description.
    #[serde(default)]
    pub check_name: String,
    /// Infrastructure resource the violation applies to.
    #[serde(default)]
    pub resource: String,
    /// Source file containing the violation.
    #[serde(default)]
    pub file_path: String,
    /// Offending snippet as `(line_number, line_text)` pairs, in file order.
    #[serde(default)]
    pub code_block: Vec<(u64, String)>,
}

impl Finding {
    /// Reconstruct the offending code block as a single string.
    ///
    /// Joins line texts with newlines, in original order, preserving
    /// embedded whitespace verbatim. Line numbers are informational and not
    /// included.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::Finding;
    ///
    /// let finding = Finding {
    ///     check_id: "CKV_AWS_20".into(),
    ///     check_name: "bucket ACL".into(),
    ///     resource: "aws_s3_bucket.b".into(),
    ///     file_path: "/main.tf".into(),
    ///     code_block: vec![
    ///         (1, "resource \"aws_s3_bucket\" \"b\" {".into()),
    ///         (2, "  acl = \"public-read\"".into()),
    ///     ],
    /// };
    /// assert_eq!(
    ///     finding.snippet(),
    ///     "resource \"aws_s3_bucket\" \"b\" {\n  acl = \"public-read\""
    /// );
    /// ```
    pub fn snippet(&self) -> String {
        self.code_block
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The outcome of one scanner invocation.
///
/// Created fresh on every scan; never mutated; superseded (not merged) by
/// the next scan. The raw document is retained for forward-compatible
/// fields the typed model does not cover.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Findings in the scanner's emission order (not sorted by severity).
    pub findings: Vec<Finding>,
    /// The original structured document.
    pub raw: serde_json::Value,
}

impl ScanReport {
    /// Returns `true` if the scan reported no failed checks.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Outcome of the branch-push step.
///
/// "Nothing to commit" is a success outcome, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushOutcome {
    /// Whether the branch reached the remote.
    pub success: bool,
    /// Human-readable result or failure message.
    pub message: String,
}

/// Verdict of a remediation cycle's reverification step.
///
/// # Examples
///
/// ```
/// use vigil_core::Verdict;
///
/// assert_eq!(serde_json::to_string(&Verdict::Resolved).unwrap(), "\"resolved\"");
/// assert_eq!(Verdict::Inconclusive.to_string(), "inconclusive");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The post-fix scan reported zero findings.
    Resolved,
    /// The post-fix scan still reported findings.
    Unresolved,
    /// The post-fix report could not be parsed; neither resolved nor
    /// unresolved.
    Inconclusive,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Resolved => write!(f, "resolved"),
            Verdict::Unresolved => write!(f, "unresolved"),
            Verdict::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// Outcome of one push-plus-verify remediation cycle.
///
/// Resolution reporting is terminal for one cycle; repeated unresolved
/// findings require a new explicit cycle.
///
/// # Examples
///
/// ```
/// use vigil_core::{PushOutcome, RemediationCycleResult, Verdict};
///
/// let result = RemediationCycleResult {
///     push: PushOutcome { success: true, message: "pushed fix/checkov-patch".into() },
///     verdict: Verdict::Resolved,
///     remaining: 0,
///     completed_at: chrono::Utc::now(),
/// };
/// assert_eq!(result.verdict, Verdict::Resolved);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationCycleResult {
    /// Outcome of the branch-push step.
    pub push: PushOutcome,
    /// Classification of the reverification scan.
    pub verdict: Verdict,
    /// Findings still present after the fix attempt (0 when resolved or
    /// inconclusive).
    pub remaining: usize,
    /// When the cycle finished.
    pub completed_at: DateTime<Utc>,
}
