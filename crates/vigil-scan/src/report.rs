//! Checkov JSON report parsing.

use serde_json::Value;
use vigil_core::{Finding, ScanReport, VigilError};

/// Parse the scanner's raw JSON output into a [`ScanReport`].
///
/// Checkov emits either a single document or, when several frameworks ran,
/// an array of documents; `results.failed_checks` entries from each are
/// concatenated in emission order. A document without a
/// `results.failed_checks` section contributes zero findings — scanners may
/// emit partial documents on non-fatal warnings, and that is not an error.
///
/// # Errors
///
/// Returns [`VigilError::MalformedReport`] if `raw` is not well-formed JSON
/// or the findings section does not have the expected shape. Callers must
/// treat this as an inconclusive scan, never as "zero findings".
///
/// # Examples
///
/// ```
/// use vigil_scan::report::parse_report;
///
/// let report = parse_report(r#"{"results": {"failed_checks": []}}"#).unwrap();
/// assert!(report.is_clean());
///
/// assert!(parse_report("not json").is_err());
/// ```
pub fn parse_report(raw: &str) -> Result<ScanReport, VigilError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| VigilError::MalformedReport(e.to_string()))?;

    let mut findings = Vec::new();
    match &value {
        Value::Array(docs) => {
            for doc in docs {
                collect_failed_checks(doc, &mut findings)?;
            }
        }
        doc => collect_failed_checks(doc, &mut findings)?,
    }

    Ok(ScanReport {
        findings,
        raw: value,
    })
}

fn collect_failed_checks(doc: &Value, out: &mut Vec<Finding>) -> Result<(), VigilError> {
    let Some(checks) = doc.get("results").and_then(|r| r.get("failed_checks")) else {
        return Ok(());
    };
    let parsed: Vec<Finding> = serde_json::from_value(checks.clone())
        .map_err(|e| VigilError::MalformedReport(format!("failed_checks: {e}")))?;
    out.extend(parsed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(id: &str) -> String {
        format!(
            r#"{{"check_id": "{id}", "check_name": "name {id}", "resource": "aws_s3_bucket.b",
                "file_path": "/main.tf", "code_block": [[1, "resource {{"], [2, "}}"]]}}"#
        )
    }

    #[test]
    fn findings_length_and_order_match_failed_checks() {
        let raw = format!(
            r#"{{"results": {{"failed_checks": [{}, {}, {}]}}}}"#,
            check("CKV_AWS_1"),
            check("CKV_AWS_2"),
            check("CKV_AWS_3"),
        );
        let report = parse_report(&raw).unwrap();
        assert_eq!(report.findings.len(), 3);
        let ids: Vec<&str> = report.findings.iter().map(|f| f.check_id.as_str()).collect();
        assert_eq!(ids, vec!["CKV_AWS_1", "CKV_AWS_2", "CKV_AWS_3"]);
    }

    #[test]
    fn duplicate_check_ids_are_kept() {
        let raw = format!(
            r#"{{"results": {{"failed_checks": [{}, {}]}}}}"#,
            check("CKV_AWS_20"),
            check("CKV_AWS_20"),
        );
        let report = parse_report(&raw).unwrap();
        assert_eq!(report.findings.len(), 2);
    }

    #[test]
    fn empty_failed_checks_parses_clean() {
        let report = parse_report(r#"{"results": {"failed_checks": []}}"#).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn missing_results_section_is_zero_findings() {
        let report = parse_report(r#"{"summary": {"passed": 12}}"#).unwrap();
        assert!(report.is_clean());
        // The raw payload is still retained.
        assert_eq!(report.raw["summary"]["passed"], 12);
    }

    #[test]
    fn missing_failed_checks_is_zero_findings() {
        let report = parse_report(r#"{"results": {"passed_checks": []}}"#).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn array_of_documents_concatenates_in_order() {
        let raw = format!(
            r#"[{{"results": {{"failed_checks": [{}]}}}},
                {{"results": {{"failed_checks": [{}, {}]}}}}]"#,
            check("CKV_AWS_1"),
            check("CKV_AWS_2"),
            check("CKV_AWS_3"),
        );
        let report = parse_report(&raw).unwrap();
        let ids: Vec<&str> = report.findings.iter().map(|f| f.check_id.as_str()).collect();
        assert_eq!(ids, vec!["CKV_AWS_1", "CKV_AWS_2", "CKV_AWS_3"]);
    }

    #[test]
    fn invalid_json_is_malformed_report() {
        let err = parse_report("{not valid").unwrap_err();
        assert!(matches!(err, VigilError::MalformedReport(_)));
    }

    #[test]
    fn empty_input_is_malformed_report() {
        let err = parse_report("").unwrap_err();
        assert!(matches!(err, VigilError::MalformedReport(_)));
    }

    #[test]
    fn wrong_failed_checks_shape_is_malformed_report() {
        let err = parse_report(r#"{"results": {"failed_checks": "oops"}}"#).unwrap_err();
        assert!(matches!(err, VigilError::MalformedReport(_)));
    }

    #[test]
    fn code_block_text_is_verbatim() {
        let raw = r#"{"results": {"failed_checks": [{
            "check_id": "CKV_AWS_18",
            "check_name": "logging",
            "resource": "aws_s3_bucket.b",
            "file_path": "/main.tf",
            "code_block": [[5, "  acl    = \"public-read\"  "], [6, "\t}"]]
        }]}}"#;
        let report = parse_report(raw).unwrap();
        let finding = &report.findings[0];
        assert_eq!(finding.code_block[0].1, "  acl    = \"public-read\"  ");
        assert_eq!(finding.snippet(), "  acl    = \"public-read\"  \n\t}");
    }
}
