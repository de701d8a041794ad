use vigil_core::Finding;

const SYSTEM_PROMPT: &str = "You are a DevSecOps assistant. Help with Terraform, \
Checkov, AWS security best practices, and GitHub pull requests.";

/// The system prompt seeding every advisory session.
///
/// # Examples
///
/// ```
/// use vigil_remedy::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("DevSecOps"));
/// ```
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the advisory prompt for one finding.
///
/// Deterministic: the same finding always produces byte-identical prompt
/// text, so a retry after a failed call re-sends exactly the same content.
/// The code block is reproduced verbatim (line text only, file order).
///
/// # Examples
///
/// ```
/// use vigil_core::Finding;
/// use vigil_remedy::prompt::build_finding_prompt;
///
/// let finding = Finding {
///     check_id: "CKV_AWS_20".into(),
///     check_name: "S3 Bucket has an ACL defined which allows public READ access".into(),
///     resource: "aws_s3_bucket.data".into(),
///     file_path: "/main.tf".into(),
///     code_block: vec![(8, "  acl = \"public-read\"".into())],
/// };
/// let prompt = build_finding_prompt(&finding);
/// assert!(prompt.contains("CKV_AWS_20"));
/// assert!(prompt.contains("  acl = \"public-read\""));
/// ```
pub fn build_finding_prompt(finding: &Finding) -> String {
    format!(
        "Checkov found a vulnerability:\n\n\
         * Check Name: {check_name} ({check_id})\n\
         * Resource: {resource}\n\
         * File: {file_path}\n\n\
         Code Block:\n\n\
         {code_block}\n\n\
         Suggest a fix using best practices.\n",
        check_name = finding.check_name,
        check_id = finding.check_id,
        resource = finding.resource,
        file_path = finding.file_path,
        code_block = finding.snippet(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_finding() -> Finding {
        Finding {
            check_id: "CKV_AWS_18".into(),
            check_name: "Ensure the S3 bucket has access logging enabled".into(),
            resource: "aws_s3_bucket.logs".into(),
            file_path: "/s3.tf".into(),
            code_block: vec![
                (3, "resource \"aws_s3_bucket\" \"logs\" {".into()),
                (4, "  bucket = \"logs\"".into()),
                (5, "}".into()),
            ],
        }
    }

    #[test]
    fn prompt_includes_all_finding_fields() {
        let prompt = build_finding_prompt(&sample_finding());
        assert!(prompt.contains("CKV_AWS_18"));
        assert!(prompt.contains("Ensure the S3 bucket has access logging enabled"));
        assert!(prompt.contains("aws_s3_bucket.logs"));
        assert!(prompt.contains("/s3.tf"));
        assert!(prompt.contains("resource \"aws_s3_bucket\" \"logs\" {\n  bucket = \"logs\"\n}"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let finding = sample_finding();
        assert_eq!(build_finding_prompt(&finding), build_finding_prompt(&finding));
    }

    #[test]
    fn prompt_omits_line_numbers() {
        let prompt = build_finding_prompt(&sample_finding());
        // The joined code block carries text only; "3," style prefixes from
        // the (line, text) pairs must not leak in.
        assert!(!prompt.contains("(3,"));
        assert!(prompt.contains("Code Block:\n\nresource"));
    }

    #[test]
    fn system_prompt_sets_the_domain() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("Terraform"));
        assert!(prompt.contains("Checkov"));
    }
}
