//! Terraform formatting and validation wrappers.
//!
//! Single subprocess calls with no branching beyond success/failure; the
//! exit code picks the message, stdout carries the detail.

use std::path::Path;

use vigil_core::VigilError;

use crate::runner::{self, ToolOutput};

/// Check formatting with `terraform fmt -check -recursive`.
///
/// # Errors
///
/// Returns [`VigilError::Launch`] if terraform cannot be started.
pub fn check_fmt(dir: &Path) -> Result<String, VigilError> {
    let output = runner::run("terraform", &["fmt", "-check", "-recursive"], dir)?;
    Ok(check_fmt_message(&output))
}

/// Rewrite files in place with `terraform fmt -recursive`.
///
/// # Errors
///
/// Returns [`VigilError::Launch`] if terraform cannot be started.
pub fn auto_fmt(dir: &Path) -> Result<String, VigilError> {
    let output = runner::run("terraform", &["fmt", "-recursive"], dir)?;
    Ok(auto_fmt_message(&output))
}

/// Validate the configuration with `terraform validate`.
///
/// Runs a backend-less `terraform init` first so validation works in a
/// fresh checkout; the init result itself is not reported.
///
/// # Errors
///
/// Returns [`VigilError::Launch`] if terraform cannot be started.
pub fn validate(dir: &Path) -> Result<String, VigilError> {
    runner::run("terraform", &["init", "-input=false", "-backend=false"], dir)?;
    let output = runner::run("terraform", &["validate"], dir)?;
    Ok(validate_message(&output))
}

fn check_fmt_message(output: &ToolOutput) -> String {
    if output.success() {
        "All Terraform files are correctly formatted.".into()
    } else {
        format!("Formatting issues:\n{}", output.stdout.trim())
    }
}

fn auto_fmt_message(output: &ToolOutput) -> String {
    let changed = output.stdout.trim();
    if changed.is_empty() {
        "Auto-format complete. No changes.".into()
    } else {
        changed.to_string()
    }
}

fn validate_message(output: &ToolOutput) -> String {
    if output.success() {
        "Terraform configuration is valid.".into()
    } else {
        format!("Validation failed:\n{}", output.stdout.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(exit_code: i32, stdout: &str) -> ToolOutput {
        ToolOutput {
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[test]
    fn check_fmt_reports_clean_and_dirty() {
        assert_eq!(
            check_fmt_message(&out(0, "")),
            "All Terraform files are correctly formatted."
        );
        let msg = check_fmt_message(&out(3, "main.tf\n"));
        assert_eq!(msg, "Formatting issues:\nmain.tf");
    }

    #[test]
    fn auto_fmt_lists_changed_files_or_no_changes() {
        assert_eq!(
            auto_fmt_message(&out(0, "\n")),
            "Auto-format complete. No changes."
        );
        assert_eq!(auto_fmt_message(&out(0, "main.tf\n")), "main.tf");
    }

    #[test]
    fn validate_reports_valid_and_invalid() {
        assert_eq!(
            validate_message(&out(0, "Success!")),
            "Terraform configuration is valid."
        );
        let msg = validate_message(&out(1, "Error: missing block\n"));
        assert!(msg.starts_with("Validation failed:"));
        assert!(msg.contains("missing block"));
    }
}
