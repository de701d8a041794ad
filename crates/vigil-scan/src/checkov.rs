//! Checkov scan driver.
//!
//! Runs the scanner against the target directory, captures its JSON output
//! to the fixed report artifact, and reads the artifact back for parsing.
//! The artifact is a single-writer, single-reader handoff per cycle,
//! overwritten in place on every scan.

use vigil_core::{ScanConfig, ScanReport, VigilError};

use crate::report::parse_report;
use crate::runner::{self, ToolOutput};

/// Drives one scanner invocation and the report artifact handoff.
///
/// By default Checkov runs in docker with the target directory mounted at
/// `/tf`; a `[scan] command` override in the configuration replaces the
/// whole invocation (used for native checkov installs and in tests).
///
/// # Examples
///
/// ```
/// use vigil_core::ScanConfig;
/// use vigil_scan::checkov::CheckovScanner;
///
/// let scanner = CheckovScanner::new(&ScanConfig::default());
/// ```
pub struct CheckovScanner {
    config: ScanConfig,
}

impl CheckovScanner {
    /// Create a scanner from the scan configuration.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Run the scanner and overwrite the report artifact with its stdout.
    ///
    /// The scanner's exit code is returned for the caller to interpret;
    /// Checkov exits non-zero when checks fail, which is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Launch`] if the scanner binary cannot be
    /// started, or [`VigilError::Io`] if the artifact cannot be written.
    pub fn scan(&self) -> Result<ToolOutput, VigilError> {
        let (program, args) = self.command()?;
        let output = runner::run(&program, &args, &self.config.target_dir)?;
        std::fs::write(&self.config.report_path, &output.stdout)?;
        Ok(output)
    }

    /// Read and parse the report artifact from the fixed path.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::MalformedReport`] if the artifact is missing,
    /// empty, or not well-formed — the scan is inconclusive in that case.
    pub fn load_report(&self) -> Result<ScanReport, VigilError> {
        let path = &self.config.report_path;
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VigilError::MalformedReport(format!("report artifact {}: {e}", path.display()))
        })?;
        parse_report(&raw)
    }

    fn command(&self) -> Result<(String, Vec<String>), VigilError> {
        if let Some(cmd) = &self.config.command {
            let Some((program, args)) = cmd.split_first() else {
                return Err(VigilError::Config("scan.command is empty".into()));
            };
            return Ok((program.clone(), args.to_vec()));
        }

        let target = std::fs::canonicalize(&self.config.target_dir)?;
        let args = vec![
            "run".into(),
            "--rm".into(),
            "-v".into(),
            format!("{}:/tf", target.display()),
            self.config.image.clone(),
            "-d".into(),
            "/tf".into(),
            "-o".into(),
            "json".into(),
        ];
        Ok(("docker".into(), args))
    }
}
