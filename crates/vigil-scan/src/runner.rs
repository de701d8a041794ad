//! Subprocess execution with captured output.
//!
//! Every external tool Vigil drives — terraform, docker/checkov, git — goes
//! through [`run`], which always takes an explicit working directory and
//! never interprets a non-zero exit code as an error.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use vigil_core::VigilError;

/// Captured result of one external command invocation.
///
/// # Examples
///
/// ```
/// use vigil_scan::runner::ToolOutput;
///
/// let out = ToolOutput {
///     exit_code: 0,
///     stdout: "ok".into(),
///     stderr: String::new(),
/// };
/// assert!(out.success());
/// ```
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code (-1 if terminated by a signal).
    pub exit_code: i32,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl ToolOutput {
    /// Returns `true` if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `program` with `args` in `cwd` and capture its output.
///
/// A non-zero exit code is NOT an error — callers interpret `exit_code`
/// themselves. The only failure mode is inability to start the process
/// (missing binary, permission), surfaced as [`VigilError::Launch`] with the
/// underlying cause.
///
/// # Errors
///
/// Returns [`VigilError::Launch`] if the process cannot be spawned.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vigil_scan::runner::run;
///
/// let out = run("echo", &["hello"], Path::new(".")).unwrap();
/// assert!(out.success());
/// assert_eq!(out.stdout.trim(), "hello");
/// ```
pub fn run<S: AsRef<OsStr>>(program: &str, args: &[S], cwd: &Path) -> Result<ToolOutput, VigilError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| VigilError::Launch {
            command: program.to_string(),
            source: e,
        })?;

    Ok(ToolOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
