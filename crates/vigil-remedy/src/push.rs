//! Remediation branch push over git subprocesses.

use vigil_core::{PushConfig, VigilError};
use vigil_scan::runner;

const COMMIT_MESSAGE: &str = "fix: apply terraform and checkov fixes";

/// Commits pending changes to the fixed remediation branch and pushes it.
///
/// "Nothing to commit" is a success outcome — the branch is pushed anyway
/// so earlier remediation commits still reach the remote. No conflict
/// resolution is attempted if the remote branch has divergent history.
///
/// # Examples
///
/// ```
/// use vigil_core::PushConfig;
/// use vigil_remedy::push::BranchPusher;
///
/// let pusher = BranchPusher::new(&PushConfig::default());
/// ```
pub struct BranchPusher {
    config: PushConfig,
}

impl BranchPusher {
    /// Create a pusher from the push configuration.
    pub fn new(config: &PushConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Stage, commit, and push the remediation branch.
    ///
    /// Returns a human-readable success message. The credential is
    /// substituted into the push URL only for the subprocess invocation
    /// and never appears in the returned message.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Launch`] if git cannot be started, or
    /// [`VigilError::Push`] if any git step fails for a reason other than
    /// an empty commit.
    pub fn push(&self) -> Result<String, VigilError> {
        let dir = &self.config.repo_dir;
        let branch = &self.config.branch;

        let checkout = runner::run("git", &["checkout", "-B", branch.as_str()], dir)?;
        if !checkout.success() {
            return Err(VigilError::Push(format!(
                "checkout -B {branch}: {}",
                checkout.stderr.trim()
            )));
        }

        let add = runner::run("git", &["add", "-A"], dir)?;
        if !add.success() {
            return Err(VigilError::Push(format!("git add: {}", add.stderr.trim())));
        }

        let name = format!("user.name={}", self.config.bot_name);
        let email = format!("user.email={}", self.config.bot_email);
        let commit = runner::run(
            "git",
            &[
                "-c",
                name.as_str(),
                "-c",
                email.as_str(),
                "commit",
                "-m",
                COMMIT_MESSAGE,
            ],
            dir,
        )?;
        let nothing_to_commit = !commit.success()
            && (commit.stdout.contains("nothing to commit")
                || commit.stdout.contains("nothing added to commit"));
        if !commit.success() && !nothing_to_commit {
            return Err(VigilError::Push(format!(
                "git commit: {}",
                if commit.stderr.trim().is_empty() {
                    commit.stdout.trim()
                } else {
                    commit.stderr.trim()
                }
            )));
        }

        let (destination, shown) = match &self.config.remote_url {
            Some(url) => {
                let token = self.config.token.as_deref().unwrap_or_default();
                (url.replace("{token}", token), "configured remote URL".to_string())
            }
            None => (self.config.remote.clone(), self.config.remote.clone()),
        };

        let pushed = runner::run("git", &["push", destination.as_str(), branch.as_str()], dir)?;
        if !pushed.success() {
            return Err(VigilError::Push(format!(
                "git push {branch}: {}",
                pushed.stderr.trim()
            )));
        }

        Ok(if nothing_to_commit {
            format!("nothing to commit; pushed {branch} to {shown}")
        } else {
            format!("pushed {branch} to {shown}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn git(dir: &Path, args: &[&str]) {
        let out = runner::run("git", args, dir).unwrap();
        assert!(out.success(), "git {args:?} failed: {}", out.stderr);
    }

    /// A work repo with one file and a bare remote it can push to.
    fn setup() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let remote = dir.path().join("remote.git");
        let work = dir.path().join("work");
        std::fs::create_dir_all(&work).unwrap();
        git(dir.path(), &["init", "--bare", "remote.git"]);
        git(&work, &["init"]);
        std::fs::write(work.join("main.tf"), "resource \"aws_s3_bucket\" \"b\" {}\n").unwrap();
        (dir, work, remote)
    }

    fn pusher_for(work: &Path, remote: &Path) -> BranchPusher {
        BranchPusher::new(&PushConfig {
            repo_dir: work.to_path_buf(),
            remote_url: Some(remote.display().to_string()),
            ..PushConfig::default()
        })
    }

    #[test]
    fn pushes_fix_branch_to_remote() {
        let (dir, work, remote) = setup();
        let message = pusher_for(&work, &remote).push().unwrap();
        assert!(message.contains("pushed fix/checkov-patch"));

        let remote_path = remote.display().to_string();
        let check = runner::run(
            "git",
            &[
                "--git-dir",
                remote_path.as_str(),
                "rev-parse",
                "--verify",
                "fix/checkov-patch",
            ],
            dir.path(),
        )
        .unwrap();
        assert!(check.success(), "branch missing on remote: {}", check.stderr);
    }

    #[test]
    fn nothing_to_commit_is_success() {
        let (_dir, work, remote) = setup();
        let pusher = pusher_for(&work, &remote);
        pusher.push().unwrap();

        // No new changes: the second push still succeeds.
        let message = pusher.push().unwrap();
        assert!(message.contains("nothing to commit"), "got: {message}");
    }

    #[test]
    fn unreachable_remote_is_push_failure() {
        let (dir, work, _remote) = setup();
        let bad = dir.path().join("no-such-remote.git");
        let err = pusher_for(&work, &bad).push().unwrap_err();
        assert!(matches!(err, VigilError::Push(_)));
    }

    #[test]
    fn message_never_contains_the_token() {
        let (_dir, work, remote) = setup();
        let pusher = BranchPusher::new(&PushConfig {
            repo_dir: work.clone(),
            remote_url: Some(remote.display().to_string()),
            token: Some("sekrit-token".into()),
            ..PushConfig::default()
        });
        let message = pusher.push().unwrap();
        assert!(!message.contains("sekrit-token"));
    }
}
