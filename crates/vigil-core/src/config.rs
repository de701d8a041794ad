use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::VigilError;

/// Top-level configuration loaded from `.vigil.toml`.
///
/// Built once at process start and passed by reference to the components
/// that need it: the advisor needs the model credential, the pusher needs
/// the remote credential, the tool runner needs nothing.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilConfig;
///
/// let config = VigilConfig::default();
/// assert_eq!(config.scan.max_advisories, 3);
/// assert_eq!(config.push.branch, "fix/checkov-patch");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Scanner invocation settings.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Remediation branch-push settings.
    #[serde(default)]
    pub push: PushConfig,
}

impl VigilConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Io`] if the file cannot be read, or
    /// [`VigilError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, VigilError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::VigilConfig;
    ///
    /// let toml = r#"
    /// [scan]
    /// max_advisories = 5
    /// "#;
    /// let config = VigilConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.scan.max_advisories, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, VigilError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// LLM provider configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4o");
/// assert_eq!(config.temperature, 0.7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"openai"`, `"ollama"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens in the completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Scanner invocation configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::ScanConfig;
/// use std::path::PathBuf;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.report_path, PathBuf::from("report.json"));
/// assert!(config.command.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory containing the infrastructure code to scan.
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
    /// Fixed path of the report artifact, overwritten on every scan.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// Checkov container image used by the default docker invocation.
    #[serde(default = "default_image")]
    pub image: String,
    /// Full scanner command override (program + args). When set, it is run
    /// as-is with stdout captured to the report artifact.
    pub command: Option<Vec<String>>,
    /// Maximum findings to advise on per scan, in emission order.
    #[serde(default = "default_max_advisories")]
    pub max_advisories: usize,
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("report.json")
}

fn default_image() -> String {
    "bridgecrew/checkov:latest".into()
}

fn default_max_advisories() -> usize {
    3
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target_dir: default_target_dir(),
            report_path: default_report_path(),
            image: default_image(),
            command: None,
            max_advisories: default_max_advisories(),
        }
    }
}

/// Remediation branch-push configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::PushConfig;
///
/// let config = PushConfig::default();
/// assert_eq!(config.remote, "origin");
/// assert_eq!(config.bot_name, "vigil-bot");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Repository the fix branch is created in.
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,
    /// Fixed branch name for remediation commits.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Remote name to push to when no explicit URL is configured.
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Explicit push URL; `{token}` is substituted with the credential.
    pub remote_url: Option<String>,
    /// Remote credential. Falls back to `GITHUB_TOKEN` in the binary.
    pub token: Option<String>,
    /// Committer name for remediation commits.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Committer email for remediation commits.
    #[serde(default = "default_bot_email")]
    pub bot_email: String,
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_branch() -> String {
    "fix/checkov-patch".into()
}

fn default_remote() -> String {
    "origin".into()
}

fn default_bot_name() -> String {
    "vigil-bot".into()
}

fn default_bot_email() -> String {
    "bot@example.com".into()
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            repo_dir: default_repo_dir(),
            branch: default_branch(),
            remote: default_remote(),
            remote_url: None,
            token: None,
            bot_name: default_bot_name(),
            bot_email: default_bot_email(),
        }
    }
}
