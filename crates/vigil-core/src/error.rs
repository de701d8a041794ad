/// Errors that can occur across the Vigil workflow.
///
/// Each variant wraps a specific failure domain. Library crates use this
/// type directly; the binary crate converts to `miette::Report` at the
/// boundary.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilError;
///
/// let err = VigilError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An external binary could not be started at all.
    ///
    /// Distinct from the binary running and exiting non-zero, which is not
    /// an error — callers interpret the exit code themselves.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        /// The program that could not be spawned.
        command: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The scanner's report artifact is missing or not well-formed JSON.
    ///
    /// Recoverable: the scan is inconclusive, not "zero findings".
    #[error("malformed scan report: {0}")]
    MalformedReport(String),

    /// The language-model call failed (network, HTTP status, response body).
    #[error("advisory failed: {0}")]
    Advisory(String),

    /// The remote push was rejected or errored.
    #[error("push failed: {0}")]
    Push(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
