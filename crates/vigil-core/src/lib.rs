//! Core types, configuration, and error handling for the Vigil workflow.
//!
//! This crate provides the shared foundation used by the other Vigil crates:
//! - [`VigilError`] — unified error type using `thiserror`
//! - [`VigilConfig`] — configuration loaded from `.vigil.toml`
//! - Shared types: [`Finding`], [`ScanReport`], [`PushOutcome`],
//!   [`Verdict`], [`RemediationCycleResult`]

mod config;
mod error;
mod types;

pub use config::{LlmConfig, PushConfig, ScanConfig, VigilConfig};
pub use error::VigilError;
pub use types::{Finding, PushOutcome, RemediationCycleResult, ScanReport, Verdict};

/// A convenience `Result` type for Vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;
