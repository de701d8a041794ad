//! External tool execution and scanner integration for Vigil.
//!
//! Provides the subprocess runner, the Checkov report parser, the scan
//! driver that manages the report artifact, and thin Terraform
//! fmt/validate wrappers.

pub mod checkov;
pub mod report;
pub mod runner;
pub mod terraform;
