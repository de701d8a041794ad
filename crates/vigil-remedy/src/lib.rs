//! Remediation advisory and orchestration for Vigil.
//!
//! Provides the LLM client, prompt construction, the conversational
//! remediation advisor, the branch pusher, and the top-level
//! Scan–Advise–Verify orchestrator.

pub mod advisor;
pub mod conversation;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod push;
