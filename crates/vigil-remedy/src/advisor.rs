use serde::Serialize;
use vigil_core::Finding;
use vigil_core::VigilError;

use crate::conversation::ConversationState;
use crate::llm::{ChatBackend, ChatMessage};
use crate::prompt;

/// One language-model remediation suggestion for a single finding.
///
/// # Examples
///
/// ```
/// use vigil_remedy::advisor::{Advisory, AdvisoryOutcome};
///
/// let advisory = Advisory {
///     check_id: "CKV_AWS_18".into(),
///     resource: "aws_s3_bucket.logs".into(),
///     outcome: AdvisoryOutcome::Suggestion("enable access logging".into()),
/// };
/// assert!(!advisory.failed());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    /// Rule identifier the suggestion addresses.
    pub check_id: String,
    /// Resource the violation applies to.
    pub resource: String,
    /// Suggestion text or failure message.
    pub outcome: AdvisoryOutcome,
}

/// Result of one advisory call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryOutcome {
    /// The model returned a fix suggestion.
    Suggestion(String),
    /// The backend call failed; the text is the failure message.
    Failed(String),
}

impl Advisory {
    /// Returns `true` if the backend call failed for this finding.
    pub fn failed(&self) -> bool {
        matches!(self.outcome, AdvisoryOutcome::Failed(_))
    }

    /// The suggestion or failure text.
    pub fn text(&self) -> &str {
        match &self.outcome {
            AdvisoryOutcome::Suggestion(s) | AdvisoryOutcome::Failed(s) => s,
        }
    }
}

/// Conversational remediation advisor.
///
/// Owns the session's [`ConversationState`] and queries the backend once
/// per finding, sending the FULL growing history so the model keeps
/// cross-finding context within one session.
///
/// Failure discipline: a failed backend call leaves the conversation
/// byte-identical to before the call — neither the prompt nor a partial
/// reply is committed, so a retry re-sends the same prompt without
/// duplication.
pub struct RemediationAdvisor<B: ChatBackend> {
    backend: B,
    conversation: ConversationState,
}

impl<B: ChatBackend> RemediationAdvisor<B> {
    /// Start a new advisory session seeded with the DevSecOps system prompt.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            conversation: ConversationState::new(prompt::build_system_prompt()),
        }
    }

    /// The session's message history.
    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask the model for a fix suggestion for one finding.
    ///
    /// Never returns an error: a backend failure is folded into the
    /// returned [`Advisory`] so the caller can keep processing the
    /// remaining findings (per-finding isolation).
    pub async fn suggest_fix(&mut self, finding: &Finding) -> Advisory {
        let user = ChatMessage::user(prompt::build_finding_prompt(finding));
        let outcome = match self.backend.chat(&self.conversation.with_candidate(user.clone())).await
        {
            Ok(reply) => {
                self.conversation.push(user);
                self.conversation.push(ChatMessage::assistant(reply.clone()));
                AdvisoryOutcome::Suggestion(reply)
            }
            Err(e) => AdvisoryOutcome::Failed(e.to_string()),
        };
        Advisory {
            check_id: finding.check_id.clone(),
            resource: finding.resource.clone(),
            outcome,
        }
    }

    /// Free-text chat on the same conversation, outside the finding
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Advisory`] if the backend call fails; the
    /// conversation is left unmodified in that case.
    pub async fn chat(&mut self, text: &str) -> Result<String, VigilError> {
        let user = ChatMessage::user(text);
        let reply = self
            .backend
            .chat(&self.conversation.with_candidate(user.clone()))
            .await?;
        self.conversation.push(user);
        self.conversation.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }
}
