use crate::llm::ChatMessage;

/// Ordered, append-only message history for one advisory session.
///
/// Owned exclusively by the advisor and grows monotonically: every
/// successful suggestion appends exactly one user message and one assistant
/// message. On a failed backend call nothing is appended, so a retry
/// re-sends the identical history.
///
/// # Examples
///
/// ```
/// use vigil_remedy::conversation::ConversationState;
/// use vigil_remedy::llm::ChatMessage;
///
/// let mut conv = ConversationState::new("You are a DevSecOps assistant.");
/// conv.push(ChatMessage::user("What does CKV_AWS_18 mean?"));
/// conv.push(ChatMessage::assistant("It checks S3 access logging."));
/// assert_eq!(conv.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
}

impl ConversationState {
    /// Start a session seeded with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// Append one message. There is no removal — history only grows.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The full ordered history, system prompt first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages in the history (including the system prompt).
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false`: a session carries at least its system prompt.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The history plus one candidate message, without mutating the state.
    ///
    /// Used to send a prompt whose turns are only committed to the history
    /// after the backend call succeeds.
    pub fn with_candidate(&self, candidate: ChatMessage) -> Vec<ChatMessage> {
        let mut messages = self.messages.clone();
        messages.push(candidate);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn new_session_carries_system_prompt() {
        let conv = ConversationState::new("system text");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].role, Role::System);
        assert_eq!(conv.messages()[0].content, "system text");
        assert!(!conv.is_empty());
    }

    #[test]
    fn push_appends_in_order() {
        let mut conv = ConversationState::new("s");
        conv.push(ChatMessage::user("first"));
        conv.push(ChatMessage::assistant("second"));
        let roles: Vec<Role> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn with_candidate_does_not_mutate() {
        let conv = ConversationState::new("s");
        let sent = conv.with_candidate(ChatMessage::user("candidate"));
        assert_eq!(sent.len(), 2);
        assert_eq!(conv.len(), 1);
    }
}
