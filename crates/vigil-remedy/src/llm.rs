use std::time::Duration;

use serde::{Deserialize, Serialize};
use vigil_core::{LlmConfig, VigilError};

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use vigil_remedy::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Suggest a fix".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Construct a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Construct an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Construct a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use vigil_remedy::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// A backend that turns an ordered message history into one assistant reply.
///
/// The production implementation is [`LlmClient`]; tests substitute scripted
/// backends. Implementations must convert every transport-level failure
/// (network, HTTP status, malformed body) into [`VigilError::Advisory`]
/// rather than letting a raw transport error escape.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    /// Send the full conversation and return the assistant's reply text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, VigilError>;
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions`
/// endpoint: OpenAI, Ollama, vLLM, LiteLLM, etc.
///
/// # Examples
///
/// ```
/// use vigil_core::LlmConfig;
/// use vigil_remedy::llm::LlmClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = LlmClient::new(&config).unwrap();
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Advisory`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, VigilError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| VigilError::Advisory(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl ChatBackend for LlmClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, VigilError> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        let url = format!("{base_url}/v1/chat/completions");

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| VigilError::Advisory(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(VigilError::Advisory(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VigilError::Advisory(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                VigilError::Advisory(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::{ChatBackend, ChatMessage};
    use vigil_core::VigilError;

    /// Scripted backend: pops one canned result per call and records every
    /// message list it was sent. Calls past the script succeed with a
    /// canned suggestion.
    pub(crate) struct MockBackend {
        replies: RefCell<VecDeque<Result<String, VigilError>>>,
        pub(crate) calls: RefCell<Vec<Vec<ChatMessage>>>,
    }

    impl MockBackend {
        pub(crate) fn new(replies: Vec<Result<String, VigilError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ChatBackend for MockBackend {
        async fn chat(&self, messages: &[ChatMessage]) -> Result<String, VigilError> {
            self.calls.borrow_mut().push(messages.to_vec());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok("canned suggestion".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_construction_succeeds() {
        let config = LlmConfig::default();
        let client = LlmClient::new(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn model_returns_config_model() {
        let config = LlmConfig {
            model: "gpt-4o-mini".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn chat_message_serializes() {
        let msg = ChatMessage::system("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::user("u").role, Role::User);
        assert_eq!(ChatMessage::assistant("a").role, Role::Assistant);
        assert_eq!(ChatMessage::system("s").role, Role::System);
    }
}
