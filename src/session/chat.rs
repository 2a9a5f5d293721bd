//! Free-form chat against an advisor agent, with a bounded transcript.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::advisor::{AdvisorAgent, ContextOverrides};

/// Reply recorded when the advisor fails or does not answer in time.
pub const APOLOGY_MESSAGE: &str = "I'm sorry, I'm having trouble processing your request right now. Please try again or contact us directly.";

/// Earlier replies forwarded to the advisor with each new message.
const PREVIOUS_REPLY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Presentation and limits for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub welcome_message: String,
    pub placeholder_text: String,
    /// Transcript length; the oldest messages are dropped beyond it
    pub max_messages: usize,
    /// How long a single reply may take before the apology is recorded
    pub response_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            welcome_message: "Hi! I'm your business advisor. Tell me about your project or idea, and I'll help you find the perfect solutions from our services.".to_string(),
            placeholder_text: "Describe your project, idea, or need...".to_string(),
            max_messages: 50,
            response_timeout: Duration::from_secs(3),
        }
    }
}

/// A single visitor's conversation with the advisor.
#[derive(Debug, Clone)]
pub struct AdvisorSession {
    id: Uuid,
    config: SessionConfig,
    messages: Vec<ChatMessage>,
}

impl Default for AdvisorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl AdvisorSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(&mut self, message: ChatMessage) {
        // the latest message always survives
        let cap = self.config.max_messages.max(1);
        self.messages.push(message);
        if self.messages.len() > cap {
            let overflow = self.messages.len() - cap;
            self.messages.drain(..overflow);
        }
    }

    /// The most recent advisor replies, oldest first. Apologies are skipped.
    fn previous_replies(&self) -> Vec<String> {
        let mut replies: Vec<String> = self
            .messages
            .iter()
            .rev()
            .filter(|m| m.role == MessageRole::Assistant && m.content != APOLOGY_MESSAGE)
            .take(PREVIOUS_REPLY_LIMIT)
            .map(|m| m.content.clone())
            .collect();
        replies.reverse();
        replies
    }

    /// Send user input and record the advisor's reply.
    ///
    /// Blank input is ignored and yields `None`. Failures and timeouts are
    /// recorded as [`APOLOGY_MESSAGE`] rather than returned.
    pub async fn send(&mut self, agent: &AdvisorAgent, input: &str) -> Option<&ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let overrides = ContextOverrides::new().with_previous_responses(self.previous_replies());
        self.push(ChatMessage::new(MessageRole::User, input));

        let outcome = tokio::time::timeout(
            self.config.response_timeout,
            agent.analyze_need(input, overrides),
        )
        .await;

        let reply = match outcome {
            Ok(Ok(response)) => {
                debug!(session = %self.id, provider = %response.provider, "Advisor replied");
                response.message
            }
            Ok(Err(e)) => {
                warn!(session = %self.id, error = %e, "Advisor error");
                APOLOGY_MESSAGE.to_string()
            }
            Err(_) => {
                warn!(
                    session = %self.id,
                    timeout_ms = self.config.response_timeout.as_millis() as u64,
                    "Advisor timed out"
                );
                APOLOGY_MESSAGE.to_string()
            }
        };

        self.push(ChatMessage::new(MessageRole::Assistant, reply));
        self.messages.last()
    }
}
