mod api;
mod provider;

pub use provider::{GeneratorBackend, GeneratorProvider, DEGRADED_RESPONSE};

use serde::{Deserialize, Serialize};

/// Maximum number of generated tokens requested beyond the input length.
/// The chat-completions wire contract has no minimum-length parameter, so
/// short replies are accepted as-is rather than regenerated.
pub const MAX_REPLY_TOKENS: u32 = 150;
/// Sampling temperature; replies are sampled, never greedy.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One role-tagged message in the conversation sent to the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Cut the decoded reply at its last sentence-terminating period so replies
/// never end mid-sentence. Text without any period is returned unchanged.
pub fn truncate_at_last_period(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.rfind('.') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => trimmed.to_string(),
    }
}
