use std::sync::Arc;
use std::time::Duration;

use crate::config::{parse_generator_provider_model, GeneratorConfig};
use crate::error::{Result, SolaceError};
use crate::generation::api::GeneratorApiClient;
use crate::generation::{truncate_at_last_period, ChatRole, ChatTurn};

/// Fixed notice persisted as the bot response when the generation backend is
/// missing, unreachable, or times out. Returned without error so the turn is
/// still recorded.
pub const DEGRADED_RESPONSE: &str = "The reply generator requires an accelerated \
inference backend which is not available right now. Your message has been saved; \
please try again once generation is back online.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

/// Process-wide handle to the reply model. Constructed once at startup and
/// injected into the orchestrator; generation never runs inside an open
/// database transaction.
#[derive(Debug, Clone)]
pub struct GeneratorProvider {
    backend: GeneratorBackend,
    config: Option<Arc<GeneratorConfig>>,
}

impl GeneratorProvider {
    pub fn new(config: Option<&GeneratorConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No generator configuration provided");
        };

        let (provider, _model) = parse_generator_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => GeneratorBackend::OpenAI,
            "openrouter" => GeneratorBackend::OpenRouter,
            "ollama" => GeneratorBackend::Ollama,
            "lmstudio" => GeneratorBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    GeneratorBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    GeneratorBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        Self {
            backend,
            config: Some(Arc::new(config.clone())),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: GeneratorBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, GeneratorBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &GeneratorBackend {
        &self.backend
    }

    /// Generate a reply for the given conversation.
    ///
    /// Requires at least one user message. Degraded mode (no backend, call
    /// failure, timeout) yields the fixed [`DEGRADED_RESPONSE`] instead of an
    /// error; only malformed input fails.
    pub async fn generate(&self, turns: &[ChatTurn]) -> Result<String> {
        if !turns.iter().any(|turn| turn.role == ChatRole::User) {
            return Err(SolaceError::Validation(
                "Conversation must contain at least one user message".to_string(),
            ));
        }

        let Some(config) = self.config.as_deref() else {
            tracing::warn!(reason = %self.unavailable_reason(), "Generator degraded, returning fixed notice");
            return Ok(DEGRADED_RESPONSE.to_string());
        };

        let client = match GeneratorApiClient::new(config) {
            Ok(client) => client,
            Err(error) => {
                tracing::warn!(error = %error, "Generator client unavailable, returning fixed notice");
                return Ok(DEGRADED_RESPONSE.to_string());
            }
        };

        let budget = Duration::from_secs(config.timeout_secs);
        match tokio::time::timeout(budget, client.complete_chat(turns)).await {
            Ok(Ok(reply)) => Ok(truncate_at_last_period(&reply)),
            Ok(Err(error)) => {
                tracing::warn!(error = %error, "Generation failed, returning fixed notice");
                Ok(DEGRADED_RESPONSE.to_string())
            }
            Err(_) => {
                tracing::warn!(timeout_secs = config.timeout_secs, "Generation timed out, returning fixed notice");
                Ok(DEGRADED_RESPONSE.to_string())
            }
        }
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            GeneratorBackend::Unavailable { reason } => reason.clone(),
            _ => "Generator backend unavailable".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_config_means_unavailable() {
        let provider = GeneratorProvider::new(None);
        assert!(!provider.is_available());
    }

    #[test]
    fn known_provider_is_available() {
        let config = GeneratorConfig {
            model: "ollama/mistral:instruct".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
        };
        let provider = GeneratorProvider::new(Some(&config));
        assert!(provider.is_available());
        assert_eq!(provider.backend(), &GeneratorBackend::Ollama);
    }

    #[test]
    fn unknown_provider_without_base_url_is_unavailable() {
        let config = GeneratorConfig {
            model: "mistral-7b-instruct".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
        };
        let provider = GeneratorProvider::new(Some(&config));
        assert!(!provider.is_available());
    }

    #[tokio::test]
    async fn degraded_generate_returns_fixed_notice_without_error() {
        let provider = GeneratorProvider::new(None);
        let reply = provider
            .generate(&[ChatTurn::user("I feel low today")])
            .await
            .expect("degraded mode must not error");
        assert_eq!(reply, DEGRADED_RESPONSE);
    }

    #[tokio::test]
    async fn conversation_without_user_message_is_rejected() {
        let provider = GeneratorProvider::new(None);
        let err = provider
            .generate(&[ChatTurn::assistant("hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, SolaceError::Validation(_)));
    }
}
