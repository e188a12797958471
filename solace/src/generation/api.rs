use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::config::{parse_generator_provider_model, GeneratorConfig};
use crate::error::{Result, SolaceError};
use crate::generation::{ChatRole, ChatTurn, MAX_REPLY_TOKENS, SAMPLING_TEMPERATURE};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
}

/// Thin OpenAI-compatible chat client used by the generator provider.
#[derive(Clone)]
pub struct GeneratorApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl GeneratorApiClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let api_config = ApiConfig::from_generator_config(config);

        let (provider, _) = parse_generator_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(SolaceError::Validation(
                "API key required for this generation provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                SolaceError::Internal(format!("Failed to create generator HTTP client: {error}"))
            })?;

        // Cap async-openai's internal backoff at our own timeout; its default
        // max_elapsed_time retries server errors for up to 15 minutes.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(api_config.timeout_secs)),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    /// One sampled completion over the given conversation.
    pub async fn complete_chat(&self, turns: &[ChatTurn]) -> Result<String> {
        let mut last_error: Option<SolaceError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay_ms = 100 * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let request = self.build_request(turns)?;

            match self.client.chat().create(request).await {
                Ok(response) => return Self::extract_content(response),
                Err(error) => {
                    let retryable = Self::is_retryable(&error);
                    let mapped_error = Self::map_openai_error(error);

                    if retryable && attempt < self.config.max_retries {
                        last_error = Some(mapped_error);
                        continue;
                    }

                    return Err(mapped_error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SolaceError::Internal("Generation failed after retries".to_string())
        }))
    }

    fn build_request(&self, turns: &[ChatTurn]) -> Result<CreateChatCompletionRequest> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(turns.len());

        for turn in turns {
            let message = match turn.role {
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|error| {
                        SolaceError::Validation(format!("Invalid user message: {error}"))
                    })?
                    .into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|error| {
                        SolaceError::Validation(format!("Invalid assistant message: {error}"))
                    })?
                    .into(),
            };
            messages.push(message);
        }

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(messages)
            .max_tokens(MAX_REPLY_TOKENS)
            .temperature(SAMPLING_TEMPERATURE)
            .build()
            .map_err(|error| {
                SolaceError::Validation(format!("Invalid generation request: {error}"))
            })
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                SolaceError::Internal("Generator response contained no choices".to_string())
            })?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(SolaceError::Internal(
                "Generator response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn is_retryable(error: &OpenAIError) -> bool {
        match error {
            OpenAIError::ApiError(api_error) => {
                api_error.r#type.is_none() && api_error.code.is_none()
            }
            OpenAIError::Reqwest(reqwest_error) => reqwest_error
                .status()
                .map(|status| status.is_server_error())
                .unwrap_or(true),
            _ => false,
        }
    }

    fn map_openai_error(error: OpenAIError) -> SolaceError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                SolaceError::Internal(format!("Generator request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                SolaceError::Internal(format!("Generator API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                SolaceError::Internal(format!("Failed to parse generator response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => SolaceError::Validation(message),
            other => SolaceError::Internal(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_generator_config(config: &GeneratorConfig) -> Self {
        let (provider, model) = parse_generator_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalized_model,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        }
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_generator_config() -> GeneratorConfig {
        GeneratorConfig {
            model: "ollama/mistral:instruct".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
        }
    }

    #[test]
    fn request_carries_token_budget_and_sampling() {
        let client = GeneratorApiClient::new(&test_generator_config()).expect("client");
        let request = client
            .build_request(&[ChatTurn::user("I feel anxious today")])
            .expect("request should build");

        assert_eq!(request.max_tokens, Some(MAX_REPLY_TOKENS));
        assert_eq!(request.temperature, Some(SAMPLING_TEMPERATURE));
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn missing_api_key_for_hosted_provider_is_rejected() {
        let config = GeneratorConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
        };
        assert!(GeneratorApiClient::new(&config).is_err());
    }

    #[test]
    fn local_providers_do_not_require_api_key() {
        assert!(GeneratorApiClient::new(&test_generator_config()).is_ok());
    }
}
