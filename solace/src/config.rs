use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub generator: Option<GeneratorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of an issued access token, in minutes.
    pub access_token_ttl_minutes: i64,
}

/// Generator configuration for the reply model.
///
/// `model` follows the teacher convention `provider/model`, e.g.
/// `ollama/mistral:instruct` or `openai/gpt-4o-mini`. Absent `GENERATOR_MODEL`
/// means the generator runs in degraded mode.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SOLACE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SOLACE_PORT", 8000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:solace.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            auth: AuthConfig {
                access_token_ttl_minutes: parse_env_or("ACCESS_TOKEN_TTL_MINUTES", 50),
            },
            generator: env::var("GENERATOR_MODEL").ok().map(|model| GeneratorConfig {
                model,
                api_key: env::var("GENERATOR_API_KEY").ok(),
                base_url: env::var("GENERATOR_BASE_URL").ok(),
                timeout_secs: parse_env_or("GENERATOR_TIMEOUT", 60),
                max_retries: parse_env_or("GENERATOR_MAX_RETRIES", 1),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known generation providers that use OpenAI-compatible APIs.
pub const KNOWN_GENERATOR_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a generator model name into (provider, model) tuple.
pub fn parse_generator_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_GENERATOR_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
