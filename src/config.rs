//! Layered application configuration.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

/// Default chat-completion endpoint (full URL, not a base).
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";
/// Default commentator model.
pub const DEFAULT_MODEL: &str = "THUDM/glm-4-9b-chat";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Host to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// API key for the chat-completion endpoint
    #[arg(long, env = "SILICON_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used by the commentator
    #[arg(long, env = "COMMENTATOR_MODEL")]
    pub model: Option<String>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub commentator: CommentatorConfig,
    pub resilience: ResilienceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Connection and sampling settings for the commentator.
///
/// Read once at startup and handed to both the HTTP client and every
/// [`Commentator`](crate::commentator::Commentator) instance.
#[derive(Deserialize, Clone)]
pub struct CommentatorConfig {
    /// Full chat-completion endpoint URL.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Bearer token. Empty strings are treated as absent.
    #[serde(default)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Replaces the built-in system instruction when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl CommentatorConfig {
    /// The API key, if one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl std::fmt::Debug for CommentatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentatorConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.is_some())
            .finish()
    }
}

impl Default for CommentatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETIONS_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 150,
            system_prompt: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("commentator.base_url", DEFAULT_COMPLETIONS_URL)?
            .set_default("commentator.model", DEFAULT_MODEL)?
            .set_default("commentator.temperature", 0.7)?
            .set_default("commentator.max_tokens", 150)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.request_timeout_secs", 30)?;

        // 2. Config file: explicit path must exist, ./config.yaml is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables (prefixed with FOLLOWUP_)
        // E.g. FOLLOWUP_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("FOLLOWUP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags and their direct env aliases win over everything
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(key) = cli.api_key.filter(|k| !k.trim().is_empty()) {
            builder = builder.set_override("commentator.api_key", key)?;
        }
        if let Some(model) = cli.model {
            builder = builder.set_override("commentator.model", model)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

/// Whether logs should be emitted as JSON lines.
pub fn log_json_enabled() -> bool {
    env::var("FOLLOWUP_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = CommentatorConfig {
            api_key: Some("sk-secret".to_string()),
            ..CommentatorConfig::default()
        };
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let cfg = CommentatorConfig {
            api_key: Some("   ".to_string()),
            ..CommentatorConfig::default()
        };
        assert_eq!(cfg.api_key(), None);
    }
}
