use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub chat: ChatBackendConfig,
    pub tts: TtsConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub chat_api_key: String,
    #[serde(default)]
    pub tts_api_key: String,
    #[serde(default)]
    pub tts_api_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

/// Upstream conversational-AI backend. Routes are rooted at
/// `{endpoint}/api/v1/chats/{chat_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatBackendConfig {
    pub endpoint: String,
    pub chat_id: String,
    #[serde(default = "default_session_page_size")]
    pub session_page_size: u32,
}

fn default_session_page_size() -> u32 {
    30
}

/// TTS provider connection parameters. The signed WebSocket URL is built
/// from `host` and `path`; `app_id`/`res_id` are opaque to us and handed to
/// the browser alongside it.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    pub host: String,
    pub path: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub res_id: String,
}

impl TtsConfig {
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.path.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (VOXCHAT__ prefix, e.g. VOXCHAT__SERVER__PORT)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("VOXCHAT")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets never live in TOML.
        cfg.chat_api_key = std::env::var("CHAT_API_KEY").map_err(|_| {
            ConfigError::Message("CHAT_API_KEY environment variable is required".to_string())
        })?;
        cfg.tts_api_key = std::env::var("TTS_API_KEY").unwrap_or_default();
        cfg.tts_api_secret = std::env::var("TTS_API_SECRET").unwrap_or_default();

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }

    /// Base URL for chat backend routes: `{endpoint}/api/v1/chats/{chat_id}`.
    pub fn chat_base_url(&self) -> String {
        format!(
            "{}/api/v1/chats/{}",
            self.chat.endpoint.trim_end_matches('/'),
            self.chat.chat_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [chat]
            endpoint = "https://chat.example.com"
            chat_id = "abc123"

            [tts]
            host = "tts.example.com"
            path = "/v1/private/voice_clone"
            app_id = "app-1"
            res_id = "res-1"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.session_page_size, 30);
        assert!(config.tts.is_configured());
        assert_eq!(
            config.chat_base_url(),
            "https://chat.example.com/api/v1/chats/abc123"
        );
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [cors]
            enabled = false
            origins = []

            [chat]
            endpoint = "https://chat.example.com/"
            chat_id = "c"

            [tts]
            host = ""
            path = ""

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.chat_base_url(), "https://chat.example.com/api/v1/chats/c");
        assert!(!config.tts.is_configured());
    }
}
