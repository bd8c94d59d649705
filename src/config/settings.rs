use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Connection settings for the lending platform REST backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// `http` talks to `base_url`; `memory` runs against an in-process store
    #[serde(default = "default_backend_kind")]
    pub kind: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent on every request
    pub token: Option<String>,
    /// Sent as `X-Tenant-ID` when set
    pub tenant_id: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

/// Behaviour knobs shared by the list views.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Delay before a text search triggers a refetch
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Length of the plain-text excerpt shown on template cards
    #[serde(default = "default_card_preview_chars")]
    pub card_preview_chars: usize,
}

const MIN_DEBOUNCE_MS: u64 = 150;
const MAX_DEBOUNCE_MS: u64 = 500;

impl ConsoleConfig {
    /// Search debounce, clamped to the 150-500ms window.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(
            self.search_debounce_ms
                .clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS),
        )
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_backend_kind() -> String {
    "http".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_per_page() -> u32 {
    20
}

fn default_card_preview_chars() -> usize {
    180
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8090)?
            .set_default("backend.kind", "http")?
            .set_default("backend.base_url", "http://localhost:8000/api")?
            .set_default("backend.timeout_seconds", 30)?
            .set_default("console.search_debounce_ms", 300)?
            .set_default("console.per_page", 20)?
            .set_default("console.card_preview_chars", 180)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // CONSOLE_SERVER__PORT, CONSOLE_BACKEND__BASE_URL, CONSOLE_API__KEY, ...
            .add_source(
                Environment::with_prefix("CONSOLE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_production() -> bool {
        env::var("RUN_MODE")
            .map(|m| m == "production" || m == "prod")
            .unwrap_or(false)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_kind(),
            base_url: default_base_url(),
            token: None,
            tenant_id: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            per_page: default_per_page(),
            card_preview_chars: default_card_preview_chars(),
        }
    }
}
