mod backend;
mod logging;

pub use backend::{BackendConfig, BackendKind};
pub use logging::LoggingConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConsoleError, Result};

/// Root configuration for the console.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Where backfill status and creation calls are sent.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Page rendering options.
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConsoleError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content)?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConsoleError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.backend.kind == BackendKind::Http && self.backend.url.trim().is_empty() {
            return Err(ConsoleError::Config(
                "backend.url is required when backend.kind = \"http\"".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConsoleError::Config("server.port must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port.
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Page rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Product name shown in page titles.
    #[serde(default = "default_title")]
    pub title: String,

    /// Status pages refresh themselves after this many seconds. Zero disables.
    #[serde(default = "default_auto_reload")]
    pub auto_reload_secs: u64,

    /// External logs link. `{id}` is replaced with the backfill run id.
    #[serde(default = "default_logs_url_template")]
    pub logs_url_template: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            auto_reload_secs: default_auto_reload(),
            logs_url_template: default_logs_url_template(),
        }
    }
}

fn default_title() -> String {
    "Backfill Console".to_string()
}

fn default_auto_reload() -> u64 {
    10
}

fn default_logs_url_template() -> String {
    "https://logs.example.com/search?q=backfill_run_id%3A{id}".to_string()
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> Result<String> {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ConsoleError::Internal(format!("Invalid env pattern: {}", e)))?;

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    Ok(result)
}
