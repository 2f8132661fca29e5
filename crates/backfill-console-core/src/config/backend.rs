use serde::{Deserialize, Serialize};

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Which backend implementation serves status and create calls.
    #[serde(default)]
    pub kind: BackendKind,

    /// Base URL of the backfill service (http backend only).
    #[serde(default)]
    pub url: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// Available backend implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON over HTTP to a running backfill service.
    Http,
    /// Process-local store, for development.
    #[default]
    Memory,
}
