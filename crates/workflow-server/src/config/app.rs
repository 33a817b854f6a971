//! HTTP server settings.

use serde::Deserialize;
use std::time::Duration;

/// Read from `DEALFLOW_*` variables.
///
/// | variable | default |
/// |---|---|
/// | `DEALFLOW_HOST` | `0.0.0.0` |
/// | `DEALFLOW_PORT` | `8082` |
/// | `DEALFLOW_DEBUG` | `false` |
/// | `DEALFLOW_SERVER_NAME` | `dealflow-server` |
/// | `DEALFLOW_WEBHOOK_TIMEOUT_SECS` | `30` |
/// | `DEALFLOW_LOG_JSON` | `false` |
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Reported by `/api/health`.
    pub server_name: String,
    /// Applies to each outbound `webhook` action.
    pub webhook_timeout_secs: u64,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            debug: false,
            server_name: "dealflow-server".to_string(),
            webhook_timeout_secs: 30,
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("DEALFLOW_").from_env()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}
