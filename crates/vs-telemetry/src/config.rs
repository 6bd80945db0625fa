//! Telemetry configuration from environment variables.

use std::env;

/// Default service name attached to every log line.
pub const DEFAULT_SERVICE_NAME: &str = "vault-scanner";

/// Configuration for structured logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name for logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VS_SERVICE_NAME`: Service name (default: vault-scanner)
    /// - `VS_LOG_LEVEL`: Log level (default: info); `RUST_LOG` still wins at init
    /// - `VS_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("VS_SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),

            log_level: env::var("VS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("VS_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Configuration for one component of the scanner.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("{}-{}", DEFAULT_SERVICE_NAME, component);
        config
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json_logs(mut self, json_logs: bool) -> Self {
        self.json_logs = json_logs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "vault-scanner");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_for_component() {
        let config = TelemetryConfig::for_component("runtime");
        assert_eq!(config.service_name, "vault-scanner-runtime");
    }

    #[test]
    fn test_builders_override() {
        let config = TelemetryConfig::default()
            .with_log_level("debug")
            .with_json_logs(true);
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
    }
}
