use serde::Deserialize;

use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_SAFETY_MARGIN_MS};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub identity: IdentitySettings,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Identity service credentials
/// ================================
#[derive(Deserialize, Clone)]
pub struct IdentitySettings {
    pub service_url: String,
    pub principal: String,
    pub secret: String,
    /// subtracted from both token deadlines
    #[serde(default = "default_safety_margin_ms")]
    pub safety_margin_ms: i64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl std::fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("service_url", &self.service_url)
            .field("principal", &self.principal)
            .field("secret", &"***")
            .field("safety_margin_ms", &self.safety_margin_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_safety_margin_ms() -> i64 {
    DEFAULT_SAFETY_MARGIN_MS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}
