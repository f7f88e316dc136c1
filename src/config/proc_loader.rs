use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::{LoggingConfig, ServiceConfig};

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env var pattern is valid")
});

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("unable to read config file {}", path.display()))?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded)
}

pub fn parse_config(content: String) -> Result<ServiceConfig> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if service_config.logging.is_none() {
        service_config.logging = Some(LoggingConfig::default());
    }
    debug!("validation config ...");
    validate_service_config(&service_config)?;

    Ok(service_config)
}

pub fn validate_service_config(service_config: &ServiceConfig) -> Result<()> {
    let identity = &service_config.identity;
    if !(identity.service_url.starts_with("http://") || identity.service_url.starts_with("https://")) {
        bail!("identity.service_url must be an http(s) url, got '{}'", identity.service_url);
    }
    if identity.principal.trim().is_empty() {
        bail!("identity.principal must not be empty");
    }
    if identity.safety_margin_ms < 0 {
        bail!("identity.safety_margin_ms must not be negative");
    }
    if identity.request_timeout_ms == 0 {
        bail!("identity.request_timeout_ms must be greater than zero");
    }
    Ok(())
}

/// Replace `${VAR}` and `${VAR:default}` with values from the environment.
pub fn expand_env_vars(input: &str) -> String {
    ENV_VAR
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string()
}
