//! # SpokSpace Runtime
//!
//! Process wiring for the SpokSpace backend: configuration from the
//! environment, logging setup, and the serve loop.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, then `SPOK_LOG_LEVEL`, then `info`)
//! 2. Load configuration from the environment
//! 3. Validate it (a missing bot token aborts startup)
//! 4. Serve until Ctrl-C

use std::net::IpAddr;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use spok_02_api_gateway::domain::config::humantime_serde::parse_duration;
use spok_02_api_gateway::GatewayConfig;
use tracing_subscriber::EnvFilter;

/// Bot token issued by the host platform
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_HTTP_HOST: &str = "SPOK_HTTP_HOST";
pub const ENV_HTTP_PORT: &str = "SPOK_HTTP_PORT";
/// Fallback port variable set by most hosting platforms
pub const ENV_PORT: &str = "PORT";
pub const ENV_AUTH_MAX_AGE: &str = "SPOK_AUTH_MAX_AGE";
pub const ENV_EXPOSE_AUTH_REASONS: &str = "SPOK_EXPOSE_AUTH_REASONS";
/// Comma separated; `*` allows any origin
pub const ENV_CORS_ORIGINS: &str = "SPOK_CORS_ORIGINS";
pub const ENV_MAX_REQUEST_SIZE: &str = "SPOK_MAX_REQUEST_SIZE";
pub const ENV_LOG_LEVEL: &str = "SPOK_LOG_LEVEL";

/// Load configuration from the process environment
pub fn load_config() -> Result<GatewayConfig> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Load configuration from `lookup`, starting from defaults.
///
/// Unset or blank variables keep the default; malformed ones are errors.
pub fn load_config_from<F>(lookup: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let mut config = GatewayConfig::default();

    config.auth.bot_token = get(ENV_BOT_TOKEN);

    if let Some(host) = get(ENV_HTTP_HOST) {
        config.http.host = parse_var::<IpAddr>(ENV_HTTP_HOST, &host)?;
    }

    if let Some(port) = get(ENV_HTTP_PORT) {
        config.http.port = parse_var(ENV_HTTP_PORT, &port)?;
    } else if let Some(port) = get(ENV_PORT) {
        config.http.port = parse_var(ENV_PORT, &port)?;
    }

    if let Some(max_age) = get(ENV_AUTH_MAX_AGE) {
        config.auth.max_age = parse_duration(&max_age)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("{ENV_AUTH_MAX_AGE}={max_age}"))?;
    }

    if let Some(expose) = get(ENV_EXPOSE_AUTH_REASONS) {
        config.auth.expose_reasons = parse_bool(ENV_EXPOSE_AUTH_REASONS, &expose)?;
    }

    if let Some(origins) = get(ENV_CORS_ORIGINS) {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(size) = get(ENV_MAX_REQUEST_SIZE) {
        config.limits.max_request_size = parse_var(ENV_MAX_REQUEST_SIZE, &size)?;
    }

    Ok(config)
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("invalid value for {name}: {value:?}"))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("invalid value for {name}: {value:?} (expected true or false)"),
    }
}

/// Log filter directive: `RUST_LOG`, then `SPOK_LOG_LEVEL`, then `info`
pub fn log_filter<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    set("RUST_LOG")
        .or_else(|| set(ENV_LOG_LEVEL))
        .unwrap_or_else(|| "info".to_string())
}

/// Install the global fmt subscriber
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_new(log_filter(|name| std::env::var(name).ok()))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}
