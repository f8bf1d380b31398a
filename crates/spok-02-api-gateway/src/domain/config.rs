//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Init data authentication configuration
    pub auth: AuthConfig,
    /// Request limits
    pub limits: LimitsConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.auth.bot_token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingCredential),
        }

        if self.auth.max_age.as_secs() == 0 {
            return Err(ConfigError::InvalidMaxAge(
                "max_age must be at least one second".into(),
            ));
        }

        if self.auth.max_age.subsec_nanos() != 0 {
            return Err(ConfigError::InvalidMaxAge(format!(
                "max_age must be a whole number of seconds, got {:?}",
                self.auth.max_age
            )));
        }

        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
        }
    }
}

/// Init data authentication configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bot token issued by the host platform. Required.
    #[serde(skip_serializing)]
    pub bot_token: Option<String>,
    /// Maximum accepted payload age
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
    /// Return the specific rejection code to clients. When false, every
    /// rejection is reported as `unauthorized`.
    pub expose_reasons: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            max_age: Duration::from_secs(60 * 60 * 24),
            expose_reasons: true,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("max_age", &self.max_age)
            .field("expose_reasons", &self.expose_reasons)
            .finish()
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64KB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "X-Requested-With".to_string(),
                "X-Telegram-Init-Data".to_string(),
                "Authorization".to_string(),
            ],
            max_age: Duration::from_secs(60 * 60),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Bot token not configured
    #[error("bot token is not configured (set TELEGRAM_BOT_TOKEN)")]
    MissingCredential,
    /// Invalid freshness window
    #[error("invalid auth max age: {0}")]
    InvalidMaxAge(String),
    /// Port 0 is not a listening port
    #[error("invalid http port")]
    InvalidPort,
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}

/// Duration serde helper accepting `"24h"`, `"90m"`, `"30s"`, `"250ms"` or
/// plain seconds.
pub mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    /// Parse a duration string. Suffixes: `ms`, `h`, `m`, `s`.
    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        let (digits, scale_ms) = if let Some(ms) = s.strip_suffix("ms") {
            (ms, 1)
        } else if let Some(hours) = s.strip_suffix('h') {
            (hours, 3_600_000)
        } else if let Some(mins) = s.strip_suffix('m') {
            (mins, 60_000)
        } else if let Some(secs) = s.strip_suffix('s') {
            (secs, 1_000)
        } else {
            (s, 1_000)
        };

        digits
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(scale_ms))
            .map(Duration::from_millis)
            .ok_or("invalid duration format")
    }
}
