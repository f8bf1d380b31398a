// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! SPOK-02 API Gateway - HTTP backend for the SpokSpace mini-app.
//!
//! Every data route is gated by host-signed init data, verified with
//! `spok-01-init-data`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    API GATEWAY (spok-02)                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────────┐              │
//! │  │            Middleware Stack                │              │
//! │  │   Cors → Tracing → BodyLimit → Auth        │              │
//! │  └────────────────────┬───────────────────────┘              │
//! │                       │                                      │
//! │  ┌──────────┬─────────┴──┬──────────────┬──────────┐         │
//! │  │ /health  │  /me       │ /best-score  │ /emotions│         │
//! │  │ (public) │            │              │          │         │
//! │  └──────────┴────────────┴──────┬───────┴────┬─────┘         │
//! │                                 │            │               │
//! │  ┌──────────────────────────────┴────────────┴──┐            │
//! │  │              KvStore port                    │            │
//! │  └──────────────────────┬───────────────────────┘            │
//! └─────────────────────────┼────────────────────────────────────┘
//!                           ▼
//!                 in-memory / managed KV
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use spok_02_api_gateway::{ApiGatewayService, GatewayConfig, InMemoryKvStore};
//!
//! let mut config = GatewayConfig::default();
//! config.auth.bot_token = Some(token);
//! let service = ApiGatewayService::new(config, Arc::new(InMemoryKvStore::new()))?;
//! service.run(shutdown_signal()).await?;
//! ```
//!
//! # Security
//!
//! - Init data is accepted from one of three transports, first non-blank wins
//! - A verified user may only read and write their own `tg_<id>` records
//! - Rejection reasons can be hidden from clients (`auth.expose_reasons = false`)

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod routes;
pub mod service;

// Re-export main types
pub use adapters::InMemoryKvStore;
pub use domain::config::{
    AuthConfig, ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig,
};
pub use domain::error::{ApiError, ApiResult, GatewayError, Issue};
pub use middleware::{AuthLayer, GatewayMetrics};
pub use ports::{KvStore, StorageError};
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
