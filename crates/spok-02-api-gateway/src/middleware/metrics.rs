//! Gateway counters, exposed as JSON on `/metrics`.

use serde_json::{json, Map, Value};
use spok_01_init_data::InitDataError;
use std::sync::atomic::{AtomicU64, Ordering};

/// API Gateway metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Auth counters
    pub auth_verified: AtomicU64,
    pub auth_missing: AtomicU64,
    /// One slot per [`InitDataError`], indexed by [`InitDataError::index`]
    pub auth_rejected: [AtomicU64; InitDataError::ALL.len()],

    // Latency tracking
    pub total_latency_ms: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, success: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
    }

    pub fn record_auth_verified(&self) {
        self.auth_verified.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that carried no init data at all
    pub fn record_auth_missing(&self) {
        self.auth_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_auth_rejected(&self, err: InitDataError) {
        self.auth_rejected[err.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejections(&self, err: InitDataError) -> u64 {
        self.auth_rejected[err.index()].load(Ordering::Relaxed)
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Snapshot of all counters
    pub fn to_json(&self) -> Value {
        let mut rejected = Map::new();
        for err in InitDataError::ALL {
            rejected.insert(err.code().to_string(), json!(self.rejections(err)));
        }

        json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
                "average_latency_ms": self.average_latency_ms(),
            },
            "auth": {
                "verified": self.auth_verified.load(Ordering::Relaxed),
                "missing": self.auth_missing.load(Ordering::Relaxed),
                "rejected": Value::Object(rejected),
            },
        })
    }
}
