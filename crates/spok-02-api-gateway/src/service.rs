//! API Gateway service - main entry point.
//!
//! Builds the router (public and init-data protected routes) and serves it
//! until the shutdown future resolves.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::{create_cors_layer, AuthLayer, GatewayMetrics, TracingLayer};
use crate::ports::outbound::KvStore;
use crate::routes::{self, best_score, emotions, health, me, AppState};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use spok_01_init_data::{InitDataVerificationApi, InitDataVerifier};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::info;

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    verifier: Arc<dyn InitDataVerificationApi>,
    store: Arc<dyn KvStore>,
    metrics: Arc<GatewayMetrics>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service.
    ///
    /// Fails when the configuration is invalid, including a missing bot token.
    pub fn new(config: GatewayConfig, store: Arc<dyn KvStore>) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let token = config.auth.bot_token.clone().unwrap_or_default();
        let verifier = InitDataVerifier::new(token)
            .map_err(|e| GatewayError::Config(e.to_string()))?
            .with_max_age(config.auth.max_age);

        Ok(Self::from_parts(config, Arc::new(verifier), store))
    }

    /// Assemble a service from an already built verifier
    pub fn from_parts(
        config: GatewayConfig,
        verifier: Arc<dyn InitDataVerificationApi>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            config,
            verifier,
            store,
            metrics: Arc::new(GatewayMetrics::new()),
        }
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
        };

        let auth = AuthLayer::new(
            Arc::clone(&self.verifier),
            Arc::clone(&self.metrics),
            self.config.auth.expose_reasons,
        );

        let protected = Router::new()
            .route(
                "/api/me",
                get(me::get_me).fallback(routes::method_not_allowed),
            )
            .route(
                "/api/best-score",
                get(best_score::get_best_score)
                    .post(best_score::post_best_score)
                    .fallback(routes::method_not_allowed),
            )
            .route(
                "/api/emotions",
                get(emotions::get_emotions)
                    .post(emotions::post_emotion)
                    .fallback(routes::method_not_allowed),
            )
            .route_layer(auth);

        let public = Router::new()
            .route(
                "/api/health",
                get(health::health).fallback(routes::method_not_allowed),
            )
            .route(
                "/metrics",
                get(routes::metrics).fallback(routes::method_not_allowed),
            );

        // Build middleware stack
        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(TracingLayer::new(Arc::clone(&self.metrics)))
            .layer(DefaultBodyLimit::max(self.config.limits.max_request_size));

        public
            .merge(protected)
            .fallback(routes::not_found)
            .layer(middleware)
            .with_state(state)
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(
            addr = %local_addr,
            max_age_secs = self.config.auth.max_age.as_secs(),
            "Starting HTTP server"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        info!("API Gateway stopped");
        Ok(())
    }
}
