//! Init data authentication middleware.
//!
//! Finds the signed init data on the request, verifies it, and hands the
//! resulting [`VerifiedPrincipal`] to handlers through request extensions.
//! Unverified requests never reach the inner service.
//!
//! Lookup order (first non-blank wins):
//! 1. `X-Telegram-Init-Data` header
//! 2. `Authorization: tma <init data>` (or `Bearer <init data>`)
//! 3. `initData` query parameter

use crate::domain::error::ApiError;
use crate::middleware::metrics::GatewayMetrics;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use spok_01_init_data::{InitDataVerificationApi, VerifiedPrincipal};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Header carrying the raw init data string
pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";
/// Query parameter carrying the init data string
pub const INIT_DATA_QUERY_PARAM: &str = "initData";

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    verifier: Arc<dyn InitDataVerificationApi>,
    metrics: Arc<GatewayMetrics>,
    expose_reasons: bool,
}

impl AuthLayer {
    pub fn new(
        verifier: Arc<dyn InitDataVerificationApi>,
        metrics: Arc<GatewayMetrics>,
        expose_reasons: bool,
    ) -> Self {
        Self {
            verifier,
            metrics,
            expose_reasons,
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            verifier: Arc::clone(&self.verifier),
            metrics: Arc::clone(&self.metrics),
            expose_reasons: self.expose_reasons,
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    verifier: Arc<dyn InitDataVerificationApi>,
    metrics: Arc<GatewayMetrics>,
    expose_reasons: bool,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let outcome = match extract_init_data(&req) {
            None => {
                debug!(path = %req.uri().path(), "Request carries no init data");
                self.metrics.record_auth_missing();
                Err(ApiError::missing_init_data())
            }
            Some(init_data) => match self.verifier.verify(&init_data) {
                Ok(principal) => {
                    self.metrics.record_auth_verified();
                    Ok(principal)
                }
                Err(err) => {
                    warn!(
                        path = %req.uri().path(),
                        reason = err.code(),
                        "Init data rejected"
                    );
                    self.metrics.record_auth_rejected(err);
                    Err(ApiError::rejected(err, self.expose_reasons))
                }
            },
        };

        Box::pin(async move {
            match outcome {
                Ok(principal) => {
                    req.extensions_mut().insert::<VerifiedPrincipal>(principal);
                    inner.call(req).await
                }
                Err(error) => Ok(error.into_response()),
            }
        })
    }
}

/// `Authorization` schemes that carry init data, matched case-insensitively
const AUTHORIZATION_SCHEMES: [&str; 2] = ["tma", "Bearer"];

/// Pull the init data string off a request
pub fn extract_init_data<B>(req: &Request<B>) -> Option<String> {
    let from_header = req
        .headers()
        .get(INIT_DATA_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(value) = from_header {
        return Some(value.to_string());
    }

    let from_authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| {
            AUTHORIZATION_SCHEMES
                .iter()
                .any(|known| scheme.eq_ignore_ascii_case(known))
        })
        .map(|(_, value)| value.trim())
        .filter(|v| !v.is_empty());
    if let Some(value) = from_authorization {
        return Some(value.to_string());
    }

    let query = req.uri().query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == INIT_DATA_QUERY_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
