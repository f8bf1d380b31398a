//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → Cors → Tracing → BodyLimit → (Auth, per protected route) → Handler

pub mod auth;
pub mod cors;
pub mod metrics;
pub mod tracing;

pub use auth::{extract_init_data, AuthLayer, INIT_DATA_HEADER, INIT_DATA_QUERY_PARAM};
pub use cors::create_cors_layer;
pub use metrics::GatewayMetrics;
pub use self::tracing::{TracingLayer, REQUEST_ID_HEADER};
