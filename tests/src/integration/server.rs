//! # Served Gateway
//!
//! Runs the gateway on a real socket and talks to it over HTTP, then shuts
//! it down gracefully.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::Value;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    use spok_01_init_data::{Clock, SystemClock};
    use spok_02_api_gateway::{ApiGatewayService, GatewayConfig, InMemoryKvStore};

    use crate::integration::{signed_init_data, TEST_TOKEN};

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let mut config = GatewayConfig::default();
        config.auth.bot_token = Some(TEST_TOKEN.to_string());
        let service = ApiGatewayService::new(config, Arc::new(InMemoryKvStore::new())).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(service.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        let client = reqwest::Client::new();

        let health: Value = client
            .get(format!("http://{addr}/api/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["ok"], true);

        let response = client
            .get(format!("http://{addr}/api/me"))
            .header(
                "X-Telegram-Init-Data",
                signed_init_data(77, SystemClock.now_unix()),
            )
            .header("x-request-id", "served-1")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "served-1"
        );
        let me: Value = response.json().await.unwrap();
        assert_eq!(me["user"]["id"], 77);

        let unauthorized = client
            .get(format!("http://{addr}/api/me"))
            .send()
            .await
            .unwrap();
        assert_eq!(unauthorized.status(), reqwest::StatusCode::UNAUTHORIZED);

        shutdown_tx.send(()).unwrap();
        let result = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
        assert!(result.is_ok());
    }
}
