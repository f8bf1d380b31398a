//! # Storage Flows
//!
//! Authenticated data routes backed by a shared in-memory store.
//!
//! ## Flows Tested:
//!
//! 1. **Isolation**: a user can neither read nor write another user's data
//! 2. **Shared store**: two gateway instances see the same records
//! 3. **Legacy values**: records written as JSON text are still readable

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use spok_01_init_data::{Clock, SystemClock};
    use spok_02_api_gateway::{ApiGatewayService, GatewayConfig, InMemoryKvStore, KvStore};

    use crate::integration::{signed_init_data, TEST_TOKEN};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn router(store: Arc<InMemoryKvStore>) -> Router {
        let mut config = GatewayConfig::default();
        config.auth.bot_token = Some(TEST_TOKEN.to_string());
        ApiGatewayService::new(config, store).unwrap().router()
    }

    async fn call(
        router: &Router,
        user_id: i64,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "x-telegram-init-data",
                signed_init_data(user_id, SystemClock.now_unix()),
            )
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_users_are_isolated() {
        let router = router(Arc::new(InMemoryKvStore::new()));

        let (status, _) = call(
            &router,
            1,
            Method::POST,
            "/api/best-score",
            Some(json!({"user_id": "tg_1", "score": 40})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // user 2 cannot read user 1
        let (status, body) = call(&router, 2, Method::GET, "/api/best-score?user_id=tg_1", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["reason"], "user_mismatch");

        // nor overwrite it
        let (status, _) = call(
            &router,
            2,
            Method::POST,
            "/api/emotions",
            Some(json!({"user_id": "tg_1", "date_key": "2024-06-01", "emotion": "sad"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // user 2 has its own, empty, score
        let (status, body) = call(&router, 2, Method::GET, "/api/best-score", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"user_id": "tg_2", "best_score": 0}));
    }

    #[tokio::test]
    async fn test_instances_share_the_store() {
        let store = Arc::new(InMemoryKvStore::new());
        let first = router(Arc::clone(&store));
        let second = router(Arc::clone(&store));

        let (status, _) = call(
            &first,
            3,
            Method::POST,
            "/api/emotions",
            Some(json!({
                "user_id": "tg_3",
                "date_key": "2024-07-04",
                "emotion": "excited",
                "platform": "android",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &second,
            3,
            Method::GET,
            "/api/emotions?from=2024-07-01&to=2024-07-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["records"][0]["emotion"], "excited");
        assert_eq!(body["records"][0]["platform"], "android");

        assert_eq!(
            store.smembers("emo_idx:tg_3").await.unwrap(),
            vec!["2024-07-04".to_string()]
        );
    }

    #[tokio::test]
    async fn test_legacy_values_are_readable() {
        let store = Arc::new(InMemoryKvStore::new());
        store.set("best:tg_4", json!("12")).await.unwrap();
        store
            .set(
                "emo:tg_4:2024-01-15",
                json!(r#"{"user_id":"tg_4","date_key":"2024-01-15","emotion":"ok"}"#),
            )
            .await
            .unwrap();
        store.sadd("emo_idx:tg_4", "2024-01-15").await.unwrap();
        // indexed but never written
        store.sadd("emo_idx:tg_4", "2024-01-16").await.unwrap();

        let router = router(Arc::clone(&store));

        let (_, body) = call(&router, 4, Method::GET, "/api/best-score", None).await;
        assert_eq!(body["best_score"], 12);

        let (_, body) = call(
            &router,
            4,
            Method::POST,
            "/api/best-score",
            Some(json!({"user_id": "tg_4", "score": 12.5})),
        )
        .await;
        assert_eq!(body["best_score"], 12.5);

        let (status, body) = call(
            &router,
            4,
            Method::GET,
            "/api/emotions?from=2024-01-01&to=2024-01-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["emotion"], "ok");
    }
}
