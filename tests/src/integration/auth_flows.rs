//! # Init Data Authentication Flows
//!
//! Environment configuration → gateway service → router → verifier, with
//! the verifier running on the real wall clock.
//!
//! ## Flows Tested:
//!
//! 1. **Accepted payload**: a freshly signed payload reaches `/api/me`
//! 2. **Every rejection reason**: each failure surfaces its stable code
//! 3. **Hidden reasons**: `SPOK_EXPOSE_AUTH_REASONS=false` collapses them
//! 4. **Transport order**: header, then `Authorization`, then query

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use proptest::prelude::*;
    use serde_json::Value;
    use tower::ServiceExt;

    use spok_01_init_data::{
        sign_init_data, verify_at, BotToken, Clock, InitDataError, SystemClock,
    };
    use spok_02_api_gateway::{ApiGatewayService, InMemoryKvStore};

    use crate::integration::{signed_init_data, TEST_TOKEN};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn router_from_env(extra: &[(&str, &str)]) -> Router {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("TELEGRAM_BOT_TOKEN".into(), TEST_TOKEN.into());
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        let config = spok_runtime::load_config_from(|name| vars.get(name).cloned()).unwrap();
        ApiGatewayService::new(config, Arc::new(InMemoryKvStore::new()))
            .unwrap()
            .router()
    }

    fn now() -> i64 {
        SystemClock.now_unix()
    }

    fn sign(fields: &[(&str, &str)]) -> String {
        let token = BotToken::new(TEST_TOKEN).unwrap();
        sign_init_data(fields.iter().copied(), &token)
    }

    async fn get_me(router: &Router, init_data: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .uri("/api/me")
            .header("x-telegram-init-data", init_data)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// One payload per rejection reason, paired with the expected code
    fn rejected_payloads() -> Vec<(String, &'static str)> {
        let fresh = now().to_string();
        let stale = (now() - 86_401).to_string();
        let user = r#"{"id":7}"#;
        vec![
            (format!("auth_date={fresh}"), "missing_hash"),
            (
                sign(&[("auth_date", fresh.as_str()), ("user", user)]).replace("%3A7", "%3A8"),
                "hash_mismatch",
            ),
            (
                sign(&[("auth_date", "tomorrow"), ("user", user)]),
                "invalid_auth_date",
            ),
            (
                sign(&[("auth_date", stale.as_str()), ("user", user)]),
                "auth_date_expired",
            ),
            (sign(&[("auth_date", fresh.as_str())]), "missing_user"),
            (
                sign(&[("auth_date", fresh.as_str()), ("user", "{not json")]),
                "invalid_user_json",
            ),
            (
                sign(&[("auth_date", fresh.as_str()), ("user", r#"{"name":"x"}"#)]),
                "missing_user_id",
            ),
        ]
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_fresh_payload_is_accepted() {
        let router = router_from_env(&[]);
        let (status, body) = get_me(&router, &signed_init_data(1001, now())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], 1001);
        assert_eq!(body["user"]["username"], "tester");
        assert!(body.get("is_premium").is_none());
    }

    #[tokio::test]
    async fn test_every_rejection_reason_is_reported() {
        let router = router_from_env(&[]);
        for (payload, code) in rejected_payloads() {
            let (status, body) = get_me(&router, &payload).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "payload for {code}");
            assert_eq!(body["reason"], code);
        }
    }

    #[tokio::test]
    async fn test_hidden_reasons() {
        let router = router_from_env(&[("SPOK_EXPOSE_AUTH_REASONS", "false")]);
        for (payload, code) in rejected_payloads() {
            let (status, body) = get_me(&router, &payload).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "payload for {code}");
            assert_eq!(body["reason"], "unauthorized");
        }
    }

    #[tokio::test]
    async fn test_custom_max_age_from_env() {
        let router = router_from_env(&[("SPOK_AUTH_MAX_AGE", "5m")]);
        let (status, _) = get_me(&router, &signed_init_data(5, now() - 120)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = get_me(&router, &signed_init_data(5, now() - 600)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["reason"], "auth_date_expired");
    }

    #[tokio::test]
    async fn test_transport_order() {
        let router = router_from_env(&[]);
        let good = signed_init_data(9, now());
        let encoded: String = url::form_urlencoded::byte_serialize(good.as_bytes()).collect();

        // Authorization header alone
        let req = Request::builder()
            .uri("/api/me")
            .header("authorization", format!("tma {good}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Query alone
        let req = Request::builder()
            .uri(format!("/api/me?initData={encoded}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // A bad header wins over a good query
        let req = Request::builder()
            .uri(format!("/api/me?initData={encoded}"))
            .header("x-telegram-init-data", "auth_date=1&hash=00")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    proptest! {
        #[test]
        fn prop_signed_payload_verifies_for_any_user(
            id in any::<i64>().prop_filter("non-zero", |id| *id != 0),
            age in 0i64..=86_400,
        ) {
            let now = 1_800_000_000;
            let token = BotToken::new(TEST_TOKEN).unwrap();
            let principal = verify_at(&signed_init_data(id, now - age), &token, now, 86_400).unwrap();
            prop_assert_eq!(principal.user_id(), id);
            prop_assert_eq!(principal.auth_date, now - age);
        }

        #[test]
        fn prop_wrong_token_never_verifies(suffix in "[A-Za-z0-9_-]{1,16}") {
            let token = BotToken::new(format!("{TEST_TOKEN}{suffix}")).unwrap();
            let now = 1_800_000_000;
            let result = verify_at(&signed_init_data(1, now), &token, now, 86_400);
            prop_assert_eq!(result, Err(InitDataError::HashMismatch));
        }
    }
}
