//! Axum router configuration with middleware.
//!
//! Routes: `POST /api/{tool}` and `GET /health`. Middleware: tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/{tool}", post(handlers::tool::call_tool))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use prism_infra::sqlite::pool::DatabasePool;
    use prism_types::config::PrismConfig;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_state(config: PrismConfig) -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("test.db")).await.unwrap();
        let data_dir = dir.path().to_path_buf();
        std::mem::forget(dir);
        AppState::from_parts(config, data_dir, pool)
    }

    async fn post_tool(router: &Router, tool: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(
                Request::post(format!("/api/{tool}"))
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn call(parameters: Value, phone: Option<&str>) -> Value {
        let mut body = json!({ "message": { "functionCall": { "parameters": parameters } } });
        if let Some(phone) = phone {
            body["call"] = json!({ "customer": { "phoneNumber": phone } });
        }
        body
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_store_and_retrieve_over_http() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let (status, body) = post_tool(
            &router,
            "memory_manager",
            call(
                json!({
                    "action": "store",
                    "memory_type": "user_preference",
                    "content": {"topic": "coffee", "emotion": "happy"}
                }),
                Some("+15550100"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["status"], "stored");

        let (_, body) = post_tool(
            &router,
            "memory_manager",
            call(
                json!({"action": "retrieve", "memory_type": "user_preference"}),
                Some("+15550100"),
            ),
        )
        .await;
        let memories = body["result"]["memories"].as_array().unwrap();
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0]["topic"], "coffee");

        let (_, body) = post_tool(
            &router,
            "memory_manager",
            call(
                json!({"action": "retrieve", "memory_type": "user_preference"}),
                Some("+15550199"),
            ),
        )
        .await;
        assert!(body["result"]["memories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_action_is_ok() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let (status, body) =
            post_tool(&router, "goal_tracker", call(json!({"action": "bogus"}), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["error"], "Unknown action: bogus");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let (status, body) =
            post_tool(&router, "weather", call(json!({"action": "get"}), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown tool: 'weather'");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let (status, body) = post_tool(
            &router,
            "identity_tracker",
            call(json!({"action": "update_trait"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing field: trait");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let response = router
            .oneshot(
                Request::post("/api/thought_logger")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_caller_refused_without_fallback() {
        let config = PrismConfig {
            fallback_user_id: String::new(),
            ..PrismConfig::default()
        };
        let router = build_router(test_state(config).await);

        let (status, body) = post_tool(
            &router,
            "emotion_analyzer",
            call(json!({"action": "get_emotional_history"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing caller identity");
    }

    #[tokio::test]
    async fn test_reserved_system_caller_is_bad_request() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let (status, body) = post_tool(
            &router,
            "memory_manager",
            call(
                json!({"action": "retrieve", "memory_type": "self_reflection"}),
                Some("system"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid field caller: 'system' is a reserved identity");
    }

    #[tokio::test]
    async fn test_goal_progress_round_trip() {
        let router = build_router(test_state(PrismConfig::default()).await);

        let (_, body) = post_tool(
            &router,
            "goal_tracker",
            call(
                json!({
                    "action": "set_goal",
                    "goal_type": "fitness",
                    "goal_data": {"title": "Run 5k", "target_date": "2025-09-01"}
                }),
                Some("u1"),
            ),
        )
        .await;
        let goal_id = body["result"]["goal_id"].as_i64().unwrap();

        let (status, body) = post_tool(
            &router,
            "goal_tracker",
            call(
                json!({
                    "action": "update_progress",
                    "goal_id": goal_id,
                    "progress_update": {"progress": 60}
                }),
                Some("u1"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["progress"], 60);
        assert_eq!(body["result"]["goal_status"], "active");

        let (_, body) =
            post_tool(&router, "goal_tracker", call(json!({"action": "get_goals"}), Some("u1"))).await;
        let goals = body["result"]["active_goals"].as_array().unwrap();
        assert_eq!(goals[0]["progress"], 60);
        assert_eq!(goals[0]["target_date"], "2025-09-01");

        let (status, _) = post_tool(
            &router,
            "goal_tracker",
            call(
                json!({"action": "update_progress", "goal_id": goal_id + 1, "progress_update": {"progress": 5}}),
                Some("u1"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
