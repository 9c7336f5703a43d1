use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use shared::{LogRequest, LogResponse, ResponseRecord};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::domain::ResponseService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub response_service: ResponseService,
}

impl AppState {
    pub fn new(response_service: ResponseService) -> Self {
        Self { response_service }
    }
}

/// API routes, without CORS or static file serving
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/responses", post(insert_response))
        .route("/logs", post(log_message))
        .with_state(state)
}

/// Full application: API under /api, the built frontend everywhere else
pub fn app(state: AppState, allowed_origin: &str, frontend_dist: &str) -> anyhow::Result<Router> {
    let origin = allowed_origin.parse::<HeaderValue>()?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", api_router(state))
        .fallback_service(ServeDir::new(PathBuf::from(frontend_dist)))
        .layer(cors))
}

/// Axum handler function for POST /api/responses
pub async fn insert_response(
    State(state): State<AppState>,
    Json(record): Json<ResponseRecord>,
) -> impl IntoResponse {
    info!("POST /api/responses - period: {}", record.period);

    match state.response_service.record_response(record).await {
        Ok(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Err(e) => {
            error!("Error storing response: {:?}", e);
            e.into_response()
        }
    }
}

/// Axum handler function for POST /api/logs
pub async fn log_message(Json(request): Json<LogRequest>) -> Json<LogResponse> {
    let component = request.component.as_deref().unwrap_or("frontend");
    let message = format!("[{}] {}", component, request.message);

    match request.level.to_lowercase().as_str() {
        "debug" => debug!("{}", message),
        "warn" => warn!("{}", message),
        "error" => error!("{}", message),
        _ => info!("{}", message),
    }

    Json(LogResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use axum::body::Body;
    use axum::http::Request;
    use shared::InsertResponseResult;
    use tower::ServiceExt;

    async fn setup_test_router() -> (Router, DbConnection) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let state = AppState::new(ResponseService::new(db.clone()));
        (api_router(state), db)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_response_returns_created() {
        let (router, db) = setup_test_router().await;

        let body = serde_json::json!({
            "year": "2025",
            "innovation": 0.3,
            "equality": 0.3,
            "stability": 0.4
        });
        let response = router.oneshot(post_json("/responses", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let result: InsertResponseResult = serde_json::from_slice(&bytes).unwrap();
        let stored = db.get_response(&result.id).await.unwrap().unwrap();
        assert_eq!(stored.record.period, "2025");
        assert_eq!(stored.record.stability, 0.4);
    }

    #[tokio::test]
    async fn test_insert_invalid_response_is_bad_request() {
        let (router, db) = setup_test_router().await;

        let body = serde_json::json!({
            "year": "2025",
            "innovation": 0.9,
            "equality": 0.9,
            "stability": 0.4
        });
        let response = router.oneshot(post_json("/responses", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(db.count_responses("2025").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (router, _db) = setup_test_router().await;

        let body = serde_json::json!({ "year": "2025" });
        let response = router.oneshot(post_json("/responses", body)).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_log_message_acknowledges() {
        let (router, _db) = setup_test_router().await;

        let body = serde_json::json!({
            "level": "error",
            "message": "insert failed",
            "component": "ternary_input"
        });
        let response = router.oneshot(post_json("/logs", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let ack: LogResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_app_rejects_bad_origin() {
        let db = DbConnection::init_test().await.unwrap();
        let state = AppState::new(ResponseService::new(db));
        assert!(app(state.clone(), "http://localhost:8080", "dist").is_ok());
        assert!(app(state, "not a\nheader", "dist").is_err());
    }
}
