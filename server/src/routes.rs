//! HTTP routes

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::error::ServiceError;
use crate::service::ComputeService;

pub const SERVICE_NAME: &str = "waveguide-server";

pub const ENDPOINTS: [&str; 3] = ["/api/health", "/api/compute", "/api/dispersion"];

const X_CACHE: &str = "x-cache";

pub struct AppState {
    pub service: ComputeService,
}

/// OPTIONS on any route is answered by the CORS layer with an empty 200
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/compute", post(compute).fallback(method_not_allowed))
        .route("/api/dispersion", post(dispersion).fallback(method_not_allowed))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn compute(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ServiceError> {
    let outcome = state.service.handle(&body).await.inspect_err(|e| {
        if matches!(e, ServiceError::Compute(_)) {
            warn!("compute request failed: {}", e);
        }
    })?;

    Ok((
        [(X_CACHE, outcome.cache_status.as_header())],
        Json(outcome.response),
    )
        .into_response())
}

async fn dispersion(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ServiceError> {
    let info = state.service.dispersion(&body)?;
    Ok(Json(info).into_response())
}

async fn method_not_allowed() -> ServiceError {
    ServiceError::MethodNotAllowed
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: [&'static str; 3],
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, FingerprintCache};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        let cache = Arc::new(FingerprintCache::new(CacheConfig::default()));
        Arc::new(AppState {
            service: ComputeService::new(cache, 500),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    const TE10_BODY: &str = r#"{"mode":"te10","frequency":10,"amplitude":1,"waveguideWidth":2,"waveguideHeight":1,"time":0,"gridSize":4}"#;

    #[tokio::test]
    async fn test_compute_miss_then_hit_header() {
        let app = router(state());

        let response = send(&app, Method::POST, "/api/compute", TE10_BODY).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-cache"], "MISS");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = json_body(response).await;
        assert_eq!(body["cached"], false);
        assert_eq!(body["fieldData"].as_array().unwrap().len(), 4);
        assert_eq!(body["params"]["waveguideWidth"], 2.0);
        assert!(body["timestamp"].as_i64().unwrap() > 0);

        let response = send(&app, Method::POST, "/api/compute", TE10_BODY).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-cache"], "HIT");
        assert_eq!(json_body(response).await["cached"], true);
    }

    #[tokio::test]
    async fn test_evanescent_cells_are_null() {
        let app = router(state());
        let body = r#"{"mode":"te","frequency":5,"amplitude":1,"waveguideWidth":2,"waveguideHeight":1,"time":0,"gridSize":3}"#;
        let response = send(&app, Method::POST, "/api/compute", body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let rows = body["fieldData"].as_array().unwrap();
        assert!(rows.iter().flat_map(|r| r.as_array().unwrap()).all(Value::is_null));
        assert_eq!(body["dispersion"]["guidedWavelengthCm"], "infinite");
    }

    #[tokio::test]
    async fn test_bad_request_shape() {
        let app = router(state());
        let response = send(&app, Method::POST, "/api/compute", r#"{"mode":"te10"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid parameters");
        assert!(body["message"].as_str().unwrap().contains("missing field"));

        let response = send(&app, Method::POST, "/api/compute", "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        let app = router(state());
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            for uri in ["/api/compute", "/api/dispersion"] {
                let response = send(&app, method.clone(), uri, "").await;
                assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
                let body = json_body(response).await;
                assert!(body["error"].is_string());
                assert!(body.get("message").is_none());
            }
        }
    }

    #[tokio::test]
    async fn test_options_is_empty_cors_response() {
        let app = router(state());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/compute")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(body_bytes(response).await.is_empty());

        // Plain OPTIONS without preflight headers
        let response = send(&app, Method::OPTIONS, "/api/compute", "").await;
        assert!(response.status().is_success());
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(state());
        let response = send(&app, Method::GET, "/api/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert!(body["endpoints"].as_array().unwrap().iter().any(|e| *e == "/api/compute"));
    }

    #[tokio::test]
    async fn test_dispersion_endpoint() {
        let app = router(state());
        let body = r#"{"mode":"tem","frequency":3,"waveguideWidth":2,"waveguideHeight":1}"#;
        let response = send(&app, Method::POST, "/api/dispersion", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["cutoffFrequencyGhz"], 0.0);
        assert_eq!(body["propagating"], true);
    }
}
