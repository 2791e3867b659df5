mod stores;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use shopdex_places::{GooglePlacesClient, PlacesError};
use shopdex_search::{SearchError, SearchPlanner};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub planner: Arc<SearchPlanner<GooglePlacesClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translate a planner failure into the wire error envelope.
///
/// Gateway failures surface as 502 so callers can distinguish a retryable
/// provider outage from a local fault.
pub(super) fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::NotFound => ApiError::new(request_id, "not_found", "store not found"),
        SearchError::Upstream(PlacesError::Disabled) => ApiError::new(
            request_id,
            "upstream_unavailable",
            "the places provider is not configured",
        ),
        SearchError::Upstream(e) => {
            tracing::warn!(error = %e, "places provider request failed");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                "the places provider is unavailable",
            )
        }
        SearchError::Page(e) => ApiError::new(request_id, "bad_request", e.to_string()),
        SearchError::Db(e) => {
            tracing::error!(error = %e, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stores/search", get(stores::search_stores))
        .route("/api/stores/compare", get(stores::compare_stores))
        .route("/api/stores", post(stores::create_store))
        .route("/api/stores/{id}", get(stores::get_store))
        .route(
            "/api/stores/place/{place_id}",
            get(stores::get_store_by_place_id),
        )
        .route(
            "/api/stores/place/{place_id}/sync",
            post(stores::sync_store_details),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match shopdex_db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
