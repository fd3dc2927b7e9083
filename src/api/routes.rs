//! Index and health routes.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::config::WELCOME_MESSAGE;
use crate::types::ApiResponse;

/// Index route
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses((status = 200, description = "Welcome message"))
)]
pub async fn index() -> ApiResponse<()> {
    ApiResponse::message(WELCOME_MESSAGE)
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "healthy")]
    pub database: String,
}

/// Health check with database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: "healthy".to_string(),
            }),
        ),
        Err(e) => {
            // The driver error stays in the log
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    database: "unhealthy".to_string(),
                }),
            )
        }
    }
}
