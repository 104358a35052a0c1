use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::dashboard::{SetupError, ViewMode};
use crate::models::WifiCredentials;
use crate::Dashboard;

// ---

pub fn router() -> Router<Dashboard> {
    // ---
    Router::new()
        .route("/api/wifi", post(save))
        .route("/api/wifi/reset", post(reset))
}

/// Outcome of a setup request, phrased for a toast notification.
#[derive(Debug, Serialize)]
struct SetupResponse {
    success: bool,
    message: String,
    mode: ViewMode,
}

async fn save(
    State(dashboard): State<Dashboard>,
    Json(credentials): Json<WifiCredentials>,
) -> impl IntoResponse {
    // ---
    let result = dashboard.save_wifi(&credentials).await;
    let mode = dashboard.mode().await;

    let (status, message) = match result {
        Ok(_) => (StatusCode::OK, "Connected to WiFi successfully!".to_string()),
        Err(e @ SetupError::MissingFields) => (StatusCode::BAD_REQUEST, e.to_string()),
        Err(e @ SetupError::Rejected(_)) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Err(e @ SetupError::Device(_)) => {
            error!("Error connecting device to WiFi: {:?}", e);
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
    };

    let body = SetupResponse {
        success: status.is_success(),
        message,
        mode,
    };
    (status, Json(body))
}

async fn reset(State(dashboard): State<Dashboard>) -> impl IntoResponse {
    // ---
    dashboard.reset_wifi().await;
    Json(SetupResponse {
        success: true,
        message: "Returned to setup".to_string(),
        mode: dashboard.mode().await,
    })
}
