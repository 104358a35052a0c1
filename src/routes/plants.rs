use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::view;
use crate::Dashboard;

// ---

pub fn router() -> Router<Dashboard> {
    // ---
    Router::new()
        .route("/api/plants", get(list))
        .route("/api/plants/{id}", get(detail))
        .route("/api/plants/{id}/image", put(replace_image))
}

async fn list(State(dashboard): State<Dashboard>) -> impl IntoResponse {
    // ---
    let store = dashboard.store().read().await;
    Json(view::cards(&store))
}

async fn detail(Path(id): Path<u32>, State(dashboard): State<Dashboard>) -> impl IntoResponse {
    // ---
    let store = dashboard.store().read().await;
    match store.get(id) {
        Some(plant) => (StatusCode::OK, Json(view::detail(plant))).into_response(),
        None => {
            debug!("GET /api/plants/{} - not found", id);
            (StatusCode::NOT_FOUND, Json("Plant not found")).into_response()
        }
    }
}

/// Body of `PUT /api/plants/{id}/image`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageUpdate {
    image_url: String,
}

async fn replace_image(
    Path(id): Path<u32>,
    State(dashboard): State<Dashboard>,
    Json(update): Json<ImageUpdate>,
) -> impl IntoResponse {
    // ---
    if update.image_url.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json("imageUrl must not be empty")).into_response();
    }

    let mut store = dashboard.store().write().await;
    match store.replace_image(id, update.image_url) {
        Some(plant) => {
            info!("Image updated for plant {}", id);
            (StatusCode::OK, Json(view::card(plant))).into_response()
        }
        None => {
            debug!("PUT /api/plants/{}/image - not found", id);
            (StatusCode::NOT_FOUND, Json("Plant not found")).into_response()
        }
    }
}
