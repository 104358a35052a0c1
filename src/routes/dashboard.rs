use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::dashboard::DashboardView;
use crate::Dashboard;

// ---

pub fn router() -> Router<Dashboard> {
    // ---
    Router::new().route("/api/dashboard", get(handler))
}

/// Everything the dashboard page renders in one document.
async fn handler(State(dashboard): State<Dashboard>) -> Json<DashboardView> {
    // ---
    let view = dashboard.view().await;
    debug!(
        "GET /api/dashboard - mode {:?}, {} plants",
        view.mode,
        view.plants.len()
    );
    Json(view)
}
