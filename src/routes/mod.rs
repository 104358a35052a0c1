//! Route gateway for the dashboard API.
//!
//! Each sibling module exports a subrouter; this gateway merges them and
//! attaches the shared [`Dashboard`] so `main.rs` never needs to know about
//! individual endpoints.

use axum::Router;

use crate::Dashboard;

mod dashboard;
mod health;
mod plants;
mod wifi;

// ---

pub fn router(state: Dashboard) -> Router {
    // ---
    Router::new()
        .merge(dashboard::router())
        .merge(plants::router())
        .merge(wifi::router())
        .merge(health::router())
        .with_state(state)
}
