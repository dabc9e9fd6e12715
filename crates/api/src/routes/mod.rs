//! Route registration for the API.

pub mod designs;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/designs", designs::public_router())
        .nest("/admin/designs", designs::admin_router())
}
