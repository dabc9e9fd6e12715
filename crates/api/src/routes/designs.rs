//! Route definitions for the design catalogue.
//!
//! Two routers are provided:
//! - `public_router()` for browsing, preview, rendering, and editor loading,
//!   mounted at `/designs`
//! - `admin_router()` for design authoring, mounted at `/admin/designs`

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{designs, preview};
use crate::state::AppState;

/// Public design routes mounted at `/designs`.
///
/// ```text
/// GET  /                      -> list_designs
/// GET  /{id}                  -> get_design
/// GET  /{id}/preview          -> preview_design
/// POST /{id}/render           -> render_design
/// GET  /{id}/editor-document  -> editor_document
/// GET  /{id}/access           -> check_design_access
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(designs::list_designs))
        .route("/{id}", get(designs::get_design))
        .route("/{id}/preview", get(preview::preview_design))
        .route("/{id}/render", post(preview::render_design))
        .route("/{id}/editor-document", get(preview::editor_document))
        .route("/{id}/access", get(designs::check_design_access))
}

/// Admin design authoring routes mounted at `/admin/designs`.
///
/// ```text
/// GET    /      -> admin_list_designs
/// POST   /      -> create_design
/// PUT    /{id}  -> update_design
/// DELETE /{id}  -> delete_design
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(designs::admin_list_designs).post(designs::create_design),
        )
        .route(
            "/{id}",
            axum::routing::put(designs::update_design).delete(designs::delete_design),
        )
}
