//! Handlers for rendering designs and loading them into the editor.
//!
//! Preview rendering is public (invitation previews are shown to anonymous
//! visitors) and must never fail for a stored design: malformed documents
//! degrade to a fallback block inside the renderer.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;

use kawepla_core::canvas::{can_load_in_editor, load_to_editable_document};
use kawepla_core::error::CoreError;
use kawepla_core::render::{render_value, RenderContext};
use kawepla_core::roles::ROLE_ADMIN;
use kawepla_core::types::DbId;
use kawepla_db::models::design::Design;
use kawepla_db::repositories::{DesignRepo, InvitationRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::designs::user_can_access_design;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Example data context used for public previews.
fn example_context() -> RenderContext {
    let pairs = [
        ("coupleName", "Camille & Jonas"),
        ("firstName", "Camille"),
        ("date", "12/06/2027"),
        ("venue", "Château de Beaulieu"),
        ("venueAddress", "2 allée des Tilleuls, 33000 Bordeaux"),
        ("message", "Nous serions honorés de vous compter parmi nous."),
    ];
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn find_design(state: &AppState, design_id: DbId) -> AppResult<Design> {
    DesignRepo::find_by_id(&state.pool, design_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id,
        }))
}

// ---------------------------------------------------------------------------
// Rendering endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/designs/{id}/preview
///
/// Render the design with example data. Public; returns a self-contained
/// HTML fragment.
pub async fn preview_design(
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let design = find_design(&state, design_id).await?;
    let html = render_value(&design.template, &design.styles, &example_context());
    Ok(Html(html))
}

/// Body of the render endpoint: an explicit data context, optionally
/// prefilled from a stored invitation.
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    pub invitation_id: Option<DbId>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

/// POST /api/v1/designs/{id}/render
///
/// Render the design with the caller's data context. When `invitation_id` is
/// given, the invitation's fields seed the context and explicit entries
/// override them; only the invitation's owner or an admin may use it.
pub async fn render_design(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
    Json(input): Json<RenderRequest>,
) -> AppResult<impl IntoResponse> {
    let design = find_design(&state, design_id).await?;

    let mut ctx = RenderContext::new();
    if let Some(invitation_id) = input.invitation_id {
        let invitation = InvitationRepo::find_by_id(&state.pool, invitation_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Invitation",
                id: invitation_id,
            }))?;
        if invitation.owner_id != user.user_id && user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Not the owner of this invitation".into(),
            )));
        }
        ctx = invitation.render_context();
    }
    ctx.extend(input.context);

    let html = render_value(&design.template, &design.styles, &ctx);
    Ok(Json(DataResponse {
        data: serde_json::json!({ "html": html }),
    }))
}

// ---------------------------------------------------------------------------
// Editor endpoint
// ---------------------------------------------------------------------------

/// GET /api/v1/designs/{id}/editor-document
///
/// The editable representation of a design: canvas-native data passes
/// through unchanged, legacy designs are reconstructed (lossy, placeholder
/// text only). 409 when the design has nothing the editor can load.
pub async fn editor_document(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let design = find_design(&state, design_id).await?;

    if !user_can_access_design(&state.pool, user.user_id, &design).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "An active premium subscription is required for this design".into(),
        )));
    }

    let content = design.content();
    if !can_load_in_editor(&content) {
        return Err(AppError::Core(CoreError::Conflict(
            "Design cannot be loaded in the editor".into(),
        )));
    }

    let document = load_to_editable_document(&content).ok_or_else(|| {
        AppError::InternalError("Editor document classification disagreed with load".into())
    })?;

    Ok(Json(DataResponse { data: document }))
}
