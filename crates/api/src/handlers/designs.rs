//! Handlers for the design catalogue.
//!
//! Public endpoints list and fetch designs for browsing; authoring is
//! admin-only. Document payloads are validated structurally before every
//! write, never re-validated on read.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use kawepla_core::design::{
    validate_editor_version, validate_styles, validate_template, validate_variables,
};
use kawepla_core::error::CoreError;
use kawepla_core::subscription::{can_access_design, SubscriptionTier};
use kawepla_core::types::DbId;
use kawepla_db::models::design::{CreateDesign, Design, DesignFilter, UpdateDesign};
use kawepla_db::repositories::{DesignRepo, UserRepo};
use kawepla_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Listing filters. `tags` is a comma-separated list; a design matches when
/// its tag set shares at least one tag with the requested set.
#[derive(Debug, Default, Deserialize)]
pub struct DesignListQuery {
    pub category: Option<String>,
    pub tags: Option<String>,
    /// Honored only on the admin listing route.
    #[serde(default)]
    pub include_inactive: bool,
}

impl DesignListQuery {
    fn filter(&self) -> DesignFilter {
        DesignFilter {
            category: self.category.clone(),
            tags: self.tags.as_ref().map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation glue
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateDesign) -> Result<(), CoreError> {
    validate_template(&input.template)?;
    validate_styles(&input.styles)?;
    validate_variables(&input.variables)?;
    if let Some(tag) = &input.editor_version {
        validate_editor_version(tag)?;
    }
    Ok(())
}

/// Re-validate only the fields supplied in a patch.
fn validate_patch(input: &UpdateDesign) -> Result<(), CoreError> {
    if let Some(template) = &input.template {
        validate_template(template)?;
    }
    if let Some(styles) = &input.styles {
        validate_styles(styles)?;
    }
    if let Some(variables) = &input.variables {
        validate_variables(variables)?;
    }
    if let Some(tag) = &input.editor_version {
        validate_editor_version(tag)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Access policy glue
// ---------------------------------------------------------------------------

/// Decide whether `user_id` may use `design`, re-reading subscription state.
///
/// Evaluated fresh on every call; the decision is never cached because
/// subscription state changes independently.
pub(crate) async fn user_can_access_design(
    pool: &DbPool,
    user_id: DbId,
    design: &Design,
) -> Result<bool, AppError> {
    if !design.is_premium {
        return Ok(true);
    }
    let subscription = UserRepo::find_by_id(pool, user_id).await?.and_then(|user| {
        // An unknown tier string denies rather than erroring.
        SubscriptionTier::from_str(&user.subscription_tier)
            .map(|tier| (tier, user.subscription_end_date))
    });
    Ok(can_access_design(design.is_premium, subscription, Utc::now()))
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/designs
///
/// List active designs newest-first, optionally filtered by category/tags.
pub async fn list_designs(
    State(state): State<AppState>,
    Query(query): Query<DesignListQuery>,
) -> AppResult<impl IntoResponse> {
    let designs = DesignRepo::list(&state.pool, false, &query.filter()).await?;
    Ok(Json(DataResponse { data: designs }))
}

/// GET /api/v1/designs/{id}
pub async fn get_design(
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let design = DesignRepo::find_by_id(&state.pool, design_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id,
        }))?;

    Ok(Json(DataResponse { data: design }))
}

/// GET /api/v1/designs/{id}/access
///
/// Whether the calling user may use this design. A missing design denies
/// rather than erroring; absence is a normal outcome here.
pub async fn check_design_access(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let allowed = match DesignRepo::find_by_id(&state.pool, design_id).await? {
        Some(design) => user_can_access_design(&state.pool, user.user_id, &design).await?,
        None => false,
    };

    Ok(Json(DataResponse {
        data: serde_json::json!({ "allowed": allowed }),
    }))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/designs
///
/// Listing including inactive designs when `?include_inactive=true`.
pub async fn admin_list_designs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<DesignListQuery>,
) -> AppResult<impl IntoResponse> {
    let designs =
        DesignRepo::list(&state.pool, query.include_inactive, &query.filter()).await?;
    Ok(Json(DataResponse { data: designs }))
}

/// POST /api/v1/admin/designs
pub async fn create_design(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDesign>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let design = DesignRepo::create(&state.pool, admin.user_id, &input).await?;

    tracing::info!(
        design_id = design.id,
        name = %design.name,
        user_id = admin.user_id,
        "Design created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: design })))
}

/// PUT /api/v1/admin/designs/{id}
///
/// Partial update; only supplied fields are re-validated and applied.
pub async fn update_design(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
    Json(input): Json<UpdateDesign>,
) -> AppResult<impl IntoResponse> {
    validate_patch(&input)?;

    let design = DesignRepo::update(&state.pool, design_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id,
        }))?;

    tracing::info!(design_id, user_id = admin.user_id, "Design updated",);

    Ok(Json(DataResponse { data: design }))
}

/// DELETE /api/v1/admin/designs/{id}
///
/// Delete-or-archive: designs referenced by invitations are soft-deleted,
/// unreferenced designs are removed. The outcome is reported so the
/// authoring UI can tell the admin which one happened.
pub async fn delete_design(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(design_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = DesignRepo::delete_or_archive(&state.pool, design_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id,
        }))?;

    tracing::info!(
        design_id,
        user_id = admin.user_id,
        outcome = outcome.as_str(),
        "Design deleted",
    );

    Ok(Json(DataResponse {
        data: serde_json::json!({ "outcome": outcome }),
    }))
}
