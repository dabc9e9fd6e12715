//! Repository for the `designs` table.

use sqlx::PgPool;

use kawepla_core::design::INITIAL_VERSION;
use kawepla_core::types::DbId;

use crate::models::design::{CreateDesign, DeleteOutcome, Design, DesignFilter, UpdateDesign};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, category, tags, is_active, is_premium, \
     price_cents, version, template, styles, variables, components, fabric_data, \
     editor_version, text_mappings, background_image, canvas_width, canvas_height, \
     created_by, created_at, updated_at";

/// Provides CRUD operations for designs.
pub struct DesignRepo;

impl DesignRepo {
    /// Insert a new design, returning the created row.
    ///
    /// Structural validation of the document payloads happens before this is
    /// called; the repository persists what it is given.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateDesign,
    ) -> Result<Design, sqlx::Error> {
        let query = format!(
            "INSERT INTO designs \
                (name, description, category, tags, is_premium, price_cents, version, \
                 template, styles, variables, components, fabric_data, editor_version, \
                 text_mappings, background_image, canvas_width, canvas_height, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                     COALESCE($13, 'legacy'), $14, $15, \
                     COALESCE($16, 794), COALESCE($17, 1123), $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.is_premium)
            .bind(input.price_cents)
            .bind(INITIAL_VERSION)
            .bind(&input.template)
            .bind(&input.styles)
            .bind(&input.variables)
            .bind(&input.components)
            .bind(&input.fabric_data)
            .bind(&input.editor_version)
            .bind(&input.text_mappings)
            .bind(&input.background_image)
            .bind(input.canvas_width)
            .bind(input.canvas_height)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a design by ID. Inactive designs are still returned: archived
    /// designs remain valid targets for invitations already using them.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Design>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1");
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List designs newest-first.
    ///
    /// `include_inactive = false` restricts to `is_active = true`. The tag
    /// filter matches when the design's tag set intersects the requested set
    /// (Postgres array overlap).
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
        filter: &DesignFilter,
    ) -> Result<Vec<Design>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM designs \
             WHERE ($1 OR is_active = true) \
               AND ($2::text IS NULL OR category = $2) \
               AND ($3::text[] IS NULL OR tags && $3) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(include_inactive)
            .bind(&filter.category)
            .bind(&filter.tags)
            .fetch_all(pool)
            .await
    }

    /// Update a design. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. The stored
    /// semantic version string is left untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDesign,
    ) -> Result<Option<Design>, sqlx::Error> {
        let query = format!(
            "UPDATE designs SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category), \
                tags = COALESCE($5, tags), \
                is_premium = COALESCE($6, is_premium), \
                price_cents = COALESCE($7, price_cents), \
                template = COALESCE($8, template), \
                styles = COALESCE($9, styles), \
                variables = COALESCE($10, variables), \
                components = COALESCE($11, components), \
                fabric_data = COALESCE($12, fabric_data), \
                editor_version = COALESCE($13, editor_version), \
                text_mappings = COALESCE($14, text_mappings), \
                background_image = COALESCE($15, background_image), \
                canvas_width = COALESCE($16, canvas_width), \
                canvas_height = COALESCE($17, canvas_height), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.is_premium)
            .bind(input.price_cents)
            .bind(&input.template)
            .bind(&input.styles)
            .bind(&input.variables)
            .bind(&input.components)
            .bind(&input.fabric_data)
            .bind(&input.editor_version)
            .bind(&input.text_mappings)
            .bind(&input.background_image)
            .bind(input.canvas_width)
            .bind(input.canvas_height)
            .fetch_optional(pool)
            .await
    }

    /// Delete a design, or archive it when invitations still reference it.
    ///
    /// The reference check and the write run in one transaction. The design
    /// row is locked `FOR UPDATE` first, so an invitation insert referencing
    /// it (which takes a key-share lock on the row) cannot slip in between
    /// the check and the delete.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete_or_archive(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DeleteOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM designs WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let (references,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM invitations WHERE design_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let outcome = if references > 0 {
            sqlx::query("UPDATE designs SET is_active = false, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::Archived
        } else {
            sqlx::query("DELETE FROM designs WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::Deleted
        };

        tx.commit().await?;

        tracing::debug!(design_id = id, outcome = outcome.as_str(), "Design removed");
        Ok(Some(outcome))
    }
}
