//! Repository for the `invitations` table.

use sqlx::PgPool;

use kawepla_core::types::DbId;

use crate::models::invitation::{CreateInvitation, Invitation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, design_id, owner_id, couple_name, event_date, \
     venue_name, venue_address, message, created_at, updated_at";

/// Provides CRUD operations for invitations.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Insert a new invitation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateInvitation,
    ) -> Result<Invitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO invitations \
                (design_id, owner_id, couple_name, event_date, venue_name, venue_address, message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(input.design_id)
            .bind(owner_id)
            .bind(&input.couple_name)
            .bind(input.event_date)
            .bind(&input.venue_name)
            .bind(&input.venue_address)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Find an invitation by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitations WHERE id = $1");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count invitations referencing a design (the delete-or-archive check).
    pub async fn count_for_design(pool: &PgPool, design_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM invitations WHERE design_id = $1")
                .bind(design_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
