//! User model and DTOs.
//!
//! Authentication and token issuance live in the account service; this layer
//! only needs the subscription state consumed by the design access policy.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kawepla_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub subscription_tier: String,
    pub subscription_end_date: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub role: Option<String>,
    pub subscription_tier: Option<String>,
    pub subscription_end_date: Option<Timestamp>,
}
