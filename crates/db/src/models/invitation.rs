//! Invitation model and DTOs.
//!
//! Invitations carry the per-event data used as the render context when a
//! design is filled in, and are the reverse-lookup target that turns a design
//! delete into an archive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kawepla_core::render::RenderContext;
use kawepla_core::types::{DbId, Timestamp};

/// A row from the `invitations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invitation {
    pub id: DbId,
    pub design_id: DbId,
    pub owner_id: DbId,
    pub couple_name: String,
    pub event_date: Option<NaiveDate>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invitation {
    /// Build the flat data context fed into the template renderer.
    ///
    /// Keys match the placeholder names used by stored templates. Absent
    /// fields are simply omitted; the renderer substitutes missing keys with
    /// the empty string.
    pub fn render_context(&self) -> RenderContext {
        let mut ctx = RenderContext::new();
        ctx.insert("coupleName".to_string(), self.couple_name.clone());
        if let Some(date) = self.event_date {
            ctx.insert("date".to_string(), date.format("%d/%m/%Y").to_string());
        }
        if let Some(venue) = &self.venue_name {
            ctx.insert("venue".to_string(), venue.clone());
        }
        if let Some(address) = &self.venue_address {
            ctx.insert("venueAddress".to_string(), address.clone());
        }
        if let Some(message) = &self.message {
            ctx.insert("message".to_string(), message.clone());
        }
        ctx
    }
}

/// DTO for creating a new invitation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvitation {
    pub design_id: DbId,
    pub couple_name: String,
    pub event_date: Option<NaiveDate>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub message: Option<String>,
}
