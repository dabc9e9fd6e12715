//! Design model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kawepla_core::design::{DesignContent, EditorKind};
use kawepla_core::style::StyleDoc;
use kawepla_core::types::{DbId, Timestamp};

/// A row from the `designs` table.
///
/// The `template`, `styles`, `variables`, `components`, `fabric_data`, and
/// `text_mappings` columns are JSONB payloads validated at write time; reads
/// parse them defensively via [`Design::content`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Design {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub is_premium: bool,
    pub price_cents: Option<i64>,
    pub version: String,
    pub template: serde_json::Value,
    pub styles: serde_json::Value,
    pub variables: serde_json::Value,
    pub components: Option<serde_json::Value>,
    pub fabric_data: Option<serde_json::Value>,
    pub editor_version: String,
    pub text_mappings: Option<serde_json::Value>,
    pub background_image: Option<String>,
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Design {
    /// Build the editing-relevant content of this design.
    ///
    /// Stored payloads that fail to parse degrade to their empty/absent forms
    /// rather than erroring; shape is enforced at write time only.
    pub fn content(&self) -> DesignContent {
        DesignContent {
            editor_version: EditorKind::from_str(&self.editor_version)
                .unwrap_or(EditorKind::Legacy),
            fabric_data: self.fabric_data.clone(),
            styles: StyleDoc::from_value(&self.styles).unwrap_or_default(),
            text_mappings: self
                .text_mappings
                .as_ref()
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            background_image: self.background_image.clone(),
            canvas_width: f64::from(self.canvas_width),
            canvas_height: f64::from(self.canvas_height),
        }
    }
}

/// DTO for creating a new design.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDesign {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
    pub price_cents: Option<i64>,
    pub template: serde_json::Value,
    pub styles: serde_json::Value,
    pub variables: serde_json::Value,
    pub components: Option<serde_json::Value>,
    pub fabric_data: Option<serde_json::Value>,
    pub editor_version: Option<String>,
    pub text_mappings: Option<serde_json::Value>,
    pub background_image: Option<String>,
    pub canvas_width: Option<i32>,
    pub canvas_height: Option<i32>,
}

/// DTO for updating an existing design. All fields are optional; only
/// supplied fields are re-validated and applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDesign {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_premium: Option<bool>,
    pub price_cents: Option<i64>,
    pub template: Option<serde_json::Value>,
    pub styles: Option<serde_json::Value>,
    pub variables: Option<serde_json::Value>,
    pub components: Option<serde_json::Value>,
    pub fabric_data: Option<serde_json::Value>,
    pub editor_version: Option<String>,
    pub text_mappings: Option<serde_json::Value>,
    pub background_image: Option<String>,
    pub canvas_width: Option<i32>,
    pub canvas_height: Option<i32>,
}

/// Listing filter: category equality and tag-set intersection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignFilter {
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Outcome of `DesignRepo::delete_or_archive`.
///
/// Designs referenced by at least one invitation are archived (soft-deleted)
/// instead of removed; callers must not assume deletion removes data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The row was removed; no invitation referenced it.
    Deleted,
    /// The row was kept with `is_active = false`; invitations reference it.
    Archived,
}

impl DeleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Archived => "archived",
        }
    }
}
