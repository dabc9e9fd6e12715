//! Design document types, write-boundary validation, and editor classification.
//!
//! A design stores its visual definition as structured JSON columns
//! (`template`, `styles`, `variables`, plus the optional canvas-editor
//! `fabricData` and legacy `textMappings`). The shapes are validated here once
//! at write time; reads parse defensively instead of re-validating.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::style::StyleDoc;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Default canvas width in pixels (A4 portrait at 96 DPI).
pub const DEFAULT_CANVAS_WIDTH: f64 = 794.0;

/// Default canvas height in pixels (A4 portrait at 96 DPI).
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1123.0;

/// Component key under which legacy designs store per-element positioning.
pub const POSITIONABLE_COMPONENT_KEY: &str = "positionable-elements";

/// Selector prefix for positionable elements: `.element-<elementId>`.
pub const ELEMENT_SELECTOR_PREFIX: &str = ".element-";

/// Version assigned to newly created designs.
pub const INITIAL_VERSION: &str = "1.0.0";

/* --------------------------------------------------------------------------
Editor kind
-------------------------------------------------------------------------- */

/// Which editor family produced a design's stored representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    /// Template/styles driven, positioned via `positionable-elements`.
    Legacy,
    /// Authored in the WYSIWYG canvas editor; `fabricData` is authoritative.
    Canvas,
}

impl EditorKind {
    /// Return the kind name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Canvas => "canvas",
        }
    }

    /// Parse a kind string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "legacy" => Some(Self::Legacy),
            "canvas" => Some(Self::Canvas),
            _ => None,
        }
    }

    /// All valid kind values.
    pub const ALL: &'static [&'static str] = &["legacy", "canvas"];
}

impl std::fmt::Display for EditorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------------------------------------------------
Typed sub-documents
-------------------------------------------------------------------------- */

/// One template section: placeholder HTML plus its position in the layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSection {
    pub html: String,
    #[serde(default)]
    pub position: String,
}

/// The structural skeleton of a design: layout id plus named sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDoc {
    pub layout: String,
    pub sections: BTreeMap<String, TemplateSection>,
}

impl TemplateDoc {
    /// Parse a stored template document.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Validation(format!("Malformed template document: {e}")))
    }
}

/// Theme tokens of a design. Presence of the three groups is required;
/// their internal shape is free-form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeDoc {
    pub colors: Value,
    pub typography: Value,
    pub spacing: Value,
}

/// Legacy binding from a positioned element to the invitation field it shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMapping {
    #[serde(default)]
    pub element_type: Option<String>,
    pub invitation_variable: String,
    #[serde(default)]
    pub fabric_object_id: Option<String>,
}

/* --------------------------------------------------------------------------
Write-boundary validation
-------------------------------------------------------------------------- */

fn field(value: &Value, name: &str) -> Option<Value> {
    value.get(name).cloned()
}

/// Validate a template document: `layout` must be a non-empty string and
/// `sections` must be present as an object.
pub fn validate_template(value: &Value) -> Result<(), CoreError> {
    if !value.is_object() {
        return Err(CoreError::Validation(
            "template must be an object".to_string(),
        ));
    }
    match field(value, "layout") {
        Some(Value::String(layout)) if !layout.is_empty() => {}
        _ => {
            return Err(CoreError::Validation(
                "template.layout must be a non-empty string".to_string(),
            ))
        }
    }
    match field(value, "sections") {
        Some(Value::Object(_)) => {}
        _ => {
            return Err(CoreError::Validation(
                "template.sections is required".to_string(),
            ))
        }
    }
    Ok(())
}

/// Validate a styles document: `base` and `components` must be present as
/// objects (possibly empty).
pub fn validate_styles(value: &Value) -> Result<(), CoreError> {
    if !value.is_object() {
        return Err(CoreError::Validation("styles must be an object".to_string()));
    }
    for key in ["base", "components"] {
        match field(value, key) {
            Some(Value::Object(_)) => {}
            _ => {
                return Err(CoreError::Validation(format!(
                    "styles.{key} is required"
                )))
            }
        }
    }
    Ok(())
}

/// Validate a variables document: `colors`, `typography`, and `spacing` must
/// all be present.
pub fn validate_variables(value: &Value) -> Result<(), CoreError> {
    if !value.is_object() {
        return Err(CoreError::Validation(
            "variables must be an object".to_string(),
        ));
    }
    for key in ["colors", "typography", "spacing"] {
        if field(value, key).is_none() {
            return Err(CoreError::Validation(format!(
                "variables.{key} is required"
            )));
        }
    }
    Ok(())
}

/// Validate that an editor version tag is recognised.
pub fn validate_editor_version(tag: &str) -> Result<(), CoreError> {
    if EditorKind::from_str(tag).is_some() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown editor version: '{}'. Valid values: {}",
            tag,
            EditorKind::ALL.join(", ")
        )))
    }
}

/* --------------------------------------------------------------------------
Version helper
-------------------------------------------------------------------------- */

/// Bump the patch component of a `MAJOR.MINOR.PATCH` version string.
///
/// Inputs that are not three dot-separated integers are returned unchanged.
/// Not called by the update path; retained for the authoring workflow.
pub fn increment_patch(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return version.to_string();
    }
    match (
        parts[0].parse::<u64>(),
        parts[1].parse::<u64>(),
        parts[2].parse::<u64>(),
    ) {
        (Ok(major), Ok(minor), Ok(patch)) => format!("{major}.{minor}.{}", patch + 1),
        _ => version.to_string(),
    }
}

/* --------------------------------------------------------------------------
Editor classification
-------------------------------------------------------------------------- */

/// The editing-relevant content of a design, independent of how it is stored.
#[derive(Debug, Clone)]
pub struct DesignContent {
    pub editor_version: EditorKind,
    /// Canvas-editor-native document; authoritative when present.
    pub fabric_data: Option<Value>,
    pub styles: StyleDoc,
    pub text_mappings: Option<BTreeMap<String, TextMapping>>,
    pub background_image: Option<String>,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

/// Closed classification of where a design's editable representation comes
/// from. The adapter branches by matching on this instead of repeating
/// presence checks.
#[derive(Debug)]
pub enum EditorSource<'a> {
    /// `fabricData` is present and passes through unchanged.
    CanvasNative(&'a Value),
    /// A legacy design whose canvas document must be reconstructed.
    Legacy {
        styles: &'a StyleDoc,
        text_mappings: &'a BTreeMap<String, TextMapping>,
        background_image: Option<&'a str>,
        canvas_width: f64,
        canvas_height: f64,
    },
}

impl DesignContent {
    /// Classify this design's editable source.
    ///
    /// Returns `None` when there is nothing to load: no canvas document and
    /// either a non-legacy editor version or no text mappings to reconstruct
    /// from.
    pub fn editor_source(&self) -> Option<EditorSource<'_>> {
        if let Some(doc) = &self.fabric_data {
            return Some(EditorSource::CanvasNative(doc));
        }
        match (self.editor_version, &self.text_mappings) {
            (EditorKind::Legacy, Some(mappings)) => Some(EditorSource::Legacy {
                styles: &self.styles,
                text_mappings: mappings,
                background_image: self.background_image.as_deref(),
                canvas_width: self.canvas_width,
                canvas_height: self.canvas_height,
            }),
            _ => None,
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
