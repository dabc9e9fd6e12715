//! Canvas-editor documents and best-effort reconstruction of legacy designs.
//!
//! Designs authored in the canvas editor carry an authoritative `fabricData`
//! document that passes through unchanged. Older designs only store
//! percentage-positioned elements under `styles.components` plus text
//! mappings; for those, [`load_to_editable_document`] rebuilds an approximate
//! canvas document. The reconstruction is lossy: elements without a text
//! mapping are dropped, and output is not round-trip-safe with the original
//! visual design.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::design::{
    DesignContent, EditorSource, TextMapping, ELEMENT_SELECTOR_PREFIX,
    POSITIONABLE_COMPONENT_KEY,
};
use crate::style::{defaults, parse_number, parse_px, percent_to_px, StyleDoc, StyleRule};

/// Object kind used when a text mapping does not name one.
pub const DEFAULT_OBJECT_KIND: &str = "textbox";

/// Canvas background when the design has no background image.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/* --------------------------------------------------------------------------
Document types
-------------------------------------------------------------------------- */

/// One positioned text object on the canvas.
///
/// `text` always holds the placeholder form `{{variable}}`; the editor works
/// with placeholders, never live invitation data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub font_size: f64,
    pub font_family: String,
    pub fill: String,
    pub text_align: String,
    pub font_weight: String,
    pub font_style: String,
    pub line_height: f64,
    pub char_spacing: f64,
    pub opacity: f64,
    pub text: String,
    pub is_placeholder: bool,
}

/// A flat canvas document: geometry, background, and positioned objects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub objects: Vec<CanvasObject>,
}

/// The editable representation handed to the canvas editor.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EditorDocument {
    /// Canvas-native data passed through unchanged.
    Native(Value),
    /// Best-effort reconstruction from legacy styles and text mappings.
    Reconstructed(CanvasDocument),
}

/* --------------------------------------------------------------------------
Loading
-------------------------------------------------------------------------- */

/// Whether the editor has anything to load for this design.
///
/// Callers must check this before attempting to load, to distinguish
/// "nothing to show" from "go ahead and reconstruct".
pub fn can_load_in_editor(content: &DesignContent) -> bool {
    content.editor_source().is_some()
}

/// Load the editable document for a design: native pass-through, legacy
/// reconstruction, or `None` when neither applies.
pub fn load_to_editable_document(content: &DesignContent) -> Option<EditorDocument> {
    match content.editor_source()? {
        EditorSource::CanvasNative(doc) => Some(EditorDocument::Native(doc.clone())),
        EditorSource::Legacy {
            styles,
            text_mappings,
            background_image,
            canvas_width,
            canvas_height,
        } => Some(EditorDocument::Reconstructed(reconstruct_legacy(
            styles,
            text_mappings,
            background_image,
            canvas_width,
            canvas_height,
        ))),
    }
}

/* --------------------------------------------------------------------------
Legacy reconstruction
-------------------------------------------------------------------------- */

fn reconstruct_legacy(
    styles: &StyleDoc,
    text_mappings: &BTreeMap<String, TextMapping>,
    background_image: Option<&str>,
    canvas_width: f64,
    canvas_height: f64,
) -> CanvasDocument {
    let mut objects = Vec::new();

    if let Some(positioned) = styles.components.get(POSITIONABLE_COMPONENT_KEY) {
        for (selector, rule) in positioned {
            let Some(element_id) = selector.strip_prefix(ELEMENT_SELECTOR_PREFIX) else {
                continue;
            };
            // Positioned but unbound elements cannot be reconstructed; dropped.
            let Some(mapping) = text_mappings.get(element_id) else {
                continue;
            };
            objects.push(text_object_from_rule(
                objects.len(),
                rule,
                mapping,
                canvas_width,
                canvas_height,
            ));
        }
    }

    CanvasDocument {
        width: canvas_width,
        height: canvas_height,
        background: background_image.unwrap_or(DEFAULT_BACKGROUND).to_string(),
        objects,
    }
}

fn text_object_from_rule(
    index: usize,
    rule: &StyleRule,
    mapping: &TextMapping,
    canvas_width: f64,
    canvas_height: f64,
) -> CanvasObject {
    let get = |property: &str| rule.get(property).map(String::as_str);

    CanvasObject {
        id: mapping
            .fabric_object_id
            .clone()
            .unwrap_or_else(|| format!("legacy-object-{index}")),
        kind: mapping
            .element_type
            .clone()
            .unwrap_or_else(|| DEFAULT_OBJECT_KIND.to_string()),
        left: get("left")
            .and_then(|v| percent_to_px(v, canvas_width))
            .unwrap_or(0.0),
        top: get("top")
            .and_then(|v| percent_to_px(v, canvas_height))
            .unwrap_or(0.0),
        width: get("width")
            .and_then(|v| percent_to_px(v, canvas_width))
            .unwrap_or(defaults::ELEMENT_WIDTH_PX),
        font_size: get("font-size")
            .and_then(parse_px)
            .unwrap_or(defaults::FONT_SIZE_PX),
        font_family: get("font-family")
            .unwrap_or(defaults::FONT_FAMILY)
            .to_string(),
        fill: get("color").unwrap_or(defaults::FILL_COLOR).to_string(),
        text_align: get("text-align")
            .unwrap_or(defaults::TEXT_ALIGN)
            .to_string(),
        font_weight: get("font-weight")
            .unwrap_or(defaults::FONT_WEIGHT)
            .to_string(),
        font_style: get("font-style")
            .unwrap_or(defaults::FONT_STYLE)
            .to_string(),
        line_height: get("line-height")
            .and_then(parse_number)
            .unwrap_or(defaults::LINE_HEIGHT),
        char_spacing: get("letter-spacing")
            .and_then(parse_px)
            .unwrap_or(defaults::CHAR_SPACING),
        opacity: get("opacity")
            .and_then(parse_number)
            .unwrap_or(defaults::OPACITY),
        text: format!("{{{{{}}}}}", mapping.invitation_variable),
        is_placeholder: true,
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
