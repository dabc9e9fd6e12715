//! Style rule types, the shared defaults table, and tolerant value parsing.
//!
//! Both the template renderer and the legacy-to-canvas adapter consume
//! `styles.components`; they must agree on fallback values, so every default
//! lives in the [`defaults`] module and nowhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single CSS-like rule: property name to value.
///
/// Ordered so that flattening a rule into CSS text is deterministic.
pub type StyleRule = BTreeMap<String, String>;

/// Keyframe stops of one animation: stop (`"0%"`, `"100%"`, `"from"`...) to rule.
pub type Keyframes = BTreeMap<String, StyleRule>;

/// The structured style document of a design.
///
/// `base` holds selector-level rules applied to the whole invitation.
/// `components` groups rules per component key; the `positionable-elements`
/// component stores per-element absolute positioning for legacy designs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDoc {
    pub base: BTreeMap<String, StyleRule>,
    pub components: BTreeMap<String, BTreeMap<String, StyleRule>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub animations: BTreeMap<String, Keyframes>,
}

impl StyleDoc {
    /// Parse a stored style document.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Validation(format!("Malformed styles document: {e}")))
    }
}

/* --------------------------------------------------------------------------
Style defaults
-------------------------------------------------------------------------- */

/// Fallback values applied when a style property is missing or malformed.
pub mod defaults {
    pub const FONT_FAMILY: &str = "Montserrat, sans-serif";
    pub const FILL_COLOR: &str = "#000000";
    pub const TEXT_ALIGN: &str = "center";
    pub const FONT_WEIGHT: &str = "normal";
    pub const FONT_STYLE: &str = "normal";
    pub const LINE_HEIGHT: f64 = 1.5;
    pub const CHAR_SPACING: f64 = 0.0;
    pub const OPACITY: f64 = 1.0;
    pub const FONT_SIZE_PX: f64 = 16.0;
    pub const ELEMENT_WIDTH_PX: f64 = 200.0;
}

/* --------------------------------------------------------------------------
Tolerant value parsing
-------------------------------------------------------------------------- */

/// Parse a plain number, rejecting NaN and infinities.
///
/// Returns `None` on malformed input so the caller can fall back to a default.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a pixel value (`"24px"` or bare `"24"`).
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    parse_number(trimmed.strip_suffix("px").unwrap_or(trimmed))
}

/// Convert a percentage value (`"50%"`) into pixels against `dimension`.
///
/// Absolute pixel values (`"120px"`, `"120"`) pass through unconverted so a
/// mixed legacy document still positions sensibly.
pub fn percent_to_px(value: &str, dimension: f64) -> Option<f64> {
    let trimmed = value.trim();
    match trimmed.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|p| p / 100.0 * dimension),
        None => parse_px(trimmed),
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_number ---------------------------------------------------------

    #[test]
    fn number_parses_plain_values() {
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number(" 0 "), Some(0.0));
    }

    #[test]
    fn number_rejects_malformed_and_non_finite() {
        assert_eq!(parse_number("bold"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    // -- parse_px -------------------------------------------------------------

    #[test]
    fn px_parses_with_and_without_suffix() {
        assert_eq!(parse_px("24px"), Some(24.0));
        assert_eq!(parse_px("24"), Some(24.0));
        assert_eq!(parse_px(" 12.5px "), Some(12.5));
    }

    #[test]
    fn px_rejects_malformed_values() {
        assert_eq!(parse_px("large"), None);
        assert_eq!(parse_px("px"), None);
    }

    // -- percent_to_px --------------------------------------------------------

    #[test]
    fn percent_converts_against_dimension() {
        assert_eq!(percent_to_px("50%", 794.0), Some(397.0));
        assert_eq!(percent_to_px("100%", 1123.0), Some(1123.0));
        assert_eq!(percent_to_px("0%", 794.0), Some(0.0));
    }

    #[test]
    fn absolute_pixels_pass_through() {
        assert_eq!(percent_to_px("120px", 794.0), Some(120.0));
        assert_eq!(percent_to_px("120", 794.0), Some(120.0));
    }

    #[test]
    fn malformed_position_yields_none() {
        assert_eq!(percent_to_px("half", 794.0), None);
        assert_eq!(percent_to_px("%", 794.0), None);
    }

    // -- StyleDoc parsing -----------------------------------------------------

    #[test]
    fn style_doc_parses_base_and_components() {
        let doc = StyleDoc::from_value(&serde_json::json!({
            "base": { ".invitation": { "color": "#333333" } },
            "components": {
                "positionable-elements": {
                    ".element-title": { "left": "50%", "top": "10%" }
                }
            }
        }))
        .unwrap();

        assert_eq!(doc.base[".invitation"]["color"], "#333333");
        assert_eq!(
            doc.components["positionable-elements"][".element-title"]["left"],
            "50%"
        );
        assert!(doc.animations.is_empty());
    }

    #[test]
    fn style_doc_rejects_non_object() {
        assert!(StyleDoc::from_value(&serde_json::json!("css")).is_err());
    }
}
