//! Template rendering: a design plus a flat data context produces a
//! self-contained HTML fragment.
//!
//! Rendering is pure and deterministic: identical inputs yield byte-identical
//! output. It also never fails -- previews are served to anonymous visitors,
//! so missing variables substitute to the empty string, malformed documents
//! degrade to a fallback block, and unknown layouts render without their
//! skeleton ordering.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::design::{TemplateDoc, TemplateSection};
use crate::style::{StyleDoc, StyleRule};

/// Flat key-to-value data fed into a template at render time
/// (couple name, date, venue...). Ordered for deterministic iteration.
pub type RenderContext = BTreeMap<String, String>;

/// Wrapper class used when the layout id is unknown or the template is
/// malformed.
pub const FALLBACK_LAYOUT_CLASS: &str = "design-fallback";

/// Known layout skeletons: layout id to preferred section-position order.
/// Sections with positions outside the skeleton still render, after the
/// ordered ones.
const LAYOUT_SKELETONS: &[(&str, &[&str])] = &[
    ("classic", &["header", "hero", "body", "details", "footer"]),
    ("elegant", &["header", "hero", "body", "details", "footer"]),
    ("modern", &["hero", "header", "body", "details", "footer"]),
    ("minimal", &["body", "details", "footer"]),
];

fn skeleton_for(layout: &str) -> Option<&'static [&'static str]> {
    LAYOUT_SKELETONS
        .iter()
        .find(|(name, _)| *name == layout)
        .map(|(_, order)| *order)
}

/* --------------------------------------------------------------------------
Placeholder substitution
-------------------------------------------------------------------------- */

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("valid regex"))
}

/// Escape a value for insertion into HTML text or attribute position.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace every `{{name}}` placeholder with the escaped context value.
///
/// Unresolved placeholders render as the empty string; the literal `{{...}}`
/// must never leak into output shown to guests.
pub fn substitute_placeholders(html: &str, ctx: &RenderContext) -> String {
    placeholder_regex()
        .replace_all(html, |caps: &Captures| {
            ctx.get(&caps[1]).map(|v| escape_html(v)).unwrap_or_default()
        })
        .into_owned()
}

/* --------------------------------------------------------------------------
Style flattening
-------------------------------------------------------------------------- */

fn write_rule(css: &mut String, selector: &str, rule: &StyleRule) {
    css.push_str(selector);
    css.push('{');
    for (property, value) in rule {
        css.push_str(property);
        css.push(':');
        css.push_str(value);
        css.push(';');
    }
    css.push('}');
}

/// Flatten base rules, component rules, and animations into one CSS string.
pub fn flatten_styles(styles: &StyleDoc) -> String {
    let mut css = String::new();
    for (selector, rule) in &styles.base {
        write_rule(&mut css, selector, rule);
    }
    for rules in styles.components.values() {
        for (selector, rule) in rules {
            write_rule(&mut css, selector, rule);
        }
    }
    for (name, keyframes) in &styles.animations {
        css.push_str("@keyframes ");
        css.push_str(name);
        css.push('{');
        for (stop, rule) in keyframes {
            write_rule(&mut css, stop, rule);
        }
        css.push('}');
    }
    css
}

/* --------------------------------------------------------------------------
Section assembly
-------------------------------------------------------------------------- */

/// Order sections by the layout skeleton's position ranking, then by
/// position name, then by section name. Deterministic for any input.
fn ordered_sections<'a>(
    template: &'a TemplateDoc,
    skeleton: Option<&[&str]>,
) -> Vec<(&'a String, &'a TemplateSection)> {
    let order = skeleton.unwrap_or(&[]);
    let rank = |position: &str| {
        order
            .iter()
            .position(|p| *p == position)
            .unwrap_or(order.len())
    };

    let mut sections: Vec<_> = template.sections.iter().collect();
    sections.sort_by(|(a_name, a), (b_name, b)| {
        rank(&a.position)
            .cmp(&rank(&b.position))
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a_name.cmp(b_name))
    });
    sections
}

/* --------------------------------------------------------------------------
Rendering
-------------------------------------------------------------------------- */

/// Render a parsed design into a self-contained HTML fragment.
///
/// The flattened stylesheet is inlined ahead of the markup so the result can
/// be injected into a host page without extra stylesheet loads.
pub fn render_html(template: &TemplateDoc, styles: &StyleDoc, ctx: &RenderContext) -> String {
    let skeleton = skeleton_for(&template.layout);
    let layout_class = match skeleton {
        Some(_) => format!("layout-{}", escape_html(&template.layout)),
        None => FALLBACK_LAYOUT_CLASS.to_string(),
    };

    let mut out = String::new();
    let css = flatten_styles(styles);
    if !css.is_empty() {
        out.push_str("<style>");
        out.push_str(&css);
        out.push_str("</style>");
    }

    out.push_str(&format!("<div class=\"design {layout_class}\">"));
    for (name, section) in ordered_sections(template, skeleton) {
        out.push_str(&format!(
            "<section class=\"design-section design-section-{}\" data-position=\"{}\">",
            escape_html(name),
            escape_html(&section.position)
        ));
        out.push_str(&substitute_placeholders(&section.html, ctx));
        out.push_str("</section>");
    }
    out.push_str("</div>");
    out
}

/// Render from raw stored documents.
///
/// Malformed documents degrade instead of failing: an unparseable template
/// renders an empty fallback block, unparseable styles render without a
/// stylesheet.
pub fn render_value(template: &Value, styles: &Value, ctx: &RenderContext) -> String {
    let styles = StyleDoc::from_value(styles).unwrap_or_default();
    match TemplateDoc::from_value(template) {
        Ok(template) => render_html(&template, &styles, ctx),
        Err(_) => format!("<div class=\"design {FALLBACK_LAYOUT_CLASS}\"></div>"),
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(layout: &str) -> TemplateDoc {
        TemplateDoc::from_value(&json!({
            "layout": layout,
            "sections": {
                "greeting": {
                    "html": "<p>Bonjour {{firstName}}</p>",
                    "position": "body"
                },
                "title": {
                    "html": "<h1>{{coupleName}}</h1>",
                    "position": "header"
                }
            }
        }))
        .unwrap()
    }

    fn ctx(pairs: &[(&str, &str)]) -> RenderContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- Placeholder substitution --------------------------------------------

    #[test]
    fn known_placeholder_substituted() {
        let out = substitute_placeholders(
            "Bonjour {{firstName}}",
            &ctx(&[("firstName", "Marie")]),
        );
        assert_eq!(out, "Bonjour Marie");
    }

    #[test]
    fn missing_placeholder_renders_empty() {
        let out = substitute_placeholders("Bonjour {{firstName}}", &ctx(&[]));
        assert_eq!(out, "Bonjour ");
        assert!(!out.contains("{{"));
    }

    #[test]
    fn placeholder_with_inner_whitespace_resolves() {
        let out =
            substitute_placeholders("{{ coupleName }}", &ctx(&[("coupleName", "A & B")]));
        assert_eq!(out, "A &amp; B");
    }

    #[test]
    fn substituted_values_are_escaped() {
        let out = substitute_placeholders(
            "{{message}}",
            &ctx(&[("message", "<script>alert('x')</script>")]),
        );
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    // -- Rendering ------------------------------------------------------------

    #[test]
    fn render_is_deterministic() {
        let t = template("classic");
        let styles = StyleDoc::default();
        let c = ctx(&[("coupleName", "Marie & Jean"), ("firstName", "Marie")]);
        assert_eq!(render_html(&t, &styles, &c), render_html(&t, &styles, &c));
    }

    #[test]
    fn sections_follow_layout_skeleton_order() {
        let out = render_html(&template("classic"), &StyleDoc::default(), &ctx(&[]));
        let header = out.find("design-section-title").unwrap();
        let body = out.find("design-section-greeting").unwrap();
        assert!(header < body, "header section must precede body section");
    }

    #[test]
    fn unknown_layout_renders_fallback_block() {
        let out = render_html(&template("brutalist"), &StyleDoc::default(), &ctx(&[]));
        assert!(out.contains(FALLBACK_LAYOUT_CLASS));
        // Sections still render; nothing is dropped.
        assert!(out.contains("design-section-title"));
    }

    #[test]
    fn styles_are_inlined_ahead_of_markup() {
        let styles = StyleDoc::from_value(&json!({
            "base": { ".design": { "font-family": "serif", "color": "#222222" } },
            "components": {
                "positionable-elements": {
                    ".element-title": { "left": "10%", "top": "5%" }
                }
            }
        }))
        .unwrap();

        let out = render_html(&template("classic"), &styles, &ctx(&[]));
        assert!(out.starts_with("<style>"));
        assert!(out.contains(".design{color:#222222;font-family:serif;}"));
        assert!(out.contains(".element-title{left:10%;top:5%;}"));
        let style_end = out.find("</style>").unwrap();
        let markup_start = out.find("<div").unwrap();
        assert!(style_end < markup_start);
    }

    #[test]
    fn animations_flatten_to_keyframes() {
        let styles = StyleDoc::from_value(&json!({
            "base": {},
            "components": {},
            "animations": {
                "fade-in": {
                    "0%": { "opacity": "0" },
                    "100%": { "opacity": "1" }
                }
            }
        }))
        .unwrap();

        let css = flatten_styles(&styles);
        assert!(css.contains("@keyframes fade-in{0%{opacity:0;}100%{opacity:1;}}"));
    }

    // -- Defensive rendering --------------------------------------------------

    #[test]
    fn malformed_template_value_renders_fallback() {
        let out = render_value(&json!(42), &json!({}), &ctx(&[]));
        assert!(out.contains(FALLBACK_LAYOUT_CLASS));
    }

    #[test]
    fn malformed_styles_value_renders_without_stylesheet() {
        let out = render_value(
            &json!({
                "layout": "classic",
                "sections": { "a": { "html": "<p>hi</p>", "position": "body" } }
            }),
            &json!("not-a-style-doc"),
            &ctx(&[]),
        );
        assert!(!out.contains("<style>"));
        assert!(out.contains("<p>hi</p>"));
    }
}
