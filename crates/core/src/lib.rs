//! Pure domain logic for the Kawepla design engine.
//!
//! This crate has zero database, async, or I/O dependencies. It provides:
//!
//! - Design document types and write-boundary validation
//! - The template renderer (design + data context -> HTML)
//! - The legacy-to-canvas adapter (reconstruction of editable documents)
//! - Style rule types, the shared style-defaults table, and tolerant parsing
//! - The subscription access predicate
//! - The shared error taxonomy and type aliases

pub mod canvas;
pub mod design;
pub mod error;
pub mod render;
pub mod roles;
pub mod style;
pub mod subscription;
pub mod types;
