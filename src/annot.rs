//! Annotation output model
//!
//! The engine never touches the documents themselves; it hands the external
//! annotation writer a serializable list of highlight regions and page
//! insertions per document.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Title stamped on every produced annotation.
pub const ANNOTATION_TITLE: &str = "pdfdelta";

/// Marker text placed on synthesized placeholder pages.
pub const MISSING_PAGE_MARKER: &str = "<missing page>";

/// RGB highlight color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    pub const YELLOW: Color = Color {
        r: 255,
        g: 255,
        b: 0,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Which of the two compared documents a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentId {
    A,
    B,
}

/// Renderable highlight shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionShape {
    /// Markup highlight rectangle.
    Rect(Rect),
    /// Bordered polygon; the last vertex closes the loop on the first.
    Polygon {
        vertices: Vec<Point>,
        border_width: f32,
    },
}

/// One highlight region on one page of one document.
///
/// Produced, never mutated; pages are numbered after page-sync adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRegion {
    /// 1-based page number in the adjusted document.
    pub page: usize,
    pub document: DocumentId,
    pub shape: RegionShape,
    pub color: Color,
    pub comment: String,
}

/// A placeholder page synthesized to keep the two documents aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInsertion {
    pub document: DocumentId,
    /// 1-based position the new page occupies in the adjusted document.
    pub at_page: usize,
    /// Size copied from the page the insertion anchors on.
    pub size: Rect,
    /// Marker text for the reviewer.
    pub marker: String,
}
