//! Positioned chunks and their geometric sort order
//!
//! A chunk is one glyph run or one image placement together with the
//! derived keys that order it on the page: the quantized writing direction,
//! the signed perpendicular distance of its baseline from the origin, and
//! its projections onto the writing direction.

use crate::error::{Error, Result};
use crate::event::{ImagePlacement, ImageToken, TextRun};
use crate::geometry::{LineSegment, Point, Rect};
use std::cmp::Ordering;

/// Content-specific payload of a chunk.
#[derive(Debug, Clone)]
pub enum ChunkKind {
    Text {
        ascents: Vec<LineSegment>,
        descents: Vec<LineSegment>,
        space_width: f32,
    },
    Image {
        token: ImageToken,
        bbox: Rect,
    },
}

/// A single positioned run of same-direction glyphs or one image placement.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Run text; the empty string for images.
    pub text: String,
    pub start: Point,
    pub end: Point,
    /// Unit vector in the writing direction.
    pub orientation: Point,
    /// Writing direction quantized to milliradians, for same-line equality.
    pub orientation_magnitude: i32,
    /// Signed distance of the baseline from the origin, perpendicular to
    /// the writing direction (the Y position in an unrotated system).
    pub dist_perpendicular: f32,
    /// Projection of the baseline start onto the writing direction.
    pub dist_parallel_start: f32,
    /// Projection of the baseline end onto the writing direction.
    pub dist_parallel_end: f32,
    /// 1-based page number.
    pub page: usize,
    pub kind: ChunkKind,
}

impl Chunk {
    /// Build a chunk from a glyph-run draw event.
    ///
    /// Fails fast on the collaborator contract: the per-glyph segment lists
    /// must match the character count, and the baseline must have nonzero
    /// length.
    pub fn from_text_run(run: TextRun) -> Result<Chunk> {
        let glyphs = run.text.chars().count();
        if run.ascents.len() != glyphs || run.descents.len() != glyphs {
            return Err(Error::contract(format!(
                "glyph run {:?} has {} characters but {} ascent / {} descent segments",
                run.text,
                glyphs,
                run.ascents.len(),
                run.descents.len()
            )));
        }
        let keys = OrderingKeys::derive(run.baseline_start, run.baseline_end)?;
        Ok(Chunk {
            text: run.text,
            start: run.baseline_start,
            end: run.baseline_end,
            orientation: keys.orientation,
            orientation_magnitude: keys.magnitude,
            dist_perpendicular: keys.perpendicular,
            dist_parallel_start: keys.parallel_start,
            dist_parallel_end: keys.parallel_end,
            page: run.page,
            kind: ChunkKind::Text {
                ascents: run.ascents,
                descents: run.descents,
                space_width: run.space_width,
            },
        })
    }

    /// Build a chunk from an image placement.
    ///
    /// The bounding box reads the transform directly: origin at `(e, f)`,
    /// extent `(a, d)`. The synthetic baseline runs along the box's top
    /// edge so images order like a line of their own.
    pub fn from_image(placement: &ImagePlacement, token: ImageToken) -> Result<Chunk> {
        let m = placement.ctm;
        let bbox = Rect::new(m.e, m.f, m.a + m.e, m.d + m.f);
        let start = Point::new(bbox.x0, bbox.y1);
        let end = Point::new(bbox.x1, bbox.y1);
        let keys = OrderingKeys::derive(start, end)?;
        Ok(Chunk {
            text: String::new(),
            start,
            end,
            orientation: keys.orientation,
            orientation_magnitude: keys.magnitude,
            dist_perpendicular: keys.perpendicular,
            dist_parallel_start: keys.parallel_start,
            dist_parallel_end: keys.parallel_end,
            page: placement.page,
            kind: ChunkKind::Image { token, bbox },
        })
    }

    /// True when both chunks share the writing direction and their
    /// perpendicular distances differ by no more than the jitter tolerance.
    pub fn same_line(&self, other: &Chunk, tolerance: f32) -> bool {
        self.orientation_magnitude == other.orientation_magnitude
            && (self.dist_perpendicular - other.dist_perpendicular).abs() <= tolerance
    }

    /// Projected gap between the end of `prev` and the start of this chunk
    /// along the writing direction. Negative means overlap. Only meaningful
    /// for chunks on the same line.
    pub fn distance_from_end_of(&self, prev: &Chunk) -> f32 {
        self.dist_parallel_start - prev.dist_parallel_end
    }

    /// Single-space width for gap classification; images have none.
    pub fn space_width(&self) -> f32 {
        match &self.kind {
            ChunkKind::Text { space_width, .. } => *space_width,
            ChunkKind::Image { .. } => 0.0,
        }
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().last()
    }

    /// Orders by orientation, then perpendicular distance, then parallel
    /// start. Perpendicular distances within the tolerance count as equal
    /// so glyph jitter cannot split a line; the stable sort keeps input
    /// order for such ties.
    fn cmp_geometry(&self, other: &Self, tolerance: f32) -> Ordering {
        match self.orientation_magnitude.cmp(&other.orientation_magnitude) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if (self.dist_perpendicular - other.dist_perpendicular).abs() > tolerance {
            return self.dist_perpendicular.total_cmp(&other.dist_perpendicular);
        }
        self.dist_parallel_start.total_cmp(&other.dist_parallel_start)
    }
}

/// Derived sort keys shared by text and image chunks.
struct OrderingKeys {
    orientation: Point,
    magnitude: i32,
    perpendicular: f32,
    parallel_start: f32,
    parallel_end: f32,
}

impl OrderingKeys {
    fn derive(start: Point, end: Point) -> Result<OrderingKeys> {
        let orientation = (end - start).normalized().ok_or_else(|| {
            Error::geometry(format!(
                "zero-length baseline at ({}, {})",
                start.x, start.y
            ))
        })?;
        #[allow(clippy::cast_possible_truncation)]
        let magnitude = (orientation.y.atan2(orientation.x) * 1000.0).round() as i32;
        Ok(OrderingKeys {
            orientation,
            magnitude,
            perpendicular: start.cross(orientation),
            parallel_start: orientation.dot(start),
            parallel_end: orientation.dot(end),
        })
    }
}

/// Stable page-major geometric sort. Each page reconstructs independently,
/// so chunks group by page first and by line geometry within a page.
pub fn sort_chunks(chunks: &mut [Chunk], tolerance: f32) {
    chunks.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then_with(|| a.cmp_geometry(b, tolerance))
    });
}
