//! Draw-event input boundary
//!
//! The content-stream interpreter is an external collaborator: it walks a
//! document's pages and emits one event per positioned glyph run or image
//! placement. Events may arrive in any order; the engine performs its own
//! geometric sort.

use crate::geometry::{LineSegment, Matrix, Point};
use bytes::Bytes;
use std::collections::HashMap;

/// A positioned run of same-direction glyphs.
///
/// `ascents` and `descents` carry one segment per character of `text`,
/// tracing each glyph's ascent and descent line above/below the baseline.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub baseline_start: Point,
    pub baseline_end: Point,
    pub ascents: Vec<LineSegment>,
    pub descents: Vec<LineSegment>,
    /// Width of a single space character in the run's font.
    pub space_width: f32,
    /// 1-based page number.
    pub page: usize,
}

/// An image placed on a page through an affine transform.
#[derive(Debug, Clone)]
pub struct ImagePlacement {
    /// Raw image content bytes, used for identity comparison only.
    pub content: Bytes,
    pub ctm: Matrix,
    /// 1-based page number.
    pub page: usize,
}

/// One draw event as emitted by the content-stream interpreter.
#[derive(Debug, Clone)]
pub enum DrawEvent {
    Text(TextRun),
    Image(ImagePlacement),
}

impl DrawEvent {
    pub fn page(&self) -> usize {
        match self {
            DrawEvent::Text(run) => run.page,
            DrawEvent::Image(placement) => placement.page,
        }
    }
}

/// Synthetic token identifying distinct image content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageToken(pub u32);

/// Assigns tokens to image content by exact byte equality.
///
/// The registry is shared across both documents of a comparison, so
/// byte-identical images diff as equal wherever they appear, while
/// re-encoded near-duplicates stay distinct.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    tokens: HashMap<Bytes, ImageToken>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for the given content, allocating a fresh one on first sight.
    pub fn token_for(&mut self, content: &Bytes) -> ImageToken {
        if let Some(token) = self.tokens.get(content) {
            return *token;
        }
        let token = ImageToken(self.tokens.len() as u32 + 1);
        self.tokens.insert(content.clone(), token);
        token
    }

    /// Number of distinct image contents seen so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
