//! Diff-span region synthesis
//!
//! Turns an index range of words into the minimal set of visually correct
//! highlight shapes: a caret for pure insertion points, an inflated polygon
//! per image, and rectangles that respect line wraps and page boundaries.
//! Images and text never merge into one shape.

use crate::annot::{AnnotationRegion, Color, DocumentId, RegionShape};
use crate::geometry::{Point, Rect};
use crate::word::WordItem;

/// Fixed inflation margin around image polygons.
const IMAGE_MARGIN: f32 = 4.0;

/// Synthesize the regions for one side of a diff span.
///
/// `start`/`count` index this side's word sequence; `page_offset` is the
/// number of placeholder pages inserted into this document so far. Indices
/// at or past the end of the sequence clamp to the last word; a side with
/// no words at all produces nothing.
pub fn synthesize_regions(
    words: &[WordItem],
    start: usize,
    count: usize,
    document: DocumentId,
    page_offset: usize,
    color: Color,
    comment: &str,
) -> Vec<AnnotationRegion> {
    let mut synthesizer = Synthesizer {
        words,
        document,
        page_offset,
        color,
        comment,
        out: Vec::new(),
    };
    synthesizer.mark(start, count);
    synthesizer.out
}

struct Synthesizer<'a> {
    words: &'a [WordItem],
    document: DocumentId,
    page_offset: usize,
    color: Color,
    comment: &'a str,
    out: Vec<AnnotationRegion>,
}

impl Synthesizer<'_> {
    fn mark(&mut self, start: usize, count: usize) {
        if count == 0 {
            self.caret(start);
            return;
        }
        if start >= self.words.len() {
            // unmappable range: attach to the nearest valid word
            self.caret(start);
            return;
        }
        let end = (start + count).min(self.words.len());

        // images never merge with text: peel each one off as its own
        // polygon and process the text-only sub-runs around it
        let mut run_start = start;
        for i in start..end {
            if self.words[i].is_image() {
                if i > run_start {
                    self.mark_text_run(run_start, i - run_start);
                }
                self.image_polygon(i);
                run_start = i + 1;
            }
        }
        if run_start < end {
            self.mark_text_run(run_start, end - run_start);
        }
    }

    /// Thin insertion caret beside the anchor word: left of it when the
    /// index is valid, right of the last word when clamped past the end.
    fn caret(&mut self, index: usize) {
        let Some(last) = self.words.len().checked_sub(1) else {
            return;
        };
        let clamped = index > last;
        let anchor = &self.words[if clamped { last } else { index }];
        let bbox = anchor.bbox();
        let width = bbox.height() / 5.0;
        let x = if clamped { bbox.x1 } else { bbox.x0 - width };
        self.push_rect(Rect::new(x, bbox.y0, x + width, bbox.y1), anchor.page());
    }

    fn image_polygon(&mut self, index: usize) {
        let word = &self.words[index];
        let bbox = word.bbox().expand(IMAGE_MARGIN);
        let vertices = vec![
            Point::new(bbox.x0, bbox.y0),
            Point::new(bbox.x1, bbox.y0),
            Point::new(bbox.x1, bbox.y1),
            Point::new(bbox.x0, bbox.y1),
            Point::new(bbox.x0, bbox.y0),
        ];
        self.out.push(AnnotationRegion {
            page: word.page() + self.page_offset,
            document: self.document,
            shape: RegionShape::Polygon {
                vertices,
                border_width: IMAGE_MARGIN * 2.0,
            },
            color: self.color,
            comment: self.comment.to_string(),
        });
    }

    fn mark_text_run(&mut self, mut start: usize, mut count: usize) {
        // a run starting mid-line shares that line with words before it:
        // split the line remainder off as its own rectangle
        if !self.words[start].is_new_line() {
            let mut i = start;
            while i < start + count - 1 && !self.words[i + 1].is_new_line() {
                i += 1;
            }
            self.line_rect(start, i);
            count -= i - start + 1;
            start = i + 1;
            if count == 0 {
                return;
            }
        }

        // symmetric split when the run ends mid-line
        if self.words.len() > start + count && !self.words[start + count].is_new_line() {
            let mut i = start + count - 1;
            while i > start && !self.words[i].is_new_line() {
                i -= 1;
            }
            self.line_rect(i, start + count - 1);
            count = i - start;
            if count == 0 {
                return;
            }
        }

        // the interior covers whole lines: one rectangle per contiguous
        // same-page group, accumulating extents across its words
        let end = start + count;
        let mut group_start = start;
        let mut rect = self.words[start].bbox();
        for i in start + 1..=end {
            if i == end || self.words[i].page() != self.words[group_start].page() {
                self.push_rect(rect, self.words[group_start].page());
                if i == end {
                    break;
                }
                group_start = i;
                rect = self.words[i].bbox();
            } else {
                rect = rect.union(&self.words[i].bbox());
            }
        }
    }

    /// One rectangle over the inclusive word range `[first, last]`.
    fn line_rect(&mut self, first: usize, last: usize) {
        let mut rect = self.words[first].bbox();
        for word in &self.words[first + 1..=last] {
            rect = rect.union(&word.bbox());
        }
        self.push_rect(rect, self.words[first].page());
    }

    fn push_rect(&mut self, rect: Rect, page: usize) {
        self.out.push(AnnotationRegion {
            page: page + self.page_offset,
            document: self.document,
            shape: RegionShape::Rect(rect),
            color: self.color,
            comment: self.comment.to_string(),
        });
    }
}
