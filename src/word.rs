//! Word reconstruction from positioned chunks
//!
//! Walks the geometrically sorted chunk stream and groups glyphs into
//! words: a word closes on a line change, an excess projected gap, an
//! overlap, or an embedded space; an image always forms a word of its own.

use crate::chunk::{Chunk, ChunkKind, sort_chunks};
use crate::event::ImageToken;
use crate::geometry::{LineSegment, Point, Rect};

/// A reconstructed text word.
#[derive(Debug, Clone)]
pub struct TextWord {
    pub text: String,
    /// 1-based page number.
    pub page: usize,
    /// Axis-aligned box over every glyph corner, valid for rotated text.
    pub bbox: Rect,
    /// First glyph's ascent start to last glyph's ascent end.
    pub ascent_line: LineSegment,
    /// First glyph's descent start to last glyph's descent end.
    pub descent_line: LineSegment,
    pub orientation: Point,
    pub start: Point,
    pub end: Point,
    /// True for the first word on a visually new line.
    pub is_new_line: bool,
}

impl TextWord {
    /// Grow the bounding box by one glyph segment's endpoints.
    fn bound_append(&mut self, segment: &LineSegment) {
        self.bbox.include_point(segment.start);
        self.bbox.include_point(segment.end);
    }
}

/// A reconstructed image word.
#[derive(Debug, Clone)]
pub struct ImageWord {
    pub token: ImageToken,
    /// 1-based page number.
    pub page: usize,
    pub bbox: Rect,
    pub is_new_line: bool,
}

/// The unit of diffing and annotation: a geometrically contiguous token.
#[derive(Debug, Clone)]
pub enum WordItem {
    Text(TextWord),
    Image(ImageWord),
}

impl WordItem {
    pub fn page(&self) -> usize {
        match self {
            WordItem::Text(word) => word.page,
            WordItem::Image(word) => word.page,
        }
    }

    pub fn bbox(&self) -> Rect {
        match self {
            WordItem::Text(word) => word.bbox,
            WordItem::Image(word) => word.bbox,
        }
    }

    pub fn is_new_line(&self) -> bool {
        match self {
            WordItem::Text(word) => word.is_new_line,
            WordItem::Image(word) => word.is_new_line,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, WordItem::Image(_))
    }
}

/// Reconstruct the ordered word sequence from a document's chunks.
///
/// Deterministic: the result depends on the input only up to the internal
/// stable page-major geometric sort. Each page reconstructs independently;
/// a word never spans pages and every page opens on a new line.
pub fn reconstruct(mut chunks: Vec<Chunk>, line_tolerance: f32) -> Vec<WordItem> {
    sort_chunks(&mut chunks, line_tolerance);

    let mut words: Vec<WordItem> = Vec::new();
    let mut current: Option<TextWord> = None;
    let mut is_new_line = true;
    let mut prev: Option<usize> = None;

    for idx in 0..chunks.len() {
        let mut break_word = false;
        if let Some(p) = prev {
            let (chunk, prev_chunk) = (&chunks[idx], &chunks[p]);
            if chunk.page != prev_chunk.page {
                if let Some(word) = current.take() {
                    words.push(WordItem::Text(word));
                }
                is_new_line = true;
            } else if chunk.same_line(prev_chunk, line_tolerance) {
                let gap = chunk.distance_from_end_of(prev_chunk);
                let space = chunk.space_width();
                if gap < -space {
                    // overlapping runs never merge
                    break_word = true;
                } else if gap > space / 2.0
                    && chunk.first_char() != Some(' ')
                    && prev_chunk.last_char() != Some(' ')
                {
                    break_word = true;
                }
            } else {
                break_word = true;
                is_new_line = true;
            }
        }
        prev = Some(idx);

        if break_word {
            if let Some(word) = current.take() {
                words.push(WordItem::Text(word));
            }
        }

        let chunk = &chunks[idx];
        match &chunk.kind {
            ChunkKind::Image { token, bbox } => {
                // an image interrupts any open word and closes itself
                if let Some(word) = current.take() {
                    words.push(WordItem::Text(word));
                }
                words.push(WordItem::Image(ImageWord {
                    token: *token,
                    page: chunk.page,
                    bbox: *bbox,
                    is_new_line,
                }));
                is_new_line = false;
            }
            ChunkKind::Text {
                ascents, descents, ..
            } => {
                let chars: Vec<char> = chunk.text.chars().collect();
                let mut i = 0;
                while i < chars.len() {
                    if chars[i] == ' ' {
                        if let Some(word) = current.take() {
                            words.push(WordItem::Text(word));
                        }
                        i += 1;
                        continue;
                    }
                    let mut j = i;
                    while j < chars.len() && chars[j] != ' ' {
                        j += 1;
                    }
                    let sub: String = chars[i..j].iter().collect();
                    match current.as_mut() {
                        Some(word) => {
                            word.text.push_str(&sub);
                            // only the trailing endpoints move; the leading
                            // ends stay with the first glyph
                            word.ascent_line.end = ascents[j - 1].end;
                            word.descent_line.end = descents[j - 1].end;
                            word.end = chunk.end;
                            for k in i..j {
                                word.bound_append(&ascents[k]);
                                word.bound_append(&descents[k]);
                            }
                        }
                        None => {
                            let mut word = TextWord {
                                text: sub,
                                page: chunk.page,
                                bbox: Rect::EMPTY,
                                ascent_line: LineSegment::new(
                                    ascents[i].start,
                                    ascents[j - 1].end,
                                ),
                                descent_line: LineSegment::new(
                                    descents[i].start,
                                    descents[j - 1].end,
                                ),
                                orientation: chunk.orientation,
                                start: chunk.start,
                                end: chunk.end,
                                is_new_line,
                            };
                            for k in i..j {
                                word.bound_append(&ascents[k]);
                                word.bound_append(&descents[k]);
                            }
                            is_new_line = false;
                            current = Some(word);
                        }
                    }
                    i = j;
                }
            }
        }
    }
    if let Some(word) = current.take() {
        words.push(WordItem::Text(word));
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ImagePlacement, TextRun};
    use crate::geometry::Matrix;
    use bytes::Bytes;

    const W: f32 = 10.0;

    fn chunk(text: &str, x: f32, y: f32, page: usize) -> Chunk {
        let n = text.chars().count();
        let glyph = |i: usize, dy: f32| {
            LineSegment::new(
                Point::new(x + W * i as f32, y + dy),
                Point::new(x + W * (i + 1) as f32, y + dy),
            )
        };
        Chunk::from_text_run(TextRun {
            text: text.to_string(),
            baseline_start: Point::new(x, y),
            baseline_end: Point::new(x + W * n as f32, y),
            ascents: (0..n).map(|i| glyph(i, 8.0)).collect(),
            descents: (0..n).map(|i| glyph(i, -2.0)).collect(),
            space_width: W,
            page,
        })
        .unwrap()
    }

    fn image_chunk(token: u32, x: f32, y: f32, w: f32, h: f32, page: usize) -> Chunk {
        Chunk::from_image(
            &ImagePlacement {
                content: Bytes::from_static(b"img"),
                ctm: Matrix::scale(w, h).concat(&Matrix::translate(x, y)),
                page,
            },
            ImageToken(token),
        )
        .unwrap()
    }

    fn texts(words: &[WordItem]) -> Vec<String> {
        words
            .iter()
            .map(|w| match w {
                WordItem::Text(t) => t.text.clone(),
                WordItem::Image(i) => format!("<image {}>", i.token.0),
            })
            .collect()
    }

    #[test]
    fn test_splits_embedded_spaces() {
        let words = reconstruct(vec![chunk("alpha beta gamma", 72.0, 700.0, 1)], 1.0);
        assert_eq!(texts(&words), ["alpha", "beta", "gamma"]);
        assert!(words[0].is_new_line());
        assert!(!words[1].is_new_line());
        assert!(!words[2].is_new_line());
    }

    #[test]
    fn test_word_bbox_covers_glyph_corners() {
        let words = reconstruct(vec![chunk("alpha beta", 72.0, 700.0, 1)], 1.0);
        let WordItem::Text(beta) = &words[1] else {
            panic!("expected text word");
        };
        // "beta" occupies characters 6..10 at 10 units per glyph
        assert_eq!(beta.bbox, Rect::new(132.0, 698.0, 172.0, 708.0));
        assert_eq!(beta.ascent_line.start, Point::new(132.0, 708.0));
        assert_eq!(beta.ascent_line.end, Point::new(172.0, 708.0));
    }

    #[test]
    fn test_adjacent_chunks_on_line_merge_into_one_word() {
        // two runs abutting within half a space width
        let words = reconstruct(
            vec![chunk("hy", 0.0, 700.0, 1), chunk("phen", 20.0, 700.0, 1)],
            1.0,
        );
        assert_eq!(texts(&words), ["hyphen"]);
    }

    #[test]
    fn test_gap_breaks_word() {
        let words = reconstruct(
            vec![chunk("one", 0.0, 700.0, 1), chunk("two", 60.0, 700.0, 1)],
            1.0,
        );
        assert_eq!(texts(&words), ["one", "two"]);
        assert!(!words[1].is_new_line());
    }

    #[test]
    fn test_overlap_breaks_word() {
        // second run starts well before the first ends
        let words = reconstruct(
            vec![chunk("abcd", 0.0, 700.0, 1), chunk("xy", 10.0, 700.0, 1)],
            1.0,
        );
        assert_eq!(texts(&words), ["abcd", "xy"]);
    }

    #[test]
    fn test_line_change_marks_new_line() {
        let words = reconstruct(
            vec![chunk("upper", 0.0, 700.0, 1), chunk("lower", 0.0, 680.0, 1)],
            1.0,
        );
        assert_eq!(texts(&words), ["upper", "lower"]);
        assert!(words[0].is_new_line());
        assert!(words[1].is_new_line());
    }

    #[test]
    fn test_jittered_baselines_stay_on_one_line() {
        let words = reconstruct(
            vec![chunk("one", 0.0, 700.0, 1), chunk("two", 60.0, 700.8, 1)],
            1.0,
        );
        assert_eq!(texts(&words), ["one", "two"]);
        assert!(!words[1].is_new_line());
    }

    #[test]
    fn test_image_interrupts_open_word() {
        let words = reconstruct(
            vec![
                chunk("before", 0.0, 700.0, 1),
                image_chunk(7, 0.0, 600.0, 100.0, 50.0, 1),
                chunk("after", 0.0, 500.0, 1),
            ],
            1.0,
        );
        assert_eq!(texts(&words), ["before", "<image 7>", "after"]);
        assert!(words[1].is_new_line());
        assert_eq!(words[1].bbox(), Rect::new(0.0, 600.0, 100.0, 650.0));
    }

    #[test]
    fn test_pages_reconstruct_independently() {
        // identical geometry on two pages: no merging, both open a line
        let words = reconstruct(
            vec![chunk("two", 0.0, 700.0, 2), chunk("one", 0.0, 700.0, 1)],
            1.0,
        );
        assert_eq!(texts(&words), ["one", "two"]);
        assert!(words[0].is_new_line());
        assert!(words[1].is_new_line());
    }

    #[test]
    fn test_leading_and_trailing_spaces() {
        let words = reconstruct(vec![chunk(" pad ", 0.0, 700.0, 1)], 1.0);
        assert_eq!(texts(&words), ["pad"]);
    }

    #[test]
    fn test_reconstruct_is_idempotent_on_separated_input() {
        let first = reconstruct(
            vec![
                chunk("alpha beta", 72.0, 700.0, 1),
                chunk("gamma", 72.0, 680.0, 1),
            ],
            1.0,
        );
        // regenerate one chunk per word at the word's own position
        let regenerated: Vec<Chunk> = first
            .iter()
            .map(|w| {
                let WordItem::Text(t) = w else {
                    panic!("expected text word");
                };
                chunk(&t.text, t.bbox.x0, t.bbox.y0 + 2.0, t.page)
            })
            .collect();
        let second = reconstruct(regenerated, 1.0);
        assert_eq!(texts(&second), texts(&first));
        let flags_first: Vec<bool> = first.iter().map(WordItem::is_new_line).collect();
        let flags_second: Vec<bool> = second.iter().map(WordItem::is_new_line).collect();
        assert_eq!(flags_second, flags_first);
    }
}
