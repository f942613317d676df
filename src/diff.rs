//! Word-level diff spans over the external sequence-diff primitive

use crate::event::ImageToken;
use crate::word::WordItem;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffOp, capture_diff_slices};

/// Classification of a diff span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    Unchanged,
    Inserted,
    Deleted,
    Replaced,
}

/// A contiguous range of words in both documents with one classification.
///
/// Spans partition both word sequences contiguously and in order;
/// `Unchanged` spans have `count_a == count_b` and identical tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSpan {
    pub kind: DiffKind,
    pub start_a: usize,
    pub count_a: usize,
    pub start_b: usize,
    pub count_b: usize,
}

/// Atomic diff token: word text, or the registry token for image content.
///
/// Image tokens live in their own variant so no document text can ever
/// collide with a synthetic image identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Token<'a> {
    Text(&'a str),
    Image(ImageToken),
}

fn tokens(words: &[WordItem]) -> Vec<Token<'_>> {
    words
        .iter()
        .map(|word| match word {
            WordItem::Text(text) => Token::Text(text.text.as_str()),
            WordItem::Image(image) => Token::Image(image.token),
        })
        .collect()
}

/// Diff two word sequences into an ordered, partitioning span list.
pub fn compute_diff(words_a: &[WordItem], words_b: &[WordItem]) -> Vec<DiffSpan> {
    let tokens_a = tokens(words_a);
    let tokens_b = tokens(words_b);
    capture_diff_slices(Algorithm::Myers, &tokens_a, &tokens_b)
        .into_iter()
        .map(|op| match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => DiffSpan {
                kind: DiffKind::Unchanged,
                start_a: old_index,
                count_a: len,
                start_b: new_index,
                count_b: len,
            },
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => DiffSpan {
                kind: DiffKind::Deleted,
                start_a: old_index,
                count_a: old_len,
                start_b: new_index,
                count_b: 0,
            },
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => DiffSpan {
                kind: DiffKind::Inserted,
                start_a: old_index,
                count_a: 0,
                start_b: new_index,
                count_b: new_len,
            },
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => DiffSpan {
                kind: DiffKind::Replaced,
                start_a: old_index,
                count_a: old_len,
                start_b: new_index,
                count_b: new_len,
            },
        })
        .collect()
}
