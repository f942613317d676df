//! Page-numbering synchronization between the two documents
//!
//! A diff that reflows text across a page boundary in only one document
//! makes naive 1:1 page alignment useless. Before each span's regions are
//! placed, the synchronizer compares the two anchor words' effective pages
//! and inserts placeholder pages into the document that fell behind, unless
//! a coverage heuristic attributes a gap of one to natural pagination.

use crate::annot::{DocumentId, MISSING_PAGE_MARKER, PageInsertion};
use crate::geometry::Rect;
use crate::word::WordItem;
use std::cmp::Ordering;

/// Pages inserted so far into each document. Both counters only grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSyncState {
    pub inserted_a: usize,
    pub inserted_b: usize,
}

/// Word at `index`, clamped to the last word. A span deleting the very end
/// of a document indexes one past it; the last word is the anchor then.
fn index_or_last(words: &[WordItem], index: usize) -> Option<&WordItem> {
    words.get(index).or_else(|| words.last())
}

/// Threads the sync state through a comparison run and collects the
/// placeholder pages it decides to insert.
#[derive(Debug)]
pub struct PageSynchronizer<'a> {
    pages_a: &'a [Rect],
    pages_b: &'a [Rect],
    threshold: f32,
    state: PageSyncState,
    insertions: Vec<PageInsertion>,
}

impl<'a> PageSynchronizer<'a> {
    pub fn new(pages_a: &'a [Rect], pages_b: &'a [Rect], threshold: f32) -> Self {
        Self {
            pages_a,
            pages_b,
            threshold,
            state: PageSyncState::default(),
            insertions: Vec::new(),
        }
    }

    pub fn state(&self) -> PageSyncState {
        self.state
    }

    /// Align both documents' effective page numbers for the span anchored
    /// at `start_a` / `start_b`. Runs before the span's regions are
    /// materialized. A side with no words leaves the state untouched.
    pub fn synchronize(
        &mut self,
        words_a: &[WordItem],
        start_a: usize,
        words_b: &[WordItem],
        start_b: usize,
    ) {
        let (Some(anchor_a), Some(anchor_b)) =
            (index_or_last(words_a, start_a), index_or_last(words_b, start_b))
        else {
            return;
        };
        loop {
            let page_a = anchor_a.page() + self.state.inserted_a;
            let page_b = anchor_b.page() + self.state.inserted_b;
            match page_a.cmp(&page_b) {
                Ordering::Equal => break,
                Ordering::Less => {
                    if page_b - page_a == 1
                        && self.natural_pagination(anchor_a, self.pages_a, anchor_b, self.pages_b)
                    {
                        break;
                    }
                    self.insert_placeholder(DocumentId::A, anchor_a);
                }
                Ordering::Greater => {
                    if page_a - page_b == 1
                        && self.natural_pagination(anchor_b, self.pages_b, anchor_a, self.pages_a)
                    {
                        break;
                    }
                    self.insert_placeholder(DocumentId::B, anchor_b);
                }
            }
        }
    }

    /// Coverage heuristic for a page gap of exactly one: how much of the
    /// trailing page the behind document has used, plus how much of the
    /// leading page the ahead document has left. At or above the threshold
    /// the offset is ordinary reflow and no page is inserted.
    fn natural_pagination(
        &self,
        behind: &WordItem,
        behind_pages: &[Rect],
        ahead: &WordItem,
        ahead_pages: &[Rect],
    ) -> bool {
        let behind_height = behind_pages[behind.page() - 1].height();
        let ahead_height = ahead_pages[ahead.page() - 1].height();
        let used = behind.bbox().y1 / behind_height;
        let remaining = (ahead_height - ahead.bbox().y1) / ahead_height;
        used + remaining >= self.threshold
    }

    /// Insert a placeholder before the anchor's effective page, or after it
    /// when the anchor sits on the document's last original page.
    fn insert_placeholder(&mut self, document: DocumentId, anchor: &WordItem) {
        let (pages, inserted) = match document {
            DocumentId::A => (self.pages_a, &mut self.state.inserted_a),
            DocumentId::B => (self.pages_b, &mut self.state.inserted_b),
        };
        let page = anchor.page();
        let at_page = if page == pages.len() {
            page + *inserted + 1
        } else {
            page + *inserted
        };
        self.insertions.push(PageInsertion {
            document,
            at_page,
            size: pages[page - 1],
            marker: MISSING_PAGE_MARKER.to_string(),
        });
        *inserted += 1;
    }

    /// Pad the shorter document with trailing placeholders until both
    /// final page counts match.
    pub fn pad_trailing(&mut self) {
        loop {
            let total_a = self.pages_a.len() + self.state.inserted_a;
            let total_b = self.pages_b.len() + self.state.inserted_b;
            let (document, total, own_pages, other_pages) = match total_a.cmp(&total_b) {
                Ordering::Equal => break,
                Ordering::Less => (DocumentId::A, total_a, self.pages_a, self.pages_b),
                Ordering::Greater => (DocumentId::B, total_b, self.pages_b, self.pages_a),
            };
            let Some(size) = own_pages.last().or_else(|| other_pages.last()).copied() else {
                break;
            };
            self.insertions.push(PageInsertion {
                document,
                at_page: total + 1,
                size,
                marker: MISSING_PAGE_MARKER.to_string(),
            });
            match document {
                DocumentId::A => self.state.inserted_a += 1,
                DocumentId::B => self.state.inserted_b += 1,
            }
        }
    }

    pub fn finish(self) -> (PageSyncState, Vec<PageInsertion>) {
        (self.state, self.insertions)
    }
}
