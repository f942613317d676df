//! The comparison pipeline
//!
//! Strict, synchronous pipeline over one document pair: ingest draw events,
//! reconstruct both word sequences, diff them, then walk the differing
//! spans emitting highlight regions in lockstep with page synchronization.

use crate::annot::{AnnotationRegion, Color, DocumentId, PageInsertion};
use crate::chunk::Chunk;
use crate::diff::{DiffKind, DiffSpan, compute_diff};
use crate::error::{Error, Result};
use crate::event::{DrawEvent, ImageRegistry};
use crate::geometry::Rect;
use crate::pagesync::PageSynchronizer;
use crate::region::synthesize_regions;
use crate::word::reconstruct;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Externally tunable parameters of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub color_added: Color,
    pub color_deleted: Color,
    pub color_changed: Color,
    /// Coverage sum at or above which a page gap of one reads as natural
    /// pagination instead of a missing page.
    pub insert_page_threshold: f32,
    /// Perpendicular-distance tolerance for same-line equality.
    pub line_tolerance: f32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            color_added: Color::GREEN,
            color_deleted: Color::RED,
            color_changed: Color::YELLOW,
            insert_page_threshold: 0.75,
            line_tolerance: 1.0,
        }
    }
}

/// One document's pages as the engine sees them.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
    /// Page sizes in document order; page `n` is `page_sizes[n - 1]`.
    pub page_sizes: Vec<Rect>,
    /// Draw events in any order.
    pub events: Vec<DrawEvent>,
}

/// Everything the external annotation writer needs to materialize the
/// comparison: regions and placeholder pages per document, with final page
/// counts guaranteed equal so pages can be interleaved side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareReport {
    pub regions_a: Vec<AnnotationRegion>,
    pub regions_b: Vec<AnnotationRegion>,
    pub insertions: Vec<PageInsertion>,
    pub page_count_a: usize,
    pub page_count_b: usize,
    pub spans: Vec<DiffSpan>,
    pub difference_count: usize,
    /// Header line for the writer to stamp on the first page.
    pub summary: String,
}

impl CompareReport {
    /// Serialize for a writer living across a process boundary.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compares two documents' draw-event streams.
#[derive(Debug, Clone, Default)]
pub struct Comparer {
    pub options: CompareOptions,
}

impl Comparer {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    /// Run the full pipeline. Fails fast on collaborator contract
    /// violations and degenerate geometry; an empty document is a valid
    /// input and diffs as all-inserted or all-deleted.
    pub fn compare(&self, a: DocumentInput, b: DocumentInput) -> Result<CompareReport> {
        let DocumentInput {
            page_sizes: pages_a,
            events: events_a,
        } = a;
        let DocumentInput {
            page_sizes: pages_b,
            events: events_b,
        } = b;

        // one registry across both documents: identical images must share
        // a token to diff as equal
        let mut registry = ImageRegistry::new();
        let chunks_a = ingest(events_a, pages_a.len(), &mut registry)?;
        let chunks_b = ingest(events_b, pages_b.len(), &mut registry)?;
        debug!(
            "ingested {} + {} chunks, {} distinct images",
            chunks_a.len(),
            chunks_b.len(),
            registry.len()
        );

        let tolerance = self.options.line_tolerance;
        #[cfg(feature = "parallel")]
        let (words_a, words_b) = rayon::join(
            move || reconstruct(chunks_a, tolerance),
            move || reconstruct(chunks_b, tolerance),
        );
        #[cfg(not(feature = "parallel"))]
        let (words_a, words_b) = (
            reconstruct(chunks_a, tolerance),
            reconstruct(chunks_b, tolerance),
        );
        debug!("reconstructed {} + {} words", words_a.len(), words_b.len());

        let spans = compute_diff(&words_a, &words_b);
        let changed: Vec<DiffSpan> = spans
            .iter()
            .copied()
            .filter(|span| span.kind != DiffKind::Unchanged)
            .collect();
        info!("{} differing spans", changed.len());

        let mut synchronizer =
            PageSynchronizer::new(&pages_a, &pages_b, self.options.insert_page_threshold);
        let mut regions_a = Vec::new();
        let mut regions_b = Vec::new();
        for (index, span) in changed.iter().enumerate() {
            synchronizer.synchronize(&words_a, span.start_a, &words_b, span.start_b);
            let comment = format!("difference {} of {}", index + 1, changed.len());
            let color = self.span_color(span.kind);
            let state = synchronizer.state();
            regions_a.extend(synthesize_regions(
                &words_a,
                span.start_a,
                span.count_a,
                DocumentId::A,
                state.inserted_a,
                color,
                &comment,
            ));
            regions_b.extend(synthesize_regions(
                &words_b,
                span.start_b,
                span.count_b,
                DocumentId::B,
                state.inserted_b,
                color,
                &comment,
            ));
        }
        synchronizer.pad_trailing();
        let (state, insertions) = synchronizer.finish();
        if !insertions.is_empty() {
            info!("inserted {} placeholder pages", insertions.len());
        }

        Ok(CompareReport {
            regions_a,
            regions_b,
            page_count_a: pages_a.len() + state.inserted_a,
            page_count_b: pages_b.len() + state.inserted_b,
            insertions,
            difference_count: changed.len(),
            summary: format!("differences found: {}", changed.len()),
            spans,
        })
    }

    fn span_color(&self, kind: DiffKind) -> Color {
        match kind {
            DiffKind::Inserted => self.options.color_added,
            DiffKind::Deleted => self.options.color_deleted,
            DiffKind::Replaced | DiffKind::Unchanged => self.options.color_changed,
        }
    }
}

/// Validate draw events against the document's page list and convert them
/// into chunks, assigning image tokens from the shared registry.
fn ingest(
    events: Vec<DrawEvent>,
    page_count: usize,
    registry: &mut ImageRegistry,
) -> Result<Vec<Chunk>> {
    events
        .into_iter()
        .map(|event| {
            let page = event.page();
            if page == 0 || page > page_count {
                return Err(Error::argument(format!(
                    "event references page {page} of a {page_count}-page document"
                )));
            }
            match event {
                DrawEvent::Text(run) => Chunk::from_text_run(run),
                DrawEvent::Image(placement) => {
                    let token = registry.token_for(&placement.content);
                    Chunk::from_image(&placement, token)
                }
            }
        })
        .collect()
}
