//! pdfdelta - positional text reconstruction and diff annotation
//!
//! Compares two paged documents given their positioned glyph/image draw
//! events: reconstructs words and images with geometric bounds, computes a
//! word-granularity diff, maps each differing span onto highlight regions
//! on the correct pages, and keeps page numbering synchronized by
//! inserting placeholder pages where one document fell behind.
//!
//! # Modules
//!
//! - `event` - draw-event input boundary and image identity registry
//! - `chunk` - positioned chunks with their geometric sort order
//! - `word` - word reconstruction from sorted chunks
//! - `diff` - word-level diff spans
//! - `region` - diff-span region synthesis
//! - `pagesync` - page-numbering synchronization
//! - `annot` - annotation output model
//! - `compare` - the pipeline tying the stages together

pub mod annot;
pub mod chunk;
pub mod compare;
pub mod diff;
pub mod error;
pub mod event;
pub mod geometry;
pub mod pagesync;
pub mod region;
pub mod word;

pub use annot::{AnnotationRegion, Color, DocumentId, PageInsertion, RegionShape};
pub use compare::{CompareOptions, CompareReport, Comparer, DocumentInput};
pub use diff::{DiffKind, DiffSpan, compute_diff};
pub use error::{Error, Result};
pub use event::{DrawEvent, ImagePlacement, ImageRegistry, ImageToken, TextRun};
pub use word::{WordItem, reconstruct};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
