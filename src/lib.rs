//! Canon CLI - scripture corpus normalization and structured extraction
//!
//! Canon reconciles plain-text scriptural corpora against a compiled-in
//! canonical index (book → chapter → verse counts). It renumbers unmarked
//! text into chapter-segmented, verse-numbered form with a per-book
//! validation summary, extracts chapter-marked text into a nested
//! language → book → chapter → verse JSON document, and generates the
//! companion word dictionaries used downstream.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{BibleTree, BookSummary, CanonIndex, CanonicalBook};
