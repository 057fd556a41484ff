//! Domain models and engines
//!
//! Contains the core corpus-processing logic without any I/O concerns.

mod canon;
mod dictionary;
mod extraction;
mod line;
mod numbering;
mod tree;

pub use canon::{CanonIndex, CanonicalBook};
pub use dictionary::{
    clean_romanian_definition, reduce, DictionaryBuilder, FilterOptions, SourceFormat, WordMap,
};
pub use extraction::{extract, Extractor, Reporter};
pub use line::{classify, clean, LineKind, Lookback, CHAPTER_KEYWORDS};
pub use numbering::{renumber, BookSummary, Renumberer};
pub use tree::{BibleTree, TreeStats};
