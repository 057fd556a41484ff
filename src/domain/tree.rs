//! Nested language → book → chapter → verse mapping
//!
//! Keys are kept exactly as they appeared in the source (chapter and verse
//! labels are strings, never renumbered) and insertion order is preserved,
//! which is why the crate enables `serde_json`'s `preserve_order` feature.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Counts of committed entries under one language key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TreeStats {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
}

/// The structured output document, keyed by language at the top level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BibleTree(Map<String, Value>);

impl BibleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure the language key exists, creating an empty map if not.
    pub fn ensure_language(&mut self, language: &str) {
        child_map(&mut self.0, language);
    }

    /// Opens a chapter under `language`/`book`, replacing any same-label
    /// chapter map committed earlier in this run.
    pub fn open_chapter(&mut self, language: &str, book: &str, chapter: &str) {
        let book_map = child_map(child_map(&mut self.0, language), book);
        book_map.insert(chapter.to_string(), Value::Object(Map::new()));
    }

    /// Commits one verse, creating any missing intermediate maps.
    pub fn insert_verse(
        &mut self,
        language: &str,
        book: &str,
        chapter: &str,
        verse: &str,
        text: &str,
    ) {
        let chapter_map = child_map(
            child_map(child_map(&mut self.0, language), book),
            chapter,
        );
        chapter_map.insert(verse.to_string(), Value::String(text.to_string()));
    }

    /// Book map for a language, if present.
    pub fn language(&self, language: &str) -> Option<&Map<String, Value>> {
        self.0.get(language).and_then(Value::as_object)
    }

    /// Verse text, if present.
    pub fn verse(&self, language: &str, book: &str, chapter: &str, verse: &str) -> Option<&str> {
        self.language(language)?
            .get(book)?
            .as_object()?
            .get(chapter)?
            .as_object()?
            .get(verse)?
            .as_str()
    }

    /// Committed-entry counts under a language key.
    pub fn stats(&self, language: &str) -> TreeStats {
        let mut stats = TreeStats::default();
        let Some(books) = self.language(language) else {
            return stats;
        };
        stats.books = books.len();
        for chapters in books.values().filter_map(Value::as_object) {
            stats.chapters += chapters.len();
            for verses in chapters.values().filter_map(Value::as_object) {
                stats.verses += verses.len();
            }
        }
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}

/// Returns the object under `key`, inserting an empty one when absent.
/// A non-object value under the key is replaced; only the engines write
/// these trees, and they only ever nest objects.
fn child_map<'m>(map: &'m mut Map<String, Value>, key: &str) -> &'m mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just set to an object"),
    }
}
