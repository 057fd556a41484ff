//! On-disk storage for the structured document
//!
//! The document accumulates languages across runs, so saving is a
//! load / deep-merge / rewrite cycle. Writes go through a temp file with an
//! exclusive lock and an atomic rename.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde_json::Value;

use crate::domain::BibleTree;

/// Store for the structured document at a fixed path
pub struct TreeStore {
    path: PathBuf,
}

/// Result of loading the on-disk document
pub struct LoadedDocument {
    pub tree: BibleTree,
    /// True when an existing file could not be parsed and was discarded
    pub recovered: bool,
}

impl TreeStore {
    /// Creates a store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the existing document. A missing file yields an empty tree; a
    /// file that is not valid JSON is treated as absent, flagged so the
    /// caller can warn before it gets overwritten.
    pub fn load(&self) -> Result<LoadedDocument> {
        if !self.path.exists() {
            return Ok(LoadedDocument {
                tree: BibleTree::new(),
                recovered: false,
            });
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read document: {}", self.path.display()))?;

        match serde_json::from_str(&content) {
            Ok(tree) => Ok(LoadedDocument {
                tree,
                recovered: false,
            }),
            Err(_) => Ok(LoadedDocument {
                tree: BibleTree::new(),
                recovered: true,
            }),
        }
    }

    /// Writes the document: temp file, exclusive lock, atomic rename.
    /// Pretty output uses 2-space indentation; either way UTF-8 text is
    /// written unescaped.
    pub fn save(&self, tree: &BibleTree, minify: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on document")?;

            let mut writer = BufWriter::new(&file);
            let json = if minify {
                serde_json::to_string(tree)
            } else {
                serde_json::to_string_pretty(tree)
            }
            .context("Failed to serialize document")?;

            writer
                .write_all(json.as_bytes())
                .context("Failed to write document")?;
            writer.flush().context("Failed to flush document")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

/// Deep-merges one language subtree of `parsed` into `target`.
///
/// A new language key is inserted wholesale. An existing language merges
/// book-by-book; an existing book takes the incoming chapter maps at their
/// chapter keys, overwriting same-key chapters and keeping the rest.
pub fn merge_language(target: &mut BibleTree, language: &str, parsed: &BibleTree) {
    let Some(incoming) = parsed.language(language) else {
        return;
    };

    let target_map = target.as_map_mut();
    let Some(existing_lang) = target_map.get_mut(language).and_then(Value::as_object_mut) else {
        target_map.insert(language.to_string(), Value::Object(incoming.clone()));
        return;
    };

    for (book, incoming_book) in incoming {
        match existing_lang.get_mut(book).and_then(Value::as_object_mut) {
            Some(existing_book) => {
                if let Some(chapters) = incoming_book.as_object() {
                    for (chapter, chapter_map) in chapters {
                        existing_book.insert(chapter.clone(), chapter_map.clone());
                    }
                }
            }
            None => {
                existing_lang.insert(book.clone(), incoming_book.clone());
            }
        }
    }
}
