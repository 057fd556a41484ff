//! # Storage Layer
//!
//! File formats and configuration around the engines.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Structured document | JSON (insertion-ordered) | chosen output path, default `bible_data.json` |
//! | Config | TOML | `./canon.toml`, falling back to the user config dir |
//!
//! Document writes are atomic (temp file + rename) under an exclusive file
//! lock; a corrupt pre-existing document is treated as absent and reported
//! so the caller can warn before it gets overwritten.

mod config;
mod tree_store;

pub use config::{Config, ConfigError, DictionaryConfig};
pub use tree_store::{merge_language, LoadedDocument, TreeStore};
