//! `canon extract` - structured extraction and document merge

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::{extract, BibleTree};
use crate::storage::{merge_language, Config, TreeStore};

pub fn run(
    output: &Output,
    config: &Config,
    input: &Path,
    language: Option<&str>,
    out_path: Option<&Path>,
) -> Result<()> {
    let language = language.unwrap_or(&config.default_language).to_string();
    if !config.language_allowed(&language) {
        bail!(
            "unknown language key '{}' (configured: {})",
            language,
            config.languages.join(", ")
        );
    }

    let file =
        File::open(input).with_context(|| format!("Failed to open input: {}", input.display()))?;
    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("Failed to read input: {}", input.display()))?;

    output.verbose(&format!(
        "Parsing {} for language '{}'",
        input.display(),
        language
    ));

    // Warnings and errors always reach the user; discovery chatter only in
    // verbose mode.
    let mut parsed = BibleTree::new();
    let mut reporter = |message: &str| {
        if message.starts_with("WARNING") || message.starts_with("ERROR") {
            output.warn(message);
        } else {
            output.verbose(message);
        }
    };
    let ok = extract(lines.iter(), &language, &mut parsed, &mut reporter);

    if !ok {
        bail!("failed to parse {}", input.display());
    }

    let out_path = out_path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.tree_filename));
    let store = TreeStore::new(&out_path);

    let loaded = store.load()?;
    if loaded.recovered {
        output.warn(&format!(
            "WARNING: existing document {} is not valid JSON, overwriting",
            out_path.display()
        ));
    }

    let mut document = loaded.tree;
    merge_language(&mut document, &language, &parsed);
    store.save(&document, false)?;

    let stats = parsed.stats(&language);
    output.success(&format!(
        "Merged '{}' into {}: {} books, {} chapters, {} verses",
        language,
        out_path.display(),
        stats.books,
        stats.chapters,
        stats.verses
    ));

    if output.is_json() {
        output.data(&serde_json::json!({
            "language": language,
            "output": out_path.display().to_string(),
            "books": stats.books,
            "chapters": stats.chapters,
            "verses": stats.verses,
        }));
    }

    Ok(())
}
