//! `canon format` - renumbering and validation

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};

use super::output::Output;
use crate::domain::{renumber, BookSummary, CanonIndex};
use crate::storage::Config;

pub fn run(
    output: &Output,
    config: &Config,
    input: &Path,
    out_path: Option<&Path>,
    log_path: Option<&Path>,
) -> Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))?;

    output.verbose(&format!("Renumbering {}", input.display()));
    let canon = CanonIndex::standard();
    let (formatted, summary) = renumber(&raw, &canon);

    let out_path = out_path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.formatted_filename));
    fs::write(&out_path, &formatted)
        .with_context(|| format!("Failed to write numbered text: {}", out_path.display()))?;

    let log_path = log_path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.summary_filename));
    write_summary_log(&log_path, &summary)?;

    let good = summary.iter().filter(|e| e.is_good()).count();
    let missing = summary.iter().filter(|e| e.is_missing()).count();
    let mismatched = summary.len() - good - missing;

    output.success(&format!(
        "Wrote numbered text to {} (summary log: {})",
        out_path.display(),
        log_path.display()
    ));
    output.success(&format!(
        "{} good, {} mismatched, {} missing",
        good, mismatched, missing
    ));

    if output.is_json() {
        output.data(&serde_json::json!({
            "output": out_path.display().to_string(),
            "log": log_path.display().to_string(),
            "good": good,
            "mismatched": mismatched,
            "missing": missing,
            "summary": summary,
        }));
    }

    Ok(())
}

/// Writes the summary log: a generated-at header, then one line per book
/// in the order the scan produced them.
fn write_summary_log(path: &Path, summary: &[BookSummary]) -> Result<()> {
    let mut content = String::new();
    writeln!(
        content,
        "# generated {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    for entry in summary {
        writeln!(content, "{}", entry)?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write summary log: {}", path.display()))
}
