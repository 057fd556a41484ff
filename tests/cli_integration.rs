//! CLI integration tests for Canon
//!
//! These tests drive the binary end to end: renumbering with validation,
//! structured extraction with on-disk merging, and dictionary generation.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the canon binary
fn canon_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("canon"))
}

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Unnumbered Ruth input: heading plus `verses` plain lines
fn ruth_input(verses: usize) -> String {
    let mut text = String::from("Ruth\n");
    for i in 0..verses {
        text.push_str(&format!("verse text {}\n", i + 1));
    }
    text
}

const MARKED_RUTH: &str = "Ruth\n\
Chapter 1\n\
1 In the days when the judges ruled\n\
2 A certain man of Bethlehem\n\
Chapter 2\n\
1 So Naomi returned\n";

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_format_complete_book() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", &ruth_input(85));

    canon_cmd()
        .current_dir(dir.path())
        .args(["format", "ruth.txt", "-o", "out.txt", "--log", "log.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 good, 0 mismatched, 65 missing"));

    let formatted = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(formatted.starts_with("RUTH\n\nChapter 1\n1 verse text 1"));
    assert!(formatted.contains("\n\nChapter 4\n1 verse text 64"));

    let log = fs::read_to_string(dir.path().join("log.txt")).unwrap();
    assert!(log.starts_with("# generated "));
    assert!(log.contains("RUTH - Good\n"));
    assert!(log.contains("GENESIS - Missing\n"));
}

#[test]
fn test_format_records_mismatch() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", &ruth_input(84));

    canon_cmd()
        .current_dir(dir.path())
        .args(["format", "ruth.txt", "-o", "out.txt", "--log", "log.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 good, 1 mismatched, 65 missing"));

    let log = fs::read_to_string(dir.path().join("log.txt")).unwrap();
    assert!(log.contains("RUTH overall expected 85 verses but found 84 verses.\n"));
    assert!(!log.contains("RUTH - Missing"));
}

#[test]
fn test_format_uses_configured_default_filenames() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", &ruth_input(85));

    canon_cmd()
        .current_dir(dir.path())
        .args(["format", "ruth.txt"])
        .assert()
        .success();

    assert!(dir.path().join("formatted_bible_niv.txt").is_file());
    assert!(dir.path().join("niv_summary_log.txt").is_file());
}

#[test]
fn test_format_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    canon_cmd()
        .current_dir(dir.path())
        .args(["format", "no-such-file.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input"));
}

#[test]
fn test_format_json_output() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", &ruth_input(85));

    canon_cmd()
        .current_dir(dir.path())
        .args(["format", "ruth.txt", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"good\":1"))
        .stdout(predicate::str::contains("\"missing\":65"));
}

// =============================================================================
// Extract Tests
// =============================================================================

#[test]
fn test_extract_builds_document() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", MARKED_RUTH);

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "ruth.txt", "-l", "english"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 books, 2 chapters, 3 verses",
        ));

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        doc["english"]["Ruth"]["1"]["1"],
        "In the days when the judges ruled"
    );
    assert_eq!(doc["english"]["Ruth"]["2"]["1"], "So Naomi returned");
}

#[test]
fn test_extract_joins_continuation_lines() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "ruth.txt",
        "Ruth\nChapter 1\n1 In the days when the judges\nruled there was a famine\n",
    );

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "ruth.txt"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        doc["english"]["Ruth"]["1"]["1"],
        "In the days when the judges ruled there was a famine"
    );
}

#[test]
fn test_extract_merges_languages_across_runs() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "english.txt", MARKED_RUTH);
    write_file(
        dir.path(),
        "romanian.txt",
        "Rut\nCapitolul 1\n1 Pe vremea judecatorilor\n",
    );

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "english.txt", "-l", "english"])
        .assert()
        .success();
    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "romanian.txt", "-l", "romanian"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        doc["english"]["Ruth"]["1"]["1"],
        "In the days when the judges ruled"
    );
    assert_eq!(doc["romanian"]["Rut"]["1"]["1"], "Pe vremea judecatorilor");
}

#[test]
fn test_extract_merges_new_book_into_existing_language() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", MARKED_RUTH);
    write_file(
        dir.path(),
        "jonah.txt",
        "Jonah\nChapter 1\n1 Now the word of the LORD\n",
    );

    for input in ["ruth.txt", "jonah.txt"] {
        canon_cmd()
            .current_dir(dir.path())
            .args(["extract", input, "-l", "english"])
            .assert()
            .success();
    }

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        doc["english"]["Ruth"]["1"]["1"],
        "In the days when the judges ruled"
    );
    assert_eq!(doc["english"]["Jonah"]["1"]["1"], "Now the word of the LORD");
}

#[test]
fn test_extract_chapter_before_book_fails() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "bad.txt", "Chapter 1\n1 text\n");

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "bad.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: chapter 'Chapter 1'"))
        .stderr(predicate::str::contains("failed to parse"));

    // Nothing was written
    assert!(!dir.path().join("bible_data.json").exists());
}

#[test]
fn test_extract_overwrites_corrupt_document() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", MARKED_RUTH);
    write_file(dir.path(), "bible_data.json", "{ not json at all");

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "ruth.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not valid JSON"));

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(doc["english"]["Ruth"].is_object());
}

#[test]
fn test_extract_rejects_unknown_language() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", MARKED_RUTH);

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "ruth.txt", "-l", "klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown language key 'klingon'"));
}

#[test]
fn test_extract_default_language_from_config() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "ruth.txt", MARKED_RUTH);
    write_file(dir.path(), "canon.toml", "default_language = \"romanian\"\n");

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "ruth.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 'romanian'"));

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(doc["romanian"]["Ruth"].is_object());
}

#[test]
fn test_extract_handles_bom_prefixed_input() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "ruth.txt",
        "\u{feff}Ruth\nChapter 1\n1 In the days\n",
    );

    canon_cmd()
        .current_dir(dir.path())
        .args(["extract", "ruth.txt"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("bible_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["english"]["Ruth"]["1"]["1"], "In the days");
}

// =============================================================================
// Dict Tests
// =============================================================================

#[test]
fn test_dict_from_word_map() {
    let dir = TempDir::new().unwrap();
    let source = serde_json::json!({
        "casă": "<b>CASĂ</b>, case, Clădire destinată locuirii. - Din lat. casa.",
        "om": "Too short to survive the filter.",
    })
    .to_string();
    write_file(dir.path(), "dex.json", &source);

    canon_cmd()
        .current_dir(dir.path())
        .args([
            "dict", "dex.json", "-o", "dict.json", "--reduction", "0", "--seed", "1", "--pretty",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 words"));

    let content = fs::read_to_string(dir.path().join("dict.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["CASĂ"], "Case, Clădire destinată locuirii.");
}

#[test]
fn test_dict_from_jsonl() {
    let dir = TempDir::new().unwrap();
    let lines = [
        serde_json::json!({
            "word": "house",
            "lang_code": "en",
            "senses": [{ "glosses": ["A building for living in."] }],
        })
        .to_string(),
        serde_json::json!({
            "word": "maison",
            "lang_code": "fr",
            "senses": [{ "glosses": ["A house."] }],
        })
        .to_string(),
    ];
    write_file(dir.path(), "lexicon.jsonl", &lines.join("\n"));

    canon_cmd()
        .current_dir(dir.path())
        .args([
            "dict",
            "lexicon.jsonl",
            "-o",
            "dict.json",
            "--reduction",
            "0",
            "--seed",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 words"));

    let content = fs::read_to_string(dir.path().join("dict.json")).unwrap();
    // Minified by default
    assert!(!content.contains('\n'));
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["HOUSE"], "A building for living in.");
}

#[test]
fn test_dict_with_exclusions() {
    let dir = TempDir::new().unwrap();
    let lines = [
        serde_json::json!({
            "word": "house",
            "lang_code": "en",
            "senses": [{ "glosses": ["A building."] }],
        })
        .to_string(),
        serde_json::json!({
            "word": "stone",
            "lang_code": "en",
            "senses": [{ "glosses": ["A mineral."] }],
        })
        .to_string(),
    ];
    write_file(dir.path(), "lexicon.jsonl", &lines.join("\n"));
    write_file(dir.path(), "excluded.txt", "house\n");

    canon_cmd()
        .current_dir(dir.path())
        .args([
            "dict",
            "lexicon.jsonl",
            "-o",
            "dict.json",
            "--exclude",
            "excluded.txt",
            "--reduction",
            "0",
            "--seed",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 words"));

    let content = fs::read_to_string(dir.path().join("dict.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(doc.get("HOUSE").is_none());
    assert_eq!(doc["STONE"], "A mineral.");
}

#[test]
fn test_dict_zero_matches_fails_without_output() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "dex.json", "{\"ab\": \"Too short.\"}");

    canon_cmd()
        .current_dir(dir.path())
        .args(["dict", "dex.json", "-o", "dict.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("found 0 words"));

    assert!(!dir.path().join("dict.json").exists());
}

// =============================================================================
// Books Tests
// =============================================================================

#[test]
fn test_books_lists_canon() {
    canon_cmd()
        .arg("books")
        .assert()
        .success()
        .stdout(predicate::str::contains("RUTH"))
        .stdout(predicate::str::contains("66 books"));
}

#[test]
fn test_books_json_output() {
    let output = canon_cmd()
        .args(["books", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let books: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 66);
    assert_eq!(books[0]["name"], "GENESIS");
    assert_eq!(books[7]["name"], "RUTH");
    assert_eq!(books[7]["verses"], 85);
}
