//! Companion dictionary generation
//!
//! Filters a source lexicon down to a word → definition map suitable for the
//! downstream word games: length bounds, alphabet checks, an exclusion list,
//! definition cleanup, and an optional random reduction of the surviving set.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::extraction::Reporter;

/// Word → definition mapping in insertion order
pub type WordMap = Map<String, Value>;

/// Source lexicon layout, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// One JSON entry per line with `word`, `lang_code` and `senses[].glosses[]`
    WiktionaryJsonl,
    /// Flat word → definition JSON map with embedded HTML (DEX export)
    WordMapJson,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") => SourceFormat::WiktionaryJsonl,
            _ => SourceFormat::WordMapJson,
        }
    }
}

/// Word length bounds, measured in characters
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_len: 4,
            max_len: 9,
        }
    }
}

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref LEADING_LABEL: Regex = Regex::new(r"^[A-ZĂÂÎȘȚ,\s]+,").unwrap();
    static ref ETYMOLOGY_TAIL: Regex = Regex::new(r"-\s+Din\s+").unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"\(.+?\)").unwrap();
}

#[derive(Debug, Default, Deserialize)]
struct LexiconEntry {
    #[serde(default)]
    word: String,
    #[serde(default)]
    lang_code: String,
    #[serde(default)]
    senses: Vec<LexiconSense>,
}

#[derive(Debug, Default, Deserialize)]
struct LexiconSense {
    #[serde(default)]
    glosses: Vec<String>,
}

/// Builds filtered dictionaries from either source layout.
pub struct DictionaryBuilder {
    options: FilterOptions,
    exclusions: HashSet<String>,
}

impl DictionaryBuilder {
    pub fn new(options: FilterOptions) -> Self {
        Self {
            options,
            exclusions: HashSet::new(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: HashSet<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Reads a newline-delimited exclusion list; entries are matched
    /// lowercase.
    pub fn read_exclusions<B: BufRead>(reader: B) -> Result<HashSet<String>> {
        let mut exclusions = HashSet::new();
        for line in reader.lines() {
            let line = line.context("failed to read exclusion list")?;
            let word = line.trim().to_lowercase();
            if !word.is_empty() {
                exclusions.insert(word);
            }
        }
        Ok(exclusions)
    }

    /// Scans a Wiktionary-style JSONL export, keeping entries for
    /// `lang_code`. Malformed lines are skipped. Emits a progress message
    /// every 200k lines.
    pub fn from_wiktionary_jsonl<B, R>(
        &self,
        reader: B,
        lang_code: &str,
        reporter: &mut R,
    ) -> Result<WordMap>
    where
        B: BufRead,
        R: Reporter + ?Sized,
    {
        let mut words = WordMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line =
                line.with_context(|| format!("failed to read source line {}", idx + 1))?;
            if idx > 0 && idx % 200_000 == 0 {
                reporter.emit(&format!("scanned {} lines...", idx));
            }

            let Ok(entry) = serde_json::from_str::<LexiconEntry>(&line) else {
                continue;
            };
            if entry.lang_code != lang_code {
                continue;
            }

            let word = entry.word.to_uppercase();
            if !self.length_ok(&word)
                || !word.chars().all(char::is_alphabetic)
                || self.excluded(&word)
                || words.contains_key(&word)
            {
                continue;
            }

            let Some(gloss) = entry.senses.first().and_then(|s| s.glosses.first()) else {
                continue;
            };
            let definition = clean_gloss(gloss);
            if !definition.is_empty() {
                words.insert(word, Value::String(definition));
            }
        }

        Ok(words)
    }

    /// Reads a flat word → definition JSON map (DEX export), cleaning the
    /// HTML out of definitions. Only words over the Romanian uppercase
    /// alphabet survive.
    pub fn from_word_map_json(&self, text: &str) -> Result<WordMap> {
        let source: Map<String, Value> =
            serde_json::from_str(text).context("source dictionary is not a JSON object")?;

        let mut words = WordMap::new();
        for (raw_word, raw_definition) in source {
            let word = raw_word.to_uppercase();
            if !self.length_ok(&word)
                || !word.chars().all(is_romanian_letter)
                || self.excluded(&word)
                || words.contains_key(&word)
            {
                continue;
            }

            let Some(html) = raw_definition.as_str() else {
                continue;
            };
            let definition = clean_romanian_definition(html);
            if !definition.is_empty() {
                words.insert(word, Value::String(definition));
            }
        }

        Ok(words)
    }

    fn length_ok(&self, word: &str) -> bool {
        let len = word.chars().count();
        self.options.min_len <= len && len <= self.options.max_len
    }

    fn excluded(&self, word: &str) -> bool {
        self.exclusions.contains(&word.to_lowercase())
    }
}

/// Randomly discards `reduction_percent` of the words; the surviving map is
/// in shuffled order.
pub fn reduce(words: WordMap, reduction_percent: f64, rng: &mut impl Rng) -> WordMap {
    let mut keys: Vec<String> = words.keys().cloned().collect();
    keys.shuffle(rng);

    let keep = 1.0 - (reduction_percent / 100.0);
    let count = (keys.len() as f64 * keep) as usize;
    keys.truncate(count);

    let mut source = words;
    let mut reduced = WordMap::new();
    for key in keys {
        if let Some(definition) = source.remove(&key) {
            reduced.insert(key, definition);
        }
    }
    reduced
}

/// Strips parentheticals out of a Wiktionary gloss and capitalizes it.
fn clean_gloss(gloss: &str) -> String {
    let text = PARENTHETICAL.replace_all(gloss, "");
    capitalize(text.trim())
}

/// Cleans a DEX definition: drop HTML tags, the leading all-caps headword
/// label, and the trailing "- Din ..." etymology, then capitalize.
pub fn clean_romanian_definition(raw: &str) -> String {
    let text = HTML_TAG.replace_all(raw, "");
    let text = LEADING_LABEL.replace(&text, "");
    let text = ETYMOLOGY_TAIL
        .splitn(&text, 2)
        .next()
        .unwrap_or("")
        .to_string();
    capitalize(text.trim())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_romanian_letter(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, 'Ă' | 'Â' | 'Î' | 'Ș' | 'Ț')
}
