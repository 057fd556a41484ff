//! `canon dict` - companion dictionary generation

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::output::Output;
use crate::domain::{reduce, DictionaryBuilder, FilterOptions, SourceFormat};
use crate::storage::Config;

/// Resolved arguments for one dictionary run
pub struct DictRequest<'a> {
    pub source: &'a Path,
    pub exclude: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub reduction: Option<f64>,
    pub lang_code: &'a str,
    pub pretty: bool,
    pub seed: Option<u64>,
}

pub fn run(output: &Output, config: &Config, request: DictRequest<'_>) -> Result<()> {
    let options = FilterOptions {
        min_len: request.min_len.unwrap_or(config.dictionary.min_len),
        max_len: request.max_len.unwrap_or(config.dictionary.max_len),
    };
    let reduction = request
        .reduction
        .unwrap_or(config.dictionary.reduction_percent);

    let mut builder = DictionaryBuilder::new(options);
    if let Some(exclude) = request.exclude {
        let file = File::open(exclude)
            .with_context(|| format!("Failed to open exclusion list: {}", exclude.display()))?;
        let exclusions = DictionaryBuilder::read_exclusions(BufReader::new(file))?;
        output.verbose(&format!("{} exclusion entries loaded", exclusions.len()));
        builder = builder.with_exclusions(exclusions);
    }

    let mut reporter = |message: &str| output.verbose(message);
    let words = match SourceFormat::from_path(request.source) {
        SourceFormat::WiktionaryJsonl => {
            output.verbose(&format!(
                "Reading JSONL lexicon {} (lang code '{}', length {}-{})",
                request.source.display(),
                request.lang_code,
                options.min_len,
                options.max_len
            ));
            let file = File::open(request.source)
                .with_context(|| format!("Failed to open source: {}", request.source.display()))?;
            builder.from_wiktionary_jsonl(BufReader::new(file), request.lang_code, &mut reporter)?
        }
        SourceFormat::WordMapJson => {
            output.verbose(&format!(
                "Reading word-map lexicon {} (length {}-{})",
                request.source.display(),
                options.min_len,
                options.max_len
            ));
            let text = fs::read_to_string(request.source)
                .with_context(|| format!("Failed to read source: {}", request.source.display()))?;
            builder.from_word_map_json(&text)?
        }
    };

    if words.is_empty() {
        bail!(
            "found 0 words matching the criteria (length {}-{}); no output written",
            options.min_len,
            options.max_len
        );
    }
    output.verbose(&format!("{} words matched the filters", words.len()));

    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let final_words = reduce(words, reduction, &mut rng);

    let out_path = request
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.dictionary.filename));
    let minify = !request.pretty && config.dictionary.minify;
    let json = if minify {
        serde_json::to_string(&final_words)
    } else {
        serde_json::to_string_pretty(&final_words)
    }
    .context("Failed to serialize dictionary")?;
    fs::write(&out_path, json)
        .with_context(|| format!("Failed to write dictionary: {}", out_path.display()))?;

    output.success(&format!(
        "Wrote {} words to {}",
        final_words.len(),
        out_path.display()
    ));

    if output.is_json() {
        output.data(&serde_json::json!({
            "output": out_path.display().to_string(),
            "words": final_words.len(),
            "reduction_percent": reduction,
        }));
    }

    Ok(())
}
