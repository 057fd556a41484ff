//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{dict_cmd, extract_cmd, format_cmd};
use crate::domain::CanonIndex;
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "canon")]
#[command(author, version, about = "Scripture corpus normalization, validation and extraction")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Renumber an unmarked corpus and validate it against the canon
    ///
    /// Every non-blank input line is either a book heading or one unnumbered
    /// verse. The output text gains chapter markers and verse numbers; the
    /// summary log records Good/mismatch/missing per canonical book.
    Format {
        /// Input text file (book headings + unnumbered verse lines)
        input: PathBuf,

        /// Output path for the numbered text
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output path for the per-book summary log
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Parse a chapter-marked corpus into the structured document
    ///
    /// Expects explicit chapter markers ("Chapter N" or a locale variant)
    /// and numbered verse-start lines; verses may continue over several
    /// physical lines. The result is merged into the output document under
    /// the language key.
    Extract {
        /// Input text file
        input: PathBuf,

        /// Language key for the top-level grouping
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Output document to create or merge into
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Build a filtered word dictionary from a source lexicon
    Dict {
        /// Source lexicon: Wiktionary-style .jsonl or a flat word map .json
        source: PathBuf,

        /// Newline-delimited exclusion list
        #[arg(long)]
        exclude: Option<PathBuf>,

        /// Output path for the dictionary JSON
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Minimum word length in characters
        #[arg(long)]
        min_len: Option<usize>,

        /// Maximum word length in characters
        #[arg(long)]
        max_len: Option<usize>,

        /// Percentage of surviving words to randomly discard
        #[arg(long)]
        reduction: Option<f64>,

        /// Language code kept from a .jsonl source
        #[arg(long, default_value = "en")]
        lang_code: String,

        /// Write indented JSON instead of minified
        #[arg(long)]
        pretty: bool,

        /// Seed for the reduction shuffle (reproducible output)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the canonical books with their chapter and verse counts
    Books,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Canon CLI starting");
    let config = Config::load()?;

    match cli.command {
        Commands::Format { input, output: out, log } => {
            format_cmd::run(&output, &config, &input, out.as_deref(), log.as_deref())?
        }

        Commands::Extract {
            input,
            language,
            output: out,
        } => extract_cmd::run(&output, &config, &input, language.as_deref(), out.as_deref())?,

        Commands::Dict {
            source,
            exclude,
            output: out,
            min_len,
            max_len,
            reduction,
            lang_code,
            pretty,
            seed,
        } => dict_cmd::run(
            &output,
            &config,
            dict_cmd::DictRequest {
                source: &source,
                exclude: exclude.as_deref(),
                output: out.as_deref(),
                min_len,
                max_len,
                reduction,
                lang_code: &lang_code,
                pretty,
                seed,
            },
        )?,

        Commands::Books => books(&output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Lists the canonical index
fn books(output: &Output) -> Result<()> {
    let canon = CanonIndex::standard();

    if output.is_json() {
        let items: Vec<_> = canon
            .iter()
            .map(|book| {
                serde_json::json!({
                    "name": book.name,
                    "chapters": book.chapter_count(),
                    "verses": book.total_verses(),
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!("{:<16} {:>8} {:>8}", "BOOK", "CHAPTERS", "VERSES");
        println!("{}", "-".repeat(34));
        for book in canon.iter() {
            println!(
                "{:<16} {:>8} {:>8}",
                book.name,
                book.chapter_count(),
                book.total_verses()
            );
        }
        println!();
        println!("{} books", canon.len());
    }

    Ok(())
}
