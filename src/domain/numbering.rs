//! Numbering and validation engine
//!
//! Consumes raw corpus text where every non-blank line is either a book
//! heading or one unnumbered verse, and produces chapter-segmented,
//! verse-numbered text plus a per-book validation summary against the
//! canonical index.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::canon::{CanonIndex, CanonicalBook};
use super::line::clean;

/// Per-book outcome of a validation scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookSummary {
    /// Found verse count matches the canonical total
    Good { book: String },
    /// Found verse count differs from the canonical total
    Mismatch {
        book: String,
        expected: u32,
        found: u32,
    },
    /// Canonical book never encountered in the input
    Missing { book: String },
}

impl BookSummary {
    pub fn book(&self) -> &str {
        match self {
            BookSummary::Good { book }
            | BookSummary::Mismatch { book, .. }
            | BookSummary::Missing { book } => book,
        }
    }

    pub fn is_good(&self) -> bool {
        matches!(self, BookSummary::Good { .. })
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, BookSummary::Missing { .. })
    }
}

impl fmt::Display for BookSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSummary::Good { book } => write!(f, "{} - Good", book),
            BookSummary::Mismatch {
                book,
                expected,
                found,
            } => write!(
                f,
                "{} overall expected {} verses but found {} verses.",
                book, expected, found
            ),
            BookSummary::Missing { book } => write!(f, "{} - Missing", book),
        }
    }
}

/// Line-by-line state of one numbering scan.
///
/// Owns the positional state (current book, chapter, verse) explicitly so
/// the transitions are visible in one place: [`Renumberer::feed`] routes each
/// line, `open_book`/`verse_line` mutate, `close_book` commits a summary
/// entry, and [`Renumberer::finish`] closes out the scan.
pub struct Renumberer<'a> {
    canon: &'a CanonIndex,
    current: Option<&'static CanonicalBook>,
    /// 1-based position into the current book's chapter lengths
    chapter: usize,
    /// Next verse number to assign within the current chapter
    verse: u32,
    found_in_book: u32,
    processed: HashSet<&'static str>,
    lines: Vec<String>,
    summary: Vec<BookSummary>,
}

impl<'a> Renumberer<'a> {
    pub fn new(canon: &'a CanonIndex) -> Self {
        Self {
            canon,
            current: None,
            chapter: 1,
            verse: 1,
            found_in_book: 0,
            processed: HashSet::new(),
            lines: Vec::new(),
            summary: Vec::new(),
        }
    }

    /// Routes one raw input line. Never fails: blank lines are skipped,
    /// verse text outside any book is dropped.
    pub fn feed(&mut self, raw: &str) {
        let line = clean(raw);
        if line.is_empty() {
            return;
        }

        if let Some(book) = self.canon.lookup(line) {
            self.close_book();
            self.open_book(book);
        } else if self.current.is_some() {
            self.verse_line(line);
        }
        // Verse text with no book open is dropped without a log entry.
    }

    /// Closes the scan: finalizes the open book and appends a `Missing`
    /// entry, in canonical order, for every book never encountered.
    pub fn finish(mut self) -> (String, Vec<BookSummary>) {
        self.close_book();

        for book in self.canon.iter() {
            if !self.processed.contains(book.name) {
                self.summary.push(BookSummary::Missing {
                    book: book.name.to_string(),
                });
            }
        }

        let text = self.lines.join("\n").trim().to_string();
        (text, self.summary)
    }

    fn open_book(&mut self, book: &'static CanonicalBook) {
        self.current = Some(book);
        self.chapter = 1;
        self.verse = 1;
        self.found_in_book = 0;

        // Blank line before the heading; first chapter marker follows it
        // immediately.
        self.lines.push(String::new());
        self.lines.push(book.name.to_string());
        self.lines.push(String::new());
        self.lines.push("Chapter 1".to_string());
    }

    fn verse_line(&mut self, text: &str) {
        let Some(book) = self.current else {
            return;
        };

        // Roll over before emitting. Once the chapter position passes the
        // last defined chapter, the check stops firing and verse numbers
        // keep climbing under the last marker.
        while book
            .chapter_len(self.chapter)
            .is_some_and(|len| self.verse > u32::from(len))
        {
            self.chapter += 1;
            self.verse = 1;
            if self.chapter <= book.chapter_count() {
                self.lines.push(String::new());
                self.lines.push(format!("Chapter {}", self.chapter));
            }
        }

        self.lines.push(format!("{} {}", self.verse, text));
        self.verse += 1;
        self.found_in_book += 1;
    }

    fn close_book(&mut self) {
        let Some(book) = self.current.take() else {
            return;
        };

        let expected = book.total_verses();
        let entry = if self.found_in_book == expected {
            BookSummary::Good {
                book: book.name.to_string(),
            }
        } else {
            BookSummary::Mismatch {
                book: book.name.to_string(),
                expected,
                found: self.found_in_book,
            }
        };
        self.summary.push(entry);
        self.processed.insert(book.name);
    }
}

/// Renumbers a whole corpus in one pass.
pub fn renumber(raw: &str, canon: &CanonIndex) -> (String, Vec<BookSummary>) {
    let mut engine = Renumberer::new(canon);
    for line in raw.lines() {
        engine.feed(line);
    }
    engine.finish()
}
