//! Structured extraction engine
//!
//! Consumes chapter-marked, verse-numbered corpus text and builds the
//! nested [`BibleTree`] mapping for one language key. Book identity is not
//! looked up anywhere: it is inferred from the line immediately preceding a
//! "Chapter 1" marker, which is the sole identification mechanism.

use super::line::{classify, clean, LineKind, Lookback};
use super::tree::BibleTree;

/// Synchronous sink for discovery events, warnings and the final summary.
///
/// The engine fires one message per event and never depends on what the
/// sink does with it; a collecting `Vec` closure works as well as a
/// terminal printer.
pub trait Reporter {
    fn emit(&mut self, message: &str);
}

impl<F: FnMut(&str)> Reporter for F {
    fn emit(&mut self, message: &str) {
        self(message)
    }
}

/// A verse whose continuation lines are still being collected
struct OpenVerse {
    number: String,
    fragments: Vec<String>,
}

/// Line-by-line state of one extraction scan.
pub struct Extractor<'a> {
    language: &'a str,
    current_book: Option<String>,
    current_chapter: Option<String>,
    open_verse: Option<OpenVerse>,
    lookback: Lookback,
    books_found: usize,
    chapters_found: usize,
    verses_found: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(language: &'a str) -> Self {
        Self {
            language,
            current_book: None,
            current_chapter: None,
            open_verse: None,
            lookback: Lookback::new(),
            books_found: 0,
            chapters_found: 0,
            verses_found: 0,
        }
    }

    /// Runs the scan over a line stream, committing into `tree` under this
    /// extractor's language key.
    ///
    /// Returns `false` on the single fatal condition: a chapter marker
    /// before any book has been identified. Everything committed before the
    /// abort stays in the tree; nothing for the failed region is added.
    pub fn run<I, R>(mut self, lines: I, tree: &mut BibleTree, reporter: &mut R) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        R: Reporter + ?Sized,
    {
        tree.ensure_language(self.language);

        for (idx, raw) in lines.into_iter().enumerate() {
            let number = idx + 1;
            let line = clean(raw.as_ref());

            // The window is updated before the line's own semantics are
            // evaluated, so when a marker is being handled the entry right
            // below the newest one is the line that preceded it.
            if !line.is_empty() {
                self.lookback.push(line, number);
            }

            match classify(line) {
                LineKind::Blank => continue,
                LineKind::ChapterMarker { label } => {
                    if !self.chapter_marker(label, line, number, tree, reporter) {
                        return false;
                    }
                }
                LineKind::VerseStart { label, text } => {
                    self.verse_start(label, text, line, number, tree, reporter)
                }
                LineKind::Text(text) => self.text_line(text, line, number, reporter),
            }
        }

        self.finalize_verse(tree);

        reporter.emit(&format!(
            "Summary for '{}': books found: {}, chapters found: {}, verses found: {}",
            self.language, self.books_found, self.chapters_found, self.verses_found
        ));
        true
    }

    /// Handles a chapter marker; returns `false` on the fatal
    /// no-book-context condition.
    fn chapter_marker<R: Reporter + ?Sized>(
        &mut self,
        label: &str,
        line: &str,
        number: usize,
        tree: &mut BibleTree,
        reporter: &mut R,
    ) -> bool {
        self.finalize_verse(tree);

        if label.parse::<u32>() == Ok(1) {
            match self.lookback.previous() {
                Some((preceding, preceding_number)) => {
                    // Adopt only a genuinely new name; a restarted chapter 1
                    // under the same heading must not re-announce the book.
                    if self.current_book.as_deref() != Some(preceding) {
                        self.current_book = Some(preceding.to_string());
                        self.books_found += 1;
                        reporter.emit(&format!(
                            "Found book: '{}' (from line {})",
                            preceding, preceding_number
                        ));
                    }
                }
                None => reporter.emit(&format!(
                    "WARNING: chapter 1 found without a preceding line to identify a book (line {})",
                    number
                )),
            }
        }

        let Some(book) = self.current_book.clone() else {
            reporter.emit(&format!(
                "ERROR: chapter '{}' found before any book name (line {}), aborting parse",
                line, number
            ));
            return false;
        };

        self.current_chapter = Some(label.to_string());
        tree.open_chapter(self.language, &book, label);
        self.chapters_found += 1;
        reporter.emit(&format!("Found chapter: {} (book: {})", label, book));
        true
    }

    fn verse_start<R: Reporter + ?Sized>(
        &mut self,
        label: &str,
        text: &str,
        line: &str,
        number: usize,
        tree: &mut BibleTree,
        reporter: &mut R,
    ) {
        self.finalize_verse(tree);

        if self.current_book.is_none() || self.current_chapter.is_none() {
            reporter.emit(&format!(
                "WARNING: skipping verse '{}' (no book/chapter context, line {})",
                line, number
            ));
            return;
        }

        self.open_verse = Some(OpenVerse {
            number: label.to_string(),
            fragments: vec![text.to_string()],
        });
        self.verses_found += 1;
    }

    fn text_line<R: Reporter + ?Sized>(
        &mut self,
        text: &str,
        line: &str,
        number: usize,
        reporter: &mut R,
    ) {
        if let Some(verse) = self.open_verse.as_mut() {
            verse.fragments.push(text.to_string());
        } else {
            reporter.emit(&format!(
                "WARNING: unrecognized line: '{}' (line {})",
                line, number
            ));
        }
    }

    /// Joins buffered fragments with single spaces and commits the verse.
    /// Clears the open-verse state unconditionally.
    fn finalize_verse(&mut self, tree: &mut BibleTree) {
        let Some(verse) = self.open_verse.take() else {
            return;
        };
        let (Some(book), Some(chapter)) = (&self.current_book, &self.current_chapter) else {
            return;
        };
        if verse.fragments.is_empty() {
            return;
        }

        let text = verse.fragments.join(" ").trim().to_string();
        tree.insert_verse(self.language, book, chapter, &verse.number, &text);
    }
}

/// Extracts one chapter-marked corpus into `tree` under `language`.
pub fn extract<I, R>(lines: I, language: &str, tree: &mut BibleTree, reporter: &mut R) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    R: Reporter + ?Sized,
{
    Extractor::new(language).run(lines, tree, reporter)
}
