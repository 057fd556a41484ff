//! Line classification for segmented corpus text
//!
//! Chapter-marked input is classified into a closed set of line kinds before
//! any state transition happens, so the extraction machine dispatches on a
//! tagged value instead of re-testing patterns at each site.

use lazy_static::lazy_static;
use regex::Regex;

/// Chapter-keyword spellings recognized across corpus locales.
pub const CHAPTER_KEYWORDS: &[&str] = &["Chapter", "Capitolul"];

lazy_static! {
    static ref CHAPTER_MARKER: Regex = {
        let keywords = CHAPTER_KEYWORDS.join("|");
        Regex::new(&format!(r"^\s*(?:{keywords})\s+(\d+)\s*$")).unwrap()
    };
    static ref VERSE_START: Regex = Regex::new(r"^\s*(\d+)\s+(.*)$").unwrap();
}

/// Classified form of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty after cleaning; carries no state transition
    Blank,
    /// Chapter keyword plus number; the label is the digits as written
    ChapterMarker { label: &'a str },
    /// Leading integer then text; both kept as written
    VerseStart { label: &'a str, text: &'a str },
    /// Anything else: a continuation when a verse is open, unrecognized otherwise
    Text(&'a str),
}

/// Strips a leading byte-order mark and surrounding whitespace.
pub fn clean(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

/// Classifies a cleaned line. Chapter markers take priority over verse starts.
pub fn classify(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = CHAPTER_MARKER.captures(line) {
        if let Some(label) = caps.get(1) {
            return LineKind::ChapterMarker {
                label: label.as_str(),
            };
        }
    }
    if let Some(caps) = VERSE_START.captures(line) {
        if let (Some(label), Some(text)) = (caps.get(1), caps.get(2)) {
            return LineKind::VerseStart {
                label: label.as_str(),
                text: text.as_str(),
            };
        }
    }
    LineKind::Text(line)
}

/// Sliding window over the last two non-blank lines.
///
/// Book identity is inferred from the line immediately preceding a
/// "Chapter 1" marker, so the window must hold exactly that line and
/// nothing older. Entries carry their 1-based line number for diagnostics.
#[derive(Debug, Default)]
pub struct Lookback {
    older: Option<(String, usize)>,
    newest: Option<(String, usize)>,
}

impl Lookback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a non-blank line, evicting the oldest of the two slots.
    pub fn push(&mut self, line: &str, number: usize) {
        self.older = self.newest.take();
        self.newest = Some((line.to_string(), number));
    }

    /// The second-to-last recorded line: when the newest entry is the line
    /// currently being processed, this is the line right before it.
    pub fn previous(&self) -> Option<(&str, usize)> {
        self.older.as_ref().map(|(line, num)| (line.as_str(), *num))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_bom_and_whitespace() {
        assert_eq!(clean("\u{feff}Ruth  "), "Ruth");
        assert_eq!(clean("  text "), "text");
        assert_eq!(clean("\u{feff}"), "");
    }

    #[test]
    fn classify_blank() {
        assert_eq!(classify(""), LineKind::Blank);
    }

    #[test]
    fn classify_chapter_markers() {
        assert_eq!(classify("Chapter 3"), LineKind::ChapterMarker { label: "3" });
        assert_eq!(
            classify("  Chapter 12  "),
            LineKind::ChapterMarker { label: "12" }
        );
        assert_eq!(
            classify("Capitolul 1"),
            LineKind::ChapterMarker { label: "1" }
        );
        // Leading zeros are kept as written
        assert_eq!(
            classify("Chapter 01"),
            LineKind::ChapterMarker { label: "01" }
        );
    }

    #[test]
    fn chapter_marker_requires_bare_number() {
        // Trailing text makes it an ordinary line, not a marker
        assert_eq!(
            classify("Chapter 3 begins"),
            LineKind::Text("Chapter 3 begins")
        );
        assert_eq!(classify("Chapter"), LineKind::Text("Chapter"));
    }

    #[test]
    fn classify_verse_starts() {
        assert_eq!(
            classify("1 In the days when the judges ruled"),
            LineKind::VerseStart {
                label: "1",
                text: "In the days when the judges ruled"
            }
        );
        assert_eq!(
            classify("22 So Naomi returned"),
            LineKind::VerseStart {
                label: "22",
                text: "So Naomi returned"
            }
        );
    }

    #[test]
    fn bare_number_is_not_a_verse_start() {
        assert_eq!(classify("12"), LineKind::Text("12"));
    }

    #[test]
    fn lookback_holds_exactly_two() {
        let mut window = Lookback::new();
        assert_eq!(window.previous(), None);

        window.push("Ruth", 1);
        assert_eq!(window.previous(), None);

        window.push("Chapter 1", 2);
        assert_eq!(window.previous(), Some(("Ruth", 1)));

        window.push("1 In the days", 3);
        assert_eq!(window.previous(), Some(("Chapter 1", 2)));
    }
}
