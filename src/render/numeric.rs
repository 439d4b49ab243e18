//! Heuristic removal of numeric table rows.
//!
//! Tabular numeric data (page numbers, financial tables) is usually noise for
//! text retrieval. A line is dropped when more than 40% of its words contain a
//! digit, unless it ends with a period and so reads like a sentence.

use regex::Regex;

/// Share of digit-bearing words above which a line counts as a table row.
pub const DIGIT_RATIO_THRESHOLD: f64 = 0.4;

/// Decimal digits plus other digit forms such as superscripts (`²`).
const DIGIT_PATTERN: &str = r"[\p{Nd}\p{No}]";

/// Line-local numeric table filter.
#[derive(Debug, Clone)]
pub struct NumericTableFilter {
    digit: Regex,
}

impl NumericTableFilter {
    /// Create a new filter.
    pub fn new() -> Self {
        Self {
            digit: Regex::new(DIGIT_PATTERN).expect("digit pattern is valid"),
        }
    }

    /// Filter a page. Returns the page unchanged when `enabled` is false.
    pub fn filter(&self, page: &str, enabled: bool) -> String {
        self.filter_with_count(page, enabled).0
    }

    /// Filter a page and report how many lines were dropped.
    ///
    /// Kept lines keep the line break that followed them in the input, so
    /// nothing but the dropped lines is lost.
    pub fn filter_with_count(&self, page: &str, enabled: bool) -> (String, usize) {
        if !enabled {
            return (page.to_string(), 0);
        }

        let mut removed = 0;
        let kept: Vec<(&str, &str)> = lines_with_breaks(page)
            .into_iter()
            .filter(|(line, _)| {
                if self.is_numeric_row(line) {
                    log::debug!("Removing numeric line '{}'", line);
                    removed += 1;
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut output = String::with_capacity(page.len());
        for (i, (line, line_break)) in kept.iter().enumerate() {
            output.push_str(line);
            if i + 1 < kept.len() {
                output.push_str(line_break);
            }
        }

        (output, removed)
    }

    /// Whether a single line looks like a numeric table row.
    pub fn is_numeric_row(&self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return false;
        }

        let digits = words.iter().filter(|w| self.digit.is_match(w)).count();
        let ratio = digits as f64 / words.len() as f64;

        ratio > DIGIT_RATIO_THRESHOLD && !line.trim().ends_with('.')
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{1C}'..='\u{1E}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into `(line, line_break)` pairs. `\r\n` counts as one break;
/// the last pair always has an empty break.
fn lines_with_breaks(text: &str) -> Vec<(&str, &str)> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            end += 1;
        }
        lines.push((&text[start..i], &text[i..end]));
        start = end;
    }

    lines.push((&text[start..], ""));
    lines
}

impl Default for NumericTableFilter {
    fn default() -> Self {
        Self::new()
    }
}
