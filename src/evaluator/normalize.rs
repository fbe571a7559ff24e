//! Text canonicalization used by the algorithmic strategies.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"))
}

static NON_PRINTABLE_RE: OnceLock<Regex> = OnceLock::new();

/// Every general category `C*` character (control, format, surrogate,
/// private use, unassigned) except the ones that end a line.
fn non_printable_regex() -> &'static Regex {
    NON_PRINTABLE_RE.get_or_init(|| {
        Regex::new(r"[\p{C}&&[^\n\r\x0B\x0C\x1C-\x1E\x{85}]]")
            .expect("non-printable pattern is valid")
    })
}

/// Characters that end a line.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Removes control, format, private-use and unassigned characters. Line
/// breaks survive so the text can still be split into lines afterwards.
pub fn strip_non_printable(text: &str) -> String {
    non_printable_regex().replace_all(text, "").into_owned()
}

/// Strip, NFKC-normalize, split into lines, drop blank lines, then trim and
/// lower-case what remains.
pub fn normalized_lines(text: &str) -> Vec<String> {
    let normalized: String = strip_non_printable(text).nfkc().collect();
    normalized
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Case-insensitive set of word tokens.
pub fn word_tokens(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    word_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Renders a set as `{"a", "b"}`, sorted.
pub fn format_set<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let set: BTreeSet<&String> = items.into_iter().collect();
    format!("{set:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_zero_width_and_controls_but_keeps_newlines() {
        let text = "Pa\u{200B}ris\u{07}\nFrance\u{FEFF}";
        assert_eq!(strip_non_printable(text), "Paris\nFrance");
    }

    #[test]
    fn strips_every_other_category_character() {
        // U+08E2 is a format character, U+0378 is unassigned
        assert_eq!(normalized_lines("Pa\u{08E2}ris"), vec!["paris"]);
        assert_eq!(normalized_lines("Pa\u{0378}ris"), vec!["paris"]);
        assert_eq!(strip_non_printable("a\u{E000}b\u{1BCA0}c"), "abc");
        assert_eq!(strip_non_printable("a\u{2028}b\x0Bc"), "a\u{2028}b\x0Bc");
    }

    #[test]
    fn lines_are_trimmed_lowercased_and_blank_free() {
        let lines = normalized_lines("  Paris \r\n\n\t\nFRANCE  ");
        assert_eq!(lines, vec!["paris", "france"]);
    }

    #[test]
    fn nfkc_folds_compatibility_forms() {
        // fullwidth letters and the "fi" ligature
        assert_eq!(normalized_lines("ＰＡＲＩＳ"), vec!["paris"]);
        assert_eq!(normalized_lines("\u{FB01}ne"), vec!["fine"]);
    }

    #[test]
    fn tokens_split_on_punctuation() {
        let tokens = word_tokens("Paris, France; paris!");
        assert_eq!(
            tokens.into_iter().collect::<Vec<_>>(),
            vec!["france".to_string(), "paris".to_string()]
        );
    }

    #[test]
    fn formats_sets_sorted() {
        let items = vec!["b".to_string(), "a".to_string()];
        assert_eq!(format_set(&items), r#"{"a", "b"}"#);
        assert_eq!(format_set(&Vec::<String>::new()), "{}");
    }
}
