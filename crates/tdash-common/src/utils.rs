//! Text and number helpers used by the feature deriver and loaders.

/// Parse a numeric cell. Blank, malformed or non-finite input is missing, never an error.
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Keep non-blank text cells.
pub fn parse_optional_text(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Strip trailing percent signs and parse the remainder, e.g. `"12.5%"` -> `12.5`.
/// A plain number passes through unchanged.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    parse_number(raw.trim().trim_end_matches('%'))
}

/// Number of whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Drop every whitespace token containing `letter` (case-insensitive) and
/// re-join the rest with single spaces.
pub fn strip_words_containing(text: &str, letter: char) -> String {
    let needle = letter.to_lowercase().collect::<String>();
    text.split_whitespace()
        .filter(|word| !word.to_lowercase().contains(needle.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Median of the given values; `None` when empty.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("12.5%"), Some(12.5));
        assert_eq!(parse_percentage(" 3% "), Some(3.0));
        assert_eq!(parse_percentage("0.042"), Some(0.042));
        assert_eq!(parse_percentage("n/a%"), None);
        assert_eq!(parse_percentage(""), None);
        assert_eq!(parse_percentage("nan"), None);
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        for raw in ["inf", "-inf", "infinity", "1e999", "NaN"] {
            assert_eq!(parse_number(raw), None, "{raw}");
        }
        assert_eq!(parse_percentage("inf%"), None);
    }

    #[test]
    fn test_strip_words_containing() {
        assert_eq!(
            strip_words_containing("Check  this cool Content now", 'c'),
            "this now"
        );
        assert_eq!(strip_words_containing("", 's'), "");
        assert_eq!(strip_words_containing("dog Dad mom", 'd'), "mom");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Short", 20), "Short");
        assert_eq!(
            truncate_string("This is a very long string that should be truncated", 20),
            "This is a very lo..."
        );
    }

    proptest! {
        #[test]
        fn prop_percentage_matches_plain_number(value in -1.0e6f64..1.0e6) {
            let text = format!("{value}");
            prop_assert_eq!(parse_percentage(&format!("{text}%")), Some(value));
            prop_assert_eq!(parse_percentage(&text), Some(value));
        }

        #[test]
        fn prop_stripped_text_never_contains_letter(text in "[a-zA-Z ]{0,60}") {
            let stripped = strip_words_containing(&text, 's');
            prop_assert!(!stripped.to_lowercase().contains('s'));
        }
    }
}
