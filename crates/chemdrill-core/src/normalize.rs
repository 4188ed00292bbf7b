//! Answer normalization.
//!
//! Two answers are "the same" when their normalized forms are equal. The
//! transformation forgives casing, surrounding and repeated whitespace, and
//! the punctuation set `. , ; : ( )`. Every other character is significant,
//! so formula text such as `h2o`, `->`, `+` and subscript digits survive.

/// Characters removed during normalization.
pub const STRIPPED_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '(', ')'];

/// Whitespace that separates words in an answer.
///
/// Unicode `White_Space` plus the byte-order mark U+FEFF, minus NEXT LINE
/// U+0085, which is kept as an ordinary character.
pub fn is_answer_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Normalize a free-text answer for comparison.
///
/// Punctuation is removed before whitespace is collapsed so the result is
/// idempotent: `normalize_answer(&normalize_answer(s)) == normalize_answer(s)`.
pub fn normalize_answer(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    stripped
        .split(is_answer_whitespace)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a value of unknown shape.
///
/// `null` becomes `""`, strings are used as-is, and every other value is
/// normalized from its JSON text.
pub fn normalize_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => normalize_answer(s),
        other => normalize_answer(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collapses_whitespace_and_strips_punctuation() {
        assert_eq!(normalize_answer("  H2O ,  (aq). "), "h2o aq");
        assert_eq!(normalize_answer("Hydrochloric   Acid."), "hydrochloric acid");
        assert_eq!(normalize_answer("\tsulfuric\nacid\r\n"), "sulfuric acid");
    }

    #[test]
    fn absent_input_is_empty() {
        assert_eq!(normalize_value(&serde_json::Value::Null), "");
        assert_eq!(normalize_answer(""), "");
        assert_eq!(normalize_answer("  .,;:()  "), "");
    }

    #[test]
    fn preserves_formula_characters() {
        assert_eq!(
            normalize_answer("2 Na(s) + 2 H2O(l) -> 2 NaOH(aq) + H2(g)"),
            "2 nas + 2 h2ol -> 2 naohaq + h2g"
        );
        assert_eq!(normalize_answer("HSO4-/SO4 2-"), "hso4-/so4 2-");
        assert_eq!(normalize_answer("H₂O"), "h₂o");
        assert_ne!(normalize_answer("H₂O"), normalize_answer("h2o"));
    }

    #[test]
    fn scalar_values_are_coerced_to_text() {
        assert_eq!(normalize_value(&json!("  Nitric Acid ")), "nitric acid");
        assert_eq!(normalize_value(&json!(12)), "12");
        assert_eq!(normalize_value(&json!(true)), "true");
    }

    #[test]
    fn idempotent_over_awkward_inputs() {
        let inputs = [
            "",
            " ",
            "a ( b",
            "a . b",
            "x(  )y",
            "  H2O ,  (aq). ",
            "Na + H2O -> NaOH + H2",
            "ÉTHANOIC   ACID",
            "a\u{00a0}b",
            "a\u{feff} \u{0085}b",
            "((()))",
            "phosphoric acid;;",
            "HCl(aq) : hydrochloric acid",
        ];
        for input in inputs {
            let once = normalize_answer(input);
            let twice = normalize_answer(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn whitespace_set() {
        assert_eq!(normalize_answer("h2o\u{feff}"), "h2o");
        assert_eq!(normalize_answer("\u{feff}nitric\u{feff}acid"), "nitric acid");
        assert_eq!(normalize_answer("a\u{3000}b\u{00a0}c"), "a b c");
        assert_eq!(normalize_answer("a\u{0085}b"), "a\u{0085}b");
        assert_eq!(normalize_answer(" \u{0085} "), "\u{0085}");
    }

    #[test]
    fn punctuation_between_words_does_not_leave_double_spaces() {
        assert_eq!(normalize_answer("a ( b"), "a b");
        assert_eq!(normalize_answer("carbonic , acid"), "carbonic acid");
    }
}
