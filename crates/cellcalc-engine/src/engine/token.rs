//! Formula tokenization.
//!
//! A token is a maximal run of characters that are neither whitespace nor one
//! of `( ) + - * /`. Cell ids are only ever matched against whole tokens, so
//! an id `1` never matches inside the literal `12` and an id `A` never matches
//! inside `A1`.

use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;

/// Characters that separate tokens besides whitespace.
pub(crate) const OPERATORS: [char; 6] = ['(', ')', '+', '-', '*', '/'];

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\s()+\-*/]+").expect("token regex must compile"))
}

/// A token and its byte span inside the formula it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Iterate over the tokens of a formula, left to right.
pub fn tokens(formula: &str) -> impl Iterator<Item = Token<'_>> {
    token_re().find_iter(formula).map(|m| Token {
        text: m.as_str(),
        span: m.range(),
    })
}

/// True for the operator and parenthesis characters `( ) + - * /`.
pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// True if the token is made only of ASCII digits and decimal points.
pub fn is_numeric_literal(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// First token (leftmost) that names one of the `known` cell ids.
pub(crate) fn first_known<'a>(formula: &'a str, known: &HashSet<String>) -> Option<Token<'a>> {
    tokens(formula).find(|t| known.contains(t.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(formula: &str) -> Vec<&str> {
        tokens(formula).map(|t| t.text).collect()
    }

    #[test]
    fn test_tokens_split_on_operators_and_whitespace() {
        assert_eq!(texts("A1 + B*(12-x)/3.5"), vec!["A1", "B", "12", "x", "3.5"]);
        assert_eq!(texts("  "), Vec::<&str>::new());
        assert_eq!(texts("()+-*/"), Vec::<&str>::new());
    }

    #[test]
    fn test_tokens_report_byte_spans() {
        let toks: Vec<_> = tokens("ab+cd").collect();
        assert_eq!(toks[0].span, 0..2);
        assert_eq!(toks[1].span, 3..5);
    }

    #[test]
    fn test_tokens_treat_unicode_whitespace_as_separator() {
        assert_eq!(texts("a\u{a0}b\tc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_is_numeric_literal() {
        assert!(is_numeric_literal("12"));
        assert!(is_numeric_literal("3.25"));
        assert!(is_numeric_literal(".5"));
        assert!(!is_numeric_literal(""));
        assert!(!is_numeric_literal("1e5"));
        assert!(!is_numeric_literal("A1"));
    }

    #[test]
    fn test_first_known_is_whole_token() {
        let known: HashSet<String> = ["1".to_string(), "A".to_string()].into();
        let tok = first_known("12+A1+1", &known).unwrap();
        assert_eq!(tok.text, "1");
        assert_eq!(tok.span, 6..7);
        assert!(first_known("12+A1", &known).is_none());
    }
}
