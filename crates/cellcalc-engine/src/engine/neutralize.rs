use regex::Regex;
use std::sync::OnceLock;

/// Maximal runs of characters that are not digits, `.`, whitespace or
/// `( ) + - * /`.
fn unresolved_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\s()+\-*/]+").expect("unresolved regex must compile"))
}

/// Replace every maximal run of unresolved characters with `0`.
///
/// Digits and decimal points are left in place, so `A1` becomes `01` and
/// `x.5` becomes `0.5`. The result only contains digits, `.`, whitespace and
/// `( ) + - * /`. Applying it to its own output returns the same string.
pub fn neutralize(expression: &str) -> String {
    unresolved_re().replace_all(expression, "0").into_owned()
}

/// True if [`neutralize`] would leave the expression unchanged.
pub fn is_neutralized(expression: &str) -> bool {
    !unresolved_re().is_match(expression)
}
