use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// Punctuation in root-collation order. Anything listed here sorts before
/// digits, digits sort before letters.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Locale-aware string comparison, a total order:
///
/// 1. primary: base characters (accents and case folded away), with
///    whitespace < punctuation < digits < letters
/// 2. tertiary: lowercase before uppercase at the first difference
/// 3. code point order as the final tie-break
pub fn compare(a: &str, b: &str) -> Ordering {
    primary_keys(a)
        .cmp(primary_keys(b))
        .then_with(|| case_keys(a).cmp(case_keys(b)))
        .then_with(|| a.cmp(b))
}

/// Sort strings in place with [`compare`].
pub fn sort<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by(|a, b| compare(a.as_ref(), b.as_ref()));
}

fn primary_keys(s: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(primary_weight)
}

fn case_keys(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        return (0, c as u32);
    }
    if let Some(rank) = PUNCTUATION_ORDER.chars().position(|p| p == c) {
        return (1, rank as u32);
    }
    if c.is_ascii_digit() {
        return (2, c as u32);
    }
    if c.is_alphabetic() {
        return (3, c as u32);
    }
    (4, c as u32)
}

fn is_combining_mark(c: char) -> bool {
    unicode_normalization::char::is_combining_mark(c)
}
