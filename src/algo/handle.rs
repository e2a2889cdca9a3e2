use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// A canonical Instagram username: lowercase ASCII restricted to
/// `[a-z0-9._]`, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Canonicalize `raw` and wrap it. `None` when nothing survives.
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = canonicalize(raw);
        if canonical.is_empty() {
            None
        } else {
            Some(Self(canonical))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn profile_url(&self) -> String {
        format!("https://instagram.com/{}", self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a raw username, `@mention` or profile URL:
/// - Trim whitespace and strip leading `@`s
/// - Strip an `http://` / `https://` scheme
/// - Reduce `instagram.com/<rest>` (optionally `www.` / `m.`) to `<rest>`
/// - Cut at the first `?` or `#`, drop trailing slashes
/// - Decompose (NFKD) and drop combining diacritical marks
/// - Lowercase and keep only `[a-z0-9._]`
///
/// Total: returns an empty string when nothing usable remains.
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let unmentioned = trimmed.trim_start_matches('@');
    let without_scheme = strip_prefix_ignore_case(unmentioned, "https://")
        .or_else(|| strip_prefix_ignore_case(unmentioned, "http://"))
        .unwrap_or(unmentioned);

    let path = profile_path(without_scheme);
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    path.nfkd()
        .filter(|c| !is_combining_diacritic(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| is_handle_char(*c))
        .collect()
}

/// True for the characters a canonical handle may contain.
pub fn is_handle_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_'
}

/// `instagram.com/<rest>` → `<rest>`, with an optional `www.`/`m.` host
/// prefix and a leading `_u/` redirect segment removed.
fn profile_path(s: &str) -> &str {
    for host_prefix in ["", "www.", "m."] {
        let rest = strip_prefix_ignore_case(s, host_prefix)
            .and_then(|r| strip_prefix_ignore_case(r, "instagram.com/"));
        if let Some(rest) = rest.filter(|r| !r.is_empty()) {
            return strip_prefix_ignore_case(rest, "_u/").unwrap_or(rest);
        }
    }
    s
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

// U+0300..=U+036F, the Combining Diacritical Marks block.
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}
