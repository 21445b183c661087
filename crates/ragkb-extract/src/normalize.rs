//! Post-extraction text normalization.

/// Characters kept besides word characters and whitespace.
const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')', '-', '"', '\''];

/// Normalize extracted text before chunking.
///
/// Collapses whitespace runs to a single space, strips characters outside
/// the allowlist (word characters, whitespace and a fixed punctuation set),
/// unifies line-break variants, and trims the ends.
#[must_use]
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let filtered: String = collapsed.chars().filter(|&c| is_allowed(c)).collect();
    let unified = filtered.replace("\r\n", "\n").replace('\r', "\n");
    unified.trim().to_string()
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || PUNCTUATION.contains(&c)
}
