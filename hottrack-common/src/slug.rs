//! URL slug generation for song names
//!
//! Slugs keep Unicode letters (Hangul titles stay readable) and only collapse
//! punctuation and whitespace into single hyphens.

use unicode_normalization::UnicodeNormalization;

/// Maximum slug length in characters
pub const SLUG_MAX_LEN: usize = 100;

/// Derive a slug from `name`, or keep `existing` when it is set and not forced
///
/// The result is cut to `max_len` characters. The cut may land inside a
/// token and leave a trailing hyphen; that output is kept as is.
pub fn slugify(name: &str, force: bool, existing: &str, max_len: usize) -> String {
    if !force && !existing.is_empty() {
        return existing.to_string();
    }

    normalize(name).chars().take(max_len).collect()
}

/// Normalize a display name into a hyphen-separated token sequence
fn normalize(name: &str) -> String {
    let lowered: String = name.nfkc().collect::<String>().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        } else if ch.is_alphanumeric() || ch == '_' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(ch);
        }
        // Anything else is dropped without splitting the surrounding token
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}
