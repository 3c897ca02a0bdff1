//! # Upload Filename Sanitization
//!
//! Client-supplied filenames become object names only after passing through
//! [`secure_filename`]. The result is a single flat segment made of
//! `[A-Za-z0-9_.-]`, so traversal segments and separators cannot survive.
//! Accented letters are decomposed (NFKD) first so they keep their base letter.

use unicode_normalization::UnicodeNormalization;

/// Sanitize a client-supplied filename into a flat object name.
///
/// May return an empty string (e.g. for `"../.."`); callers must reject that.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .filter(char::is_ascii)
        .collect();

    let joined = flattened.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
