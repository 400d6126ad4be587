//! Helpers for turning client-supplied filenames into safe path components.

use unicode_normalization::UnicodeNormalization;

/// Reduce a client-supplied filename to a single safe path component.
///
/// Accented characters are decomposed to their ASCII base, path separators become word breaks, whitespace runs collapse into `_`, anything outside
/// ASCII alphanumerics and `._-` is dropped, and leading or trailing `.`/`_` are stripped. The
/// result may be empty when nothing usable survives.
pub fn secure_filename(raw: &str) -> String {
    let spaced: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    filtered.trim_matches(|c| c == '.' || c == '_').to_string()
}
