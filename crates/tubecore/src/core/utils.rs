use once_cell::sync::Lazy;
use regex::Regex;

/// Name used when nothing survives sanitization
pub const FALLBACK_FILENAME: &str = "download";

/// Maximum length of a sanitized filename stem
pub const MAX_FILENAME_LEN: usize = 100;

static NON_ASCII: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]").expect("non-ascii regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("unsafe chars regex"));
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").expect("underscore regex"));

/// Turns an arbitrary title into a filename stem that is safe in a
/// `Content-Disposition` header and on any filesystem.
///
/// Steps, in order:
/// - non-ASCII characters -> `_`
/// - whitespace runs -> `_`
/// - everything outside `[A-Za-z0-9_.-]` is dropped (this covers `<>:"/\|?*`)
/// - runs of `_` collapse to one
/// - cut to 100 characters
/// - leading/trailing `_` trimmed
///
/// An empty result becomes `"download"`. The function is idempotent.
///
/// # Example
///
/// ```
/// use tubecore::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Video!"), "My_Video");
/// assert_eq!(sanitize_filename("  ***  "), "download");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
    let replaced = NON_ASCII.replace_all(filename, "_");
    let replaced = WHITESPACE.replace_all(&replaced, "_");
    let replaced = UNSAFE_CHARS.replace_all(&replaced, "");
    let replaced = UNDERSCORE_RUNS.replace_all(&replaced, "_");

    let truncated: String = replaced.chars().take(MAX_FILENAME_LEN).collect();
    let trimmed = truncated.trim_matches('_');

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
