//! String classification used when wrapping plain strings.
//!
//! Strings carry no type information of their own, so two patterns decide how they are
//! sent: anything shaped like a document resource name becomes a reference, and anything
//! containing C0 control bytes (other than tab, newline, vertical tab, form feed and
//! carriage return) becomes bytes. This is a best-effort guess and will misclassify text
//! that legitimately contains those control characters.

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^projects/.+?/databases/\(default\)/documents/(.+/.+)$").expect("reference pattern")
});

static BINARY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0E-\x1F]").expect("binary pattern")
});

/// Returns the document path (`collection/.../id`) when `value` is a document resource name.
pub fn reference_path(value: &str) -> Option<&str> {
    REFERENCE_PATTERN
        .captures(value)
        .and_then(|captures| captures.get(1))
        .map(|path| path.as_str())
}

pub fn is_reference(value: &str) -> bool {
    REFERENCE_PATTERN.is_match(value)
}

pub fn looks_binary(value: &str) -> bool {
    BINARY_PATTERN.is_match(value)
}
