//! Search key encoding.
//!
//! Stored keys are lowercase names where every ASCII character outside `[a-z0-9]` becomes `_`
//! plus two lowercase hex digits, followed by a `_<n>` ordinal that keeps keys unique within a
//! partition: `minstd_rand0` is stored as `minstd_5frand0_19`.

use std::fmt::Write;

/// Encodes text the way stored keys are encoded, without the ordinal suffix.
#[must_use]
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || !c.is_ascii() {
            out.push(c);
        } else {
            let _ = write!(out, "_{:02x}", u32::from(c));
        }
    }
    out
}

/// Normalises a user query into encoded key form.
///
/// Surrounding characters that are not alphanumeric are dropped before case folding, so
/// `"  Mutex:: "` and `"mutex"` normalise identically. Interior punctuation is kept and encoded.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    encode(query.trim_matches(|c: char| !c.is_alphanumeric()))
}

/// Removes the trailing `_<n>` ordinal from a stored key.
#[must_use]
pub fn strip_ordinal(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((stem, ordinal))
            if !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => key,
    }
}
