//! Slug generation.
//!
//! Uniqueness comes from suffixing with the current time rather than a
//! query-then-insert round trip, which would itself race under
//! concurrent authors. Slugs are opaque identifiers; cleanliness is not
//! a goal, and the submission path always asks for a fresh one instead
//! of reusing whatever an abandoned attempt may have left behind.

use chrono::Utc;
use rand::Rng;

/// Fallback stem for titles that slugify to nothing.
const EMPTY_TITLE_STEM: &str = "draft";

/// Derives a URL-safe, collision-resistant identifier from a title.
///
/// Never returns an empty string, and two calls at different instants
/// return different values even for identical titles.
pub fn generate(title: &str) -> String {
    let stem = slugify(title);
    let stamp = time_component();
    if stem.is_empty() {
        // The random component keeps two concurrent untitled drafts
        // apart within the same millisecond.
        let noise = rand::rng().random_range(0u32..10_000);
        format!("{EMPTY_TITLE_STEM}-{stamp}-{noise:04}")
    } else {
        format!("{stem}-{stamp}")
    }
}

/// Lower-cases, strips punctuation and collapses whitespace runs into
/// single hyphens.
fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut gap = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('-');
            }
            gap = false;
            out.push(ch);
        } else {
            gap = true;
        }
    }
    out
}

/// Millisecond wall clock truncated to eight digits.
fn time_component() -> u64 {
    (Utc::now().timestamp_millis() as u64) % 100_000_000
}
