//! Textual CSS rewriting for the capture pass.
//!
//! The rasterizer we hand the page to cannot parse the `lab()`, `lch()` and
//! `oklch()` color functions and aborts mid-parse when it meets one. Before a
//! capture we therefore rewrite every occurrence in the cloned document to an
//! opaque fallback color, leaving every other declaration untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Replacement for color functions the rasterizer cannot parse.
pub const FALLBACK_COLOR: &str = "rgb(255,255,255)";

static UNSUPPORTED_COLOR_FN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:lab|lch|oklch)\([^)]*\)").unwrap());

/// Rewrite every `lab()`/`lch()`/`oklch()` occurrence in `css` to
/// [`FALLBACK_COLOR`]. Returns `Cow::Borrowed` when nothing matched, so
/// callers can skip DOM writes for untouched text.
///
/// The fallback contains none of the rewritten function names, which makes
/// the rewrite idempotent.
pub fn rewrite_unsupported_colors(css: &str) -> Cow<'_, str> {
    UNSUPPORTED_COLOR_FN.replace_all(css, FALLBACK_COLOR)
}

/// True if `css` still contains a color function the rasterizer would choke
/// on.
pub fn has_unsupported_colors(css: &str) -> bool {
    UNSUPPORTED_COLOR_FN.is_match(css)
}
