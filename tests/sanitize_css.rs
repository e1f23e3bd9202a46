//! Textual rewrite of color functions the rasterizer cannot parse.

use lens_wasm::css::{has_unsupported_colors, rewrite_unsupported_colors, FALLBACK_COLOR};
use std::borrow::Cow;

#[test]
fn rewrites_all_three_functions() {
    let input = "color: lab(52% 40 59); border-color: lch(52% 72 50); \
                 background: oklch(0.7 0.1 200 / 0.5);";
    let out = rewrite_unsupported_colors(input);
    assert!(!out.contains("lab("));
    assert!(!out.contains("lch("));
    assert!(!out.contains("oklch("));
    assert_eq!(out.matches(FALLBACK_COLOR).count(), 3);
}

#[test]
fn preserves_other_declarations_byte_for_byte() {
    let input = "margin: 4px; color: oklch(0.7 0.1 200); padding: 2px";
    let out = rewrite_unsupported_colors(input);
    assert_eq!(out, "margin: 4px; color: rgb(255,255,255); padding: 2px");
}

#[test]
fn untouched_css_is_returned_borrowed() {
    let input = "color: red; background: rgb(1,2,3)";
    assert!(matches!(
        rewrite_unsupported_colors(input),
        Cow::Borrowed(_)
    ));
    assert!(!has_unsupported_colors(input));
}

#[test]
fn rewrite_is_idempotent() {
    let input = ".hero { background: linear-gradient(oklch(0.8 0.1 120), lch(40% 30 10)); }";
    let once = rewrite_unsupported_colors(input).into_owned();
    let twice = rewrite_unsupported_colors(&once);
    assert!(matches!(twice, Cow::Borrowed(_)));
    assert_eq!(twice, once);
}

#[test]
fn handles_multiple_occurrences_in_one_value() {
    let input = "background: linear-gradient(lab(1% 2 3), lab(4% 5 6), red)";
    let out = rewrite_unsupported_colors(input);
    assert_eq!(
        out,
        "background: linear-gradient(rgb(255,255,255), rgb(255,255,255), red)"
    );
}

#[test]
fn detector_flags_each_function() {
    for css in [
        "color: lab(50% 1 2)",
        "color: lch(50% 1 2)",
        "color: oklch(0.5 0.1 30)",
    ] {
        assert!(has_unsupported_colors(css), "{css}");
        assert!(!has_unsupported_colors(&rewrite_unsupported_colors(css)));
    }
}
