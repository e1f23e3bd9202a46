#![cfg(target_arch = "wasm32")]

use lens_wasm::sanitize::{self, SheetOutcome};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn host_fixture_measures_nonzero() {
    let doc = document();
    let host = doc.create_element("div").unwrap();
    host.set_attribute("style", "width: 120px; height: 40px;")
        .unwrap();
    doc.body().unwrap().append_child(&host).unwrap();

    let rect = host.get_bounding_client_rect();
    assert!(rect.width() > 0.0 && rect.height() > 0.0);

    host.remove();
}

#[wasm_bindgen_test]
fn sanitization_rewrites_dom_and_is_idempotent() {
    let doc = document();
    let body = doc.body().unwrap();

    let el = doc.create_element("div").unwrap();
    el.set_attribute("style", "margin: 4px; color: oklch(0.7 0.1 200)")
        .unwrap();
    body.append_child(&el).unwrap();

    let style = doc.create_element("style").unwrap();
    style.set_text_content(Some(".lens-fixture { color: lab(52% 40 59); padding: 1px; }"));
    body.append_child(&style).unwrap();

    sanitize::scrub_document(&doc);
    let attr = el.get_attribute("style").unwrap();
    assert!(!attr.contains("oklch("), "inline style survived: {attr}");
    assert!(attr.contains("margin: 4px"));
    let css = style.text_content().unwrap();
    assert!(!css.contains("lab("), "style tag survived: {css}");
    assert!(css.contains("padding"));

    // Second pass produces no further changes.
    sanitize::scrub_document(&doc);
    assert_eq!(el.get_attribute("style").unwrap(), attr);
    assert_eq!(style.text_content().unwrap(), css);

    el.remove();
    style.remove();
}

#[wasm_bindgen_test]
fn readable_sheets_are_rewritten_not_disabled() {
    let doc = document();
    let style = doc.create_element("style").unwrap();
    style.set_text_content(Some(".lens-sheet { color: lch(52% 72 50); }"));
    doc.body().unwrap().append_child(&style).unwrap();

    let outcomes = sanitize::scrub_sheets(&doc);
    assert!(outcomes.contains(&SheetOutcome::Rewritten));
    assert!(!outcomes.contains(&SheetOutcome::Disabled));
    assert!(!style.text_content().unwrap().contains("lch("));

    style.remove();
}
