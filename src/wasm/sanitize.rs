//! Sanitizes a cloned document before rasterization.
//!
//! Runs inside the rasterizer's clone hook, so it only ever sees a transient
//! copy of the page, never the live DOM. Three sweeps: inline `style`
//! attributes, `<style>` blocks, and attached style sheets. Sheets whose
//! rules cannot be read synchronously (cross-origin) are disabled instead of
//! rewritten; a disabled sheet is preferable to the rasterizer crashing
//! mid-parse.

use crate::css::rewrite_unsupported_colors;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleSheet, Document, Element, HtmlLinkElement, HtmlStyleElement};

/// How a style sheet was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOutcome {
    /// Rules were readable; the owning `<style>` tag was rewritten in place.
    Rewritten,
    /// Rules were readable but owned by a `<link>`; a sanitized `<style>`
    /// was injected after it and the link disabled.
    Injected,
    /// Rules were unreadable; the sheet was disabled outright.
    Disabled,
    /// Already handled by an earlier pass; left alone.
    Skipped,
}

/// Sanitize `doc` in place. Never throws: any per-sheet failure degrades to
/// disabling that sheet. Running this twice produces no further changes.
pub fn scrub_document(doc: &Document) {
    scrub_inline_styles(doc);
    scrub_style_tags(doc);
    scrub_sheets(doc);
}

fn scrub_inline_styles(doc: &Document) {
    let list = match doc.query_selector_all("[style]") {
        Ok(list) => list,
        Err(_) => return,
    };
    for i in 0..list.length() {
        let el = match list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            Some(el) => el,
            None => continue,
        };
        if let Some(style) = el.get_attribute("style") {
            if let std::borrow::Cow::Owned(safe) = rewrite_unsupported_colors(&style) {
                let _ = el.set_attribute("style", &safe);
            }
        }
    }
}

fn scrub_style_tags(doc: &Document) {
    let list = match doc.query_selector_all("style") {
        Ok(list) => list,
        Err(_) => return,
    };
    for i in 0..list.length() {
        let tag = match list.item(i) {
            Some(tag) => tag,
            None => continue,
        };
        if let Some(css) = tag.text_content() {
            if let std::borrow::Cow::Owned(safe) = rewrite_unsupported_colors(&css) {
                tag.set_text_content(Some(&safe));
            }
        }
    }
}

/// Walk the document's style-sheet list. Readability is a typed outcome of
/// `css_rules()` rather than caught-exception control flow.
pub fn scrub_sheets(doc: &Document) -> Vec<SheetOutcome> {
    // Snapshot the list first: injecting a sanitized tag inserts a new sheet
    // into the live list and would shift the remaining indices.
    let list = doc.style_sheets();
    let mut sheets = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(sheet) = list.item(i).and_then(|s| s.dyn_into::<CssStyleSheet>().ok()) {
            sheets.push(sheet);
        }
    }
    sheets.iter().map(|sheet| scrub_sheet(doc, sheet)).collect()
}

fn scrub_sheet(doc: &Document, sheet: &CssStyleSheet) -> SheetOutcome {
    // Sheets disabled by an earlier pass stay disabled; re-processing them
    // would inject duplicate sanitized tags.
    if sheet.disabled() {
        return SheetOutcome::Skipped;
    }
    match sheet.css_rules() {
        Ok(rules) => {
            let mut sanitized = String::new();
            for j in 0..rules.length() {
                if let Some(rule) = rules.item(j) {
                    if !sanitized.is_empty() {
                        sanitized.push('\n');
                    }
                    sanitized.push_str(&rewrite_unsupported_colors(&rule.css_text()));
                }
            }
            replace_sheet_text(doc, sheet, &sanitized)
        }
        // Cross-origin: the rules are not synchronously readable, so the
        // sheet cannot be rewritten. Disable it entirely.
        Err(_) => disable_sheet(sheet),
    }
}

fn replace_sheet_text(doc: &Document, sheet: &CssStyleSheet, sanitized: &str) -> SheetOutcome {
    let owner = match sheet.owner_node() {
        Some(owner) => owner,
        None => return disable_sheet(sheet),
    };
    if let Some(style) = owner.dyn_ref::<HtmlStyleElement>() {
        style.set_text_content(Some(sanitized));
        return SheetOutcome::Rewritten;
    }
    if let Some(link) = owner.dyn_ref::<HtmlLinkElement>() {
        let tag = match doc.create_element("style") {
            Ok(tag) => tag,
            Err(_) => return disable_sheet(sheet),
        };
        tag.set_text_content(Some(sanitized));
        if let Some(parent) = link.parent_element() {
            if parent
                .insert_before(tag.as_ref(), link.next_sibling().as_ref())
                .is_ok()
            {
                // Disable the original so the rules are not applied twice.
                link.set_disabled(true);
                return SheetOutcome::Injected;
            }
        }
        return disable_sheet(sheet);
    }
    disable_sheet(sheet)
}

fn disable_sheet(sheet: &CssStyleSheet) -> SheetOutcome {
    sheet.set_disabled(true);
    if let Some(owner) = sheet.owner_node() {
        if let Some(link) = owner.dyn_ref::<HtmlLinkElement>() {
            link.set_disabled(true);
        } else if let Some(style) = owner.dyn_ref::<HtmlStyleElement>() {
            style.set_text_content(Some(""));
        }
    }
    SheetOutcome::Disabled
}
