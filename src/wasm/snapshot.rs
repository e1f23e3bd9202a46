//! Produces snapshots of the page region behind the lens.
//!
//! The heavy lifting is done by a page-provided rasterizer (`html2canvas`),
//! treated as an external collaborator: given a DOM region it asynchronously
//! produces a canvas, or fails. A capture pass may span several frames; the
//! previous snapshot keeps rendering until the new texture is fully uploaded,
//! and a failed pass keeps the previous snapshot bound: stale over blank.

use super::lens::{self, LensShared};
use super::sanitize;
use super::uniforms::Snapshot;
use crate::geometry::{capture_region, CaptureRegion, Viewport, CAPTURE_PAD};
use gloo_timers::future::TimeoutFuture;
use js_sys::Reflect;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Document, Element, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlTexture};

/// Extra settle time after the next animation frame, letting just-applied
/// layout and style changes land before the clone is taken.
const SETTLE_DELAY_MS: u32 = 16;

#[wasm_bindgen]
extern "C" {
    /// Page-provided rasterizer. Resolves to a canvas holding the requested
    /// page region, or rejects when the content cannot be rasterized.
    #[wasm_bindgen(catch)]
    fn html2canvas(root: &Element, options: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Run one capture pass. Errors are consumed here: they are logged at
/// diagnostic level and the previously bound snapshot stays in place.
pub(super) async fn capture(shared: &Rc<LensShared>) {
    if let Err(err) = try_capture(shared).await {
        console::warn_2(
            &"[lens] capture failed, keeping previous snapshot".into(),
            &err,
        );
    }
}

async fn try_capture(shared: &Rc<LensShared>) -> Result<(), JsValue> {
    next_animation_frame().await?;
    TimeoutFuture::new(SETTLE_DELAY_MS).await;
    if !shared.alive.get() {
        return Ok(());
    }

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let (rect, viewport) = {
        let u = shared.uniforms.borrow();
        (u.rect, u.viewport)
    };
    let scroll_x = window.page_x_offset().unwrap_or(0.0);
    let scroll_y = window.page_y_offset().unwrap_or(0.0);
    let region = capture_region(rect, scroll_x, scroll_y, CAPTURE_PAD);

    // The lens must never capture its own surface; excluding the host
    // subtree also breaks the self-reflection recursion.
    let host = shared.host.clone();
    let ignore_host =
        Closure::wrap(Box::new(move |el: Element| host.contains(Some(el.as_ref())))
            as Box<dyn FnMut(Element) -> bool>);
    let on_clone = Closure::wrap(
        Box::new(|doc: Document| sanitize::scrub_document(&doc)) as Box<dyn FnMut(Document)>,
    );

    let options = capture_options(&region, viewport, &ignore_host, &on_clone)?;
    let promise = html2canvas(body.as_ref(), &options)?;
    let captured = JsFuture::from(promise).await?;
    let canvas: HtmlCanvasElement = captured.dyn_into()?;

    // The lens may have unmounted while the rasterizer ran; its GL state is
    // torn down with the canvas, so the result is simply discarded.
    if !shared.alive.get() {
        return Ok(());
    }

    let texture = upload_texture(&shared.gl, &canvas)?;
    let previous = shared.snapshot.borrow_mut().replace(Snapshot {
        texture,
        rect,
        viewport,
    });
    if let Some(stale) = previous {
        shared.gl.delete_texture(Some(&stale.texture));
    }

    // Layout may have shifted while the pass ran; refresh the mapping so the
    // new bitmap and the published geometry agree.
    lens::measure(shared);
    Ok(())
}

fn capture_options(
    region: &CaptureRegion,
    viewport: Viewport,
    ignore_host: &Closure<dyn FnMut(Element) -> bool>,
    on_clone: &Closure<dyn FnMut(Document)>,
) -> Result<JsValue, JsValue> {
    let options = js_sys::Object::new();
    let set = |key: &str, value: &JsValue| Reflect::set(&options, &JsValue::from_str(key), value);
    set("useCORS", &JsValue::TRUE)?;
    set("backgroundColor", &JsValue::NULL)?;
    set("foreignObjectRendering", &JsValue::TRUE)?;
    set("logging", &JsValue::FALSE)?;
    // 1:1 scale keeps the bitmap-to-UV mapping trivial.
    set("scale", &JsValue::from_f64(1.0))?;
    set("x", &JsValue::from_f64(region.x))?;
    set("y", &JsValue::from_f64(region.y))?;
    set("width", &JsValue::from_f64(region.w))?;
    set("height", &JsValue::from_f64(region.h))?;
    set("windowWidth", &JsValue::from_f64(viewport.w))?;
    set("windowHeight", &JsValue::from_f64(viewport.h))?;
    // The crop is already page-absolute; no extra scroll compensation.
    set("scrollX", &JsValue::from_f64(0.0))?;
    set("scrollY", &JsValue::from_f64(0.0))?;
    set("ignoreElements", ignore_host.as_ref())?;
    set("onclone", on_clone.as_ref())?;
    Ok(options.into())
}

/// Decode the rasterized canvas into a sampleable texture: linear filtering,
/// clamp-to-edge wrapping, no mipmaps (the content changes too often to
/// amortize mipmap generation).
fn upload_texture(gl: &GL, canvas: &HtmlCanvasElement) -> Result<WebGlTexture, JsValue> {
    let texture = gl.create_texture().ok_or("create_texture failed")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    let result = gl.tex_image_2d_with_u32_and_u32_and_html_canvas_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        canvas,
    );
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
    if let Err(err) = result {
        gl.delete_texture(Some(&texture));
        return Err(err);
    }
    Ok(texture)
}

fn next_animation_frame() -> JsFuture {
    JsFuture::from(js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(&resolve);
        }
    }))
}
