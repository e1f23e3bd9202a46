//! Composition root: mounts one lens over a host element and keeps its
//! uniform state, capture schedule and draw loop in sync.

use super::pointer;
use super::shader::LensStage;
use super::snapshot;
use super::uniforms::{LensUniforms, Snapshot};
use crate::config::LensConfig;
use crate::geometry::{Rect, Viewport};
use crate::sched::CaptureGate;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    console, AddEventListenerOptions, HtmlCanvasElement, HtmlElement,
    WebGl2RenderingContext as GL,
};

/// State shared between the draw loop, the trackers and the capture task.
/// Rect/Viewport have a single writer (the geometry tracker); the snapshot
/// slot is written only by the capture task.
pub(super) struct LensShared {
    pub(super) gl: GL,
    pub(super) stage: LensStage,
    pub(super) host: HtmlElement,
    pub(super) canvas: HtmlCanvasElement,
    pub(super) uniforms: RefCell<LensUniforms>,
    pub(super) snapshot: RefCell<Option<Snapshot>>,
    pub(super) gate: CaptureGate,
    /// Cleared when the host leaves the document; pending captures check it
    /// before touching GL state or uniforms.
    pub(super) alive: Cell<bool>,
    start_ms: f64,
}

pub(super) fn mount(host: HtmlElement) -> Result<(), JsValue> {
    let config = config_from(&host);
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    ensure_positioned(&window, &host)?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_attribute(
        "style",
        "position:absolute;inset:0;width:100%;height:100%;border-radius:inherit;pointer-events:none;z-index:1;",
    )?;
    host.append_child(canvas.as_ref())?;

    let gl = match webgl2_context(&canvas) {
        Some(gl) => gl,
        None => {
            // No GPU context: a transparent pane beats a crashed page.
            console::warn_1(&"[lens] WebGL2 unavailable, lens disabled".into());
            return Ok(());
        }
    };
    let stage = LensStage::new(&gl)?;
    let performance = window.performance().ok_or("no performance")?;

    let shared = Rc::new(LensShared {
        gl,
        stage,
        host,
        canvas,
        uniforms: RefCell::new(LensUniforms::new(config)),
        snapshot: RefCell::new(None),
        gate: CaptureGate::new(),
        alive: Cell::new(true),
        start_ms: performance.now(),
    });

    measure(&shared);

    // Resize invalidates the bitmap; scroll only remaps it.
    {
        let s = shared.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            measure(&s);
            request_capture(&s);
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();
    }
    {
        let s = shared.clone();
        let on_scroll = Closure::wrap(Box::new(move || measure(&s)) as Box<dyn FnMut()>);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            on_scroll.as_ref().unchecked_ref(),
            &opts,
        )?;
        on_scroll.forget();
    }

    if config.hover {
        pointer::install(&shared)?;
    }

    request_capture(&shared);

    // Animation loop. `f` holds the closure so it can re-schedule itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let s = shared;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !s.host.is_connected() {
            // Host left the document: stop scheduling frames and let the
            // capture task discard any pending result.
            s.alive.set(false);
            return;
        }
        if let Some(perf) = web_sys::window().and_then(|w| w.performance()) {
            s.uniforms.borrow_mut().time = ((perf.now() - s.start_ms) / 1000.0) as f32;
        }
        {
            let u = s.uniforms.borrow();
            let snap = s.snapshot.borrow();
            s.stage.draw(&s.gl, &u, snap.as_ref());
        }
        let _ = web_sys::window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }) as Box<dyn FnMut()>));
    window.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;

    Ok(())
}

/// Geometry tracker: republish the host box and viewport, and keep the
/// canvas backing store at the host box size. A detached host is a no-op.
pub(super) fn measure(shared: &LensShared) {
    if !shared.host.is_connected() {
        return;
    }
    let window = match web_sys::window() {
        Some(window) => window,
        None => return,
    };
    let r = shared.host.get_bounding_client_rect();
    let vw = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let vh = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    {
        let mut u = shared.uniforms.borrow_mut();
        u.rect = Rect {
            x: r.left(),
            y: r.top(),
            w: r.width(),
            h: r.height(),
        };
        u.viewport = Viewport { w: vw, h: vh };
    }

    let bw = r.width().round().max(1.0) as u32;
    let bh = r.height().round().max(1.0) as u32;
    if shared.canvas.width() != bw {
        shared.canvas.set_width(bw);
    }
    if shared.canvas.height() != bh {
        shared.canvas.set_height(bh);
    }
}

/// Start a capture pass unless one is already in flight; coalesced requests
/// re-run once after the current pass settles.
pub(super) fn request_capture(shared: &Rc<LensShared>) {
    if !shared.gate.request() {
        return;
    }
    let shared = shared.clone();
    spawn_local(async move {
        loop {
            snapshot::capture(&shared).await;
            if !shared.alive.get() {
                return;
            }
            if !shared.gate.settle() {
                break;
            }
        }
    });
}

fn config_from(host: &HtmlElement) -> LensConfig {
    LensConfig::from_attrs(
        host.get_attribute("data-magnify").as_deref(),
        host.get_attribute("data-ripple").as_deref(),
        host.get_attribute("data-hover").as_deref(),
        host.get_attribute("data-opacity").as_deref(),
        host.get_attribute("data-pattern").as_deref(),
    )
}

/// The overlay is absolutely positioned; a statically positioned host needs
/// a positioning context for it.
fn ensure_positioned(window: &web_sys::Window, host: &HtmlElement) -> Result<(), JsValue> {
    if let Ok(Some(style)) = window.get_computed_style(host) {
        if style.get_property_value("position").unwrap_or_default() == "static" {
            host.style().set_property("position", "relative")?;
        }
    }
    Ok(())
}

fn webgl2_context(canvas: &HtmlCanvasElement) -> Option<GL> {
    canvas
        .get_context("webgl2")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<GL>().ok())
}
