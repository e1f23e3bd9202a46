//! Hover-mode pointer tracking.

use super::lens::LensShared;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

/// Route pointer movement over the host into the uniform state as a
/// viewport-fraction position. Installed only when hover mode is on; with it
/// off the shader falls back to the host centroid.
pub(super) fn install(shared: &Rc<LensShared>) -> Result<(), JsValue> {
    let s = shared.clone();
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let mut u = s.uniforms.borrow_mut();
        let vw = u.viewport.w.max(1.0);
        let vh = u.viewport.h.max(1.0);
        u.pointer = (
            (event.client_x() as f64 / vw) as f32,
            (event.client_y() as f64 / vh) as f32,
        );
    }) as Box<dyn FnMut(MouseEvent)>);
    shared
        .host
        .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();
    Ok(())
}
