#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

// Pure lens logic compiles on every target so host-side `cargo test` can
// exercise it; everything touching the DOM or WebGL is wasm-only.

pub mod config;
pub mod css;
pub mod geometry;
pub mod optics;
pub mod sched;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod lens;
    mod pointer;
    pub mod sanitize;
    mod shader;
    mod snapshot;
    mod uniforms;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // A page without lens hosts is a no-op, not an error.
        let hosts = document.query_selector_all("[data-glass-lens]")?;
        for i in 0..hosts.length() {
            if let Some(node) = hosts.item(i) {
                if let Ok(host) = node.dyn_into::<web_sys::HtmlElement>() {
                    // A lens that fails to mount degrades to nothing; it
                    // never takes the surrounding page down with it.
                    if let Err(err) = lens::mount(host) {
                        web_sys::console::warn_2(&"[lens] mount failed".into(), &err);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::sanitize;

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
