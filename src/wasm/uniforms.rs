//! Shared shader input state.

use crate::config::LensConfig;
use crate::geometry::{Rect, Viewport};
use web_sys::WebGlTexture;

/// A captured bitmap bound as a texture, together with the geometry that was
/// current when it was taken. Immutable once bound; superseded atomically by
/// the snapshot producer.
pub(super) struct Snapshot {
    pub texture: WebGlTexture,
    pub rect: Rect,
    pub viewport: Viewport,
}

/// The shader's full input state. One statically-shaped value per lens,
/// overwritten in place by the trackers and read once per frame by the
/// draw loop; no history is kept.
pub(super) struct LensUniforms {
    /// Seconds since mount.
    pub time: f32,
    pub magnify: f32,
    pub ripple: bool,
    pub pattern: bool,
    pub hover: bool,
    pub opacity: f32,
    /// Host box, written only by the geometry tracker.
    pub rect: Rect,
    /// Viewport, written only by the geometry tracker.
    pub viewport: Viewport,
    /// Normalized pointer position; meaningful only when `hover` is set.
    pub pointer: (f32, f32),
}

impl LensUniforms {
    pub fn new(config: LensConfig) -> Self {
        Self {
            time: 0.0,
            magnify: config.magnify,
            ripple: config.ripple,
            pattern: config.pattern,
            hover: config.hover,
            opacity: config.opacity,
            rect: Rect::default(),
            viewport: Viewport::default(),
            pointer: (0.5, 0.5),
        }
    }
}
