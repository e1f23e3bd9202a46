//! CPU mirror of the fragment shader's lens transform.
//!
//! The GLSL below samples the snapshot through a radial magnification with
//! per-channel chromatic offsets. The same arithmetic is kept here in Rust so
//! the transform's properties (center fixed point, clamping, monotonic pull)
//! can be checked off-GPU.

/// Chromatic aberration offset per unit of magnification beyond 1x.
pub const ABERRATION_SCALE: f32 = 0.0075;

/// Ripple wave parameters: spatial frequency over page V, speed over time,
/// and displacement amplitude in UV units.
pub const RIPPLE_FREQ: f32 = 12.0;
pub const RIPPLE_SPEED: f32 = 2.0;
pub const RIPPLE_AMP: f32 = 0.006;

/// Magnification below 1x renders as a plain pane; the transform never
/// pushes samples away from the center.
pub fn effective_zoom(magnify: f32) -> f32 {
    magnify.max(1.0)
}

/// Clamp a UV pair to the unit square. The snapshot texture wraps
/// clamp-to-edge, so out-of-range lookups would smear the border.
pub fn clamp_uv(uv: (f32, f32)) -> (f32, f32) {
    (uv.0.clamp(0.0, 1.0), uv.1.clamp(0.0, 1.0))
}

/// Pull a page-space position toward the optical center. Dividing the
/// center-relative direction by the zoom draws samples from closer to the
/// center, which is what bulges the content like a convex lens. The center
/// itself is a fixed point for every zoom value.
pub fn radial_pull(p: (f32, f32), center: (f32, f32), magnify: f32) -> (f32, f32) {
    let z = effective_zoom(magnify);
    clamp_uv((
        center.0 + (p.0 - center.0) / z,
        center.1 + (p.1 - center.1) / z,
    ))
}

/// Chromatic aberration magnitude for a given magnification. Zero at 1x so
/// an idle lens shows no fringing, growing linearly with lens strength.
pub fn aberration(magnify: f32) -> f32 {
    ABERRATION_SCALE * (effective_zoom(magnify) - 1.0)
}

/// Time-varying ripple displacement applied to a page-space position before
/// the radial pull.
pub fn ripple(p: (f32, f32), time: f32) -> (f32, f32) {
    let wave = (RIPPLE_FREQ * p.1 + RIPPLE_SPEED * time).sin() * RIPPLE_AMP;
    (p.0 + wave, p.1 + wave)
}

/// The bitmap is uploaded Y-flipped while page space has v growing
/// downward; sampling bridges the two conventions by flipping V.
pub fn flip_y(uv: (f32, f32)) -> (f32, f32) {
    (uv.0, 1.0 - uv.1)
}
