//! Screen-space geometry for the lens: the host element's box, the viewport,
//! and the region handed to the rasterizer.

/// Bounding box of the host element, as reported by the DOM (client
/// coordinates, CSS pixels, y growing downward). Width and height are never
/// negative. Owned by the geometry tracker; everything else reads it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Viewport dimensions in device-independent pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Centroid of the box as a fraction of the viewport. This is the lens's
    /// optical center when hover tracking is off.
    pub fn center_in(&self, vp: Viewport) -> (f64, f64) {
        let vw = vp.w.max(1.0);
        let vh = vp.h.max(1.0);
        ((self.x + 0.5 * self.w) / vw, (self.y + 0.5 * self.h) / vh)
    }
}

/// Padding added around the host box before rasterizing, in CSS pixels per
/// side. Generous enough that magnified sampling near the rim still lands
/// inside the captured bitmap.
pub const CAPTURE_PAD: f64 = 80.0;

/// Page-absolute region to rasterize, snapped to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRegion {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Expand the host box by `pad` on each side and translate it into page
/// coordinates. The origin is clamped at zero; the rasterizer rejects
/// negative crops.
pub fn capture_region(rect: Rect, scroll_x: f64, scroll_y: f64, pad: f64) -> CaptureRegion {
    CaptureRegion {
        x: (rect.x + scroll_x - pad).floor().max(0.0),
        y: (rect.y + scroll_y - pad).floor().max(0.0),
        w: (rect.w + pad * 2.0).ceil(),
        h: (rect.h + pad * 2.0).ceil(),
    }
}
