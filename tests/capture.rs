//! Capture-region math, the single-flight gate, and config parsing.

use lens_wasm::config::LensConfig;
use lens_wasm::geometry::{capture_region, CaptureRegion, Rect, Viewport, CAPTURE_PAD};
use lens_wasm::sched::CaptureGate;

#[test]
fn region_expands_by_padding_and_snaps_to_pixels() {
    let rect = Rect {
        x: 100.4,
        y: 200.6,
        w: 80.2,
        h: 40.0,
    };
    let region = capture_region(rect, 10.0, 20.0, CAPTURE_PAD);
    assert_eq!(
        region,
        CaptureRegion {
            x: 30.0,  // floor(100.4 + 10 - 80)
            y: 140.0, // floor(200.6 + 20 - 80)
            w: 241.0, // ceil(80.2 + 160)
            h: 200.0,
        }
    );
}

#[test]
fn region_origin_clamps_at_zero() {
    let rect = Rect {
        x: 10.0,
        y: 5.0,
        w: 50.0,
        h: 50.0,
    };
    let region = capture_region(rect, 0.0, 0.0, CAPTURE_PAD);
    assert_eq!(region.x, 0.0);
    assert_eq!(region.y, 0.0);
    assert_eq!(region.w, 210.0);
}

#[test]
fn centroid_guards_degenerate_viewport() {
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 10.0,
        h: 10.0,
    };
    // A zero-sized viewport must not divide by zero.
    let (cx, cy) = rect.center_in(Viewport { w: 0.0, h: 0.0 });
    assert_eq!((cx, cy), (5.0, 5.0));
}

#[test]
fn gate_coalesces_requests_behind_one_flight() {
    let gate = CaptureGate::new();
    assert!(gate.request(), "idle gate starts a pass");
    assert!(!gate.request(), "second request queues");
    assert!(!gate.request(), "third request coalesces into the same queue");
    assert_eq!(gate.requested(), 3);
    assert!(gate.in_flight());

    assert!(gate.settle(), "queued request runs once more");
    assert!(!gate.settle(), "nothing queued, gate released");
    assert!(!gate.in_flight());
    assert!(gate.request(), "released gate starts again");
}

#[test]
fn one_resize_means_one_pass() {
    let gate = CaptureGate::new();
    assert!(gate.request());
    assert!(!gate.settle());
    assert_eq!(gate.requested(), 1);
}

#[test]
fn config_defaults() {
    let config = LensConfig::from_attrs(None, None, None, None, None);
    assert_eq!(config, LensConfig::default());
    assert_eq!(config.magnify, 2.6);
    assert_eq!(config.opacity, 0.6);
    assert!(!config.ripple && !config.hover && !config.pattern);
}

#[test]
fn config_clamps_numeric_fields() {
    let config = LensConfig::from_attrs(Some("0.5"), None, None, Some("1.5"), None);
    assert_eq!(config.magnify, 1.0);
    assert_eq!(config.opacity, 1.0);
    let config = LensConfig::from_attrs(Some("4.2"), None, None, Some("-2"), None);
    assert_eq!(config.magnify, 4.2);
    assert_eq!(config.opacity, 0.0);
}

#[test]
fn config_tolerates_malformed_values() {
    let config = LensConfig::from_attrs(Some("abc"), None, None, Some("NaN"), None);
    assert_eq!(config.magnify, 2.6);
    assert_eq!(config.opacity, 0.6);
}

#[test]
fn config_flags_follow_attribute_presence() {
    // A bare data attribute reads as the empty string and enables the flag.
    let config = LensConfig::from_attrs(None, Some(""), Some("true"), None, Some("1"));
    assert!(config.ripple && config.hover && config.pattern);
    let config = LensConfig::from_attrs(None, Some("false"), Some("OFF"), None, Some("0"));
    assert!(!config.ripple && !config.hover && !config.pattern);
}
