//! Properties of the lens transform, checked against the same arithmetic the
//! fragment shader runs.

use lens_wasm::geometry::{Rect, Viewport};
use lens_wasm::optics::{
    aberration, clamp_uv, effective_zoom, flip_y, radial_pull, ripple, RIPPLE_AMP,
};

fn dist(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn sub_unit_magnification_is_identity() {
    let p = (0.7, 0.4);
    let c = (0.3, 0.3);
    for m in [0.0, 0.5, 1.0] {
        assert_eq!(effective_zoom(m), 1.0);
        let s = radial_pull(p, c, m);
        assert!(approx(s.0, p.0) && approx(s.1, p.1), "m={m} s={s:?}");
    }
}

#[test]
fn center_is_fixed_point_for_any_magnification() {
    let c = (0.1166667, 0.3);
    for m in [1.0, 2.0, 2.6, 10.0, 100.0] {
        assert_eq!(radial_pull(c, c, m), c, "m={m}");
    }
}

#[test]
fn pull_strengthens_with_magnification() {
    let c = (0.1166667, 0.3);
    let p = (0.2, 0.3);
    let base = dist(p, c);
    let s2 = radial_pull(p, c, 2.0);
    let s10 = radial_pull(p, c, 10.0);
    assert!(dist(s2, c) < base);
    assert!(dist(s10, c) < dist(s2, c));
    assert!(dist(s10, c) > 0.0);
}

#[test]
fn aberration_grows_from_zero() {
    assert_eq!(aberration(0.0), 0.0);
    assert_eq!(aberration(0.5), 0.0);
    assert_eq!(aberration(1.0), 0.0);
    assert!(aberration(2.0) > 0.0);
    assert!(aberration(10.0) > aberration(2.0));
}

#[test]
fn host_centroid_scenario() {
    // Host {100, 200, 80, 80} in a 1200x800 viewport, hover off.
    let rect = Rect {
        x: 100.0,
        y: 200.0,
        w: 80.0,
        h: 80.0,
    };
    let vp = Viewport {
        w: 1200.0,
        h: 800.0,
    };
    let (cx, cy) = rect.center_in(vp);
    assert!((cx - 140.0 / 1200.0).abs() < 1e-12);
    assert!((cy - 0.3).abs() < 1e-12);

    // A fragment directly right of the center samples strictly between the
    // center and itself, and closer to the center as magnification grows.
    let c = (cx as f32, cy as f32);
    let p = (0.2, 0.3);
    let s = radial_pull(p, c, 2.6);
    assert!(s.0 > c.0 && s.0 < p.0);
    assert!(approx(s.1, 0.3));
    let s_strong = radial_pull(p, c, 10.0);
    assert!(s_strong.0 - c.0 < s.0 - c.0);
}

#[test]
fn sample_coordinates_stay_in_unit_square() {
    assert_eq!(clamp_uv((-0.1, 1.2)), (0.0, 1.0));
    assert_eq!(clamp_uv((0.25, 0.75)), (0.25, 0.75));
    // A center far outside the square still yields clamped samples.
    let s = radial_pull((0.9, 0.9), (1.8, -0.4), 2.0);
    assert!(s.0 <= 1.0 && s.0 >= 0.0 && s.1 <= 1.0 && s.1 >= 0.0);
}

#[test]
fn flip_matches_bitmap_origin() {
    assert_eq!(flip_y((0.25, 0.1)), (0.25, 0.9));
    assert_eq!(flip_y((0.0, 0.0)), (0.0, 1.0));
}

#[test]
fn ripple_displacement_is_bounded() {
    for i in 0..50 {
        let p = (i as f32 * 0.02, 1.0 - i as f32 * 0.02);
        let t = i as f32 * 0.37;
        let r = ripple(p, t);
        assert!((r.0 - p.0).abs() <= RIPPLE_AMP + 1e-7);
        assert!((r.1 - p.1).abs() <= RIPPLE_AMP + 1e-7);
    }
}
