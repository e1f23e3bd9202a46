//! Lens configuration, read from the host element's data attributes.

/// Tunables for one mounted lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensConfig {
    /// Magnification factor, at least 1.
    pub magnify: f32,
    /// Perturb the sample position with a time-varying wave.
    pub ripple: bool,
    /// Use the pointer as the optical center instead of the host centroid.
    pub hover: bool,
    /// Overlay alpha in [0, 1].
    pub opacity: f32,
    /// Diagnostic checker pattern instead of the sampled snapshot.
    pub pattern: bool,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            magnify: 2.6,
            ripple: false,
            hover: false,
            opacity: 0.6,
            pattern: false,
        }
    }
}

impl LensConfig {
    /// Build a config from raw `data-*` attribute values. Missing or
    /// malformed values fall back to the defaults; numeric fields are
    /// clamped to their valid ranges.
    pub fn from_attrs(
        magnify: Option<&str>,
        ripple: Option<&str>,
        hover: Option<&str>,
        opacity: Option<&str>,
        pattern: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            magnify: parse_f32(magnify).unwrap_or(defaults.magnify).max(1.0),
            ripple: flag(ripple),
            hover: flag(hover),
            opacity: parse_f32(opacity)
                .unwrap_or(defaults.opacity)
                .clamp(0.0, 1.0),
            pattern: flag(pattern),
        }
    }
}

fn parse_f32(v: Option<&str>) -> Option<f32> {
    v.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|f| f.is_finite())
}

/// A present attribute enables the flag unless it spells a negative; a bare
/// `data-ripple` counts as on.
fn flag(v: Option<&str>) -> bool {
    match v {
        None => false,
        Some(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "off" | "no"
        ),
    }
}
