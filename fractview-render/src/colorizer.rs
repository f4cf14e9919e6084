use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use fractview_core::EscapeResult;

const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Iteration count that maps onto one full turn of hue in [`ColorizerKind::IterationBased`].
const ITERATION_HUE_SPAN: f64 = 200.0;

// ---------------------------------------------------------------------------
// Colorizer selection
// ---------------------------------------------------------------------------

/// The closed set of colorizers.
///
/// Every variant is a pure function of one [`EscapeResult`], so switching
/// colorizer never needs the orbit to be evaluated again and pixels can be
/// colored in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorizerKind {
    #[default]
    BlackAndWhite,
    Rainbow,
    Psychedelic,
    IterationBased,
}

impl ColorizerKind {
    pub const ALL: [Self; 4] = [
        Self::BlackAndWhite,
        Self::Rainbow,
        Self::Psychedelic,
        Self::IterationBased,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::BlackAndWhite => "Black & white",
            Self::Rainbow => "Rainbow",
            Self::Psychedelic => "Psychedelic",
            Self::IterationBased => "Iteration based",
        }
    }

    /// Map an escape result to an RGBA pixel.
    #[inline]
    pub fn colorize(self, result: &EscapeResult) -> [u8; 4] {
        match self {
            Self::BlackAndWhite => black_and_white(result),
            Self::Rainbow => rainbow(result),
            Self::Psychedelic => psychedelic(result),
            Self::IterationBased => iteration_based(result),
        }
    }
}

impl std::fmt::Display for ColorizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Grey level from the magnitude of the final orbit value.
fn black_and_white(result: &EscapeResult) -> [u8; 4] {
    let v = channel((result.final_value.norm() * 255.0).min(255.0));
    [v, v, v, 255]
}

/// Hue from the argument of the final value, green from its magnitude.
fn rainbow(result: &EscapeResult) -> [u8; 4] {
    let z = result.final_value;
    let brightness = z.norm() * 255.0;
    let hue = (z.arg() / TAU + 1.0) * 255.0;
    [channel(hue), channel(brightness), channel(255.0 - hue), 255]
}

fn psychedelic(result: &EscapeResult) -> [u8; 4] {
    if !result.diverged {
        return OPAQUE_BLACK;
    }
    let hue = result.final_value.norm() * 100.0;
    with_alpha(hsv_to_rgb(hue, 100.0, result.iteration_count as f64))
}

fn iteration_based(result: &EscapeResult) -> [u8; 4] {
    let value = if result.diverged {
        result.iteration_count as f64
    } else {
        0.0
    };
    let hue = value / ITERATION_HUE_SPAN * 255.0;
    with_alpha(hsv_to_rgb(hue, 100.0, value))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Round to the nearest byte, saturating at both ends. NaN maps to 0.
#[inline]
fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn with_alpha([r, g, b]: [u8; 3]) -> [u8; 4] {
    [r, g, b, 255]
}

/// Six-sector HSV → RGB.
///
/// `hue` is in degrees and wraps modulo 360; `saturation` and `value` are
/// percentages clamped to `[0, 100]`.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [u8; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (value / 100.0).clamp(0.0, 1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    // `rem_euclid` may round up to exactly 360, i.e. sector 6.
    let (r, g, b) = match (sector as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [channel(r * 255.0), channel(g * 255.0), channel(b * 255.0)]
}
