use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// The square window of the complex plane mapped onto the canvas.
///
/// `zoom` is the width, in plane units, spanned by the full pixel edge, so
/// every pixel covers `zoom / size` units. The pixel `(size/2, size/2)` maps
/// exactly onto `center`.
///
/// A viewport is an immutable snapshot: the fields are private and every
/// transform hands back a new, validated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    size: u32,
    center: Complex,
    zoom: f64,
}

/// Re-validates on load so a malformed request can never produce a viewport.
impl<'de> Deserialize<'de> for Viewport {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            size: u32,
            center: Complex,
            zoom: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.size, raw.center, raw.zoom).map_err(serde::de::Error::custom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            center: Complex::ZERO,
            zoom: Self::DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Zoom of the default view: the plane from -2 to 2 on both axes.
    pub const DEFAULT_ZOOM: f64 = 4.0;
    /// Canvas edge length of the default view.
    pub const DEFAULT_SIZE: u32 = 600;

    /// Create a viewport, rejecting a zero size, a non-positive or
    /// non-finite zoom, and a non-finite center.
    pub fn new(size: u32, center: Complex, zoom: f64) -> crate::Result<Self> {
        if size == 0 {
            return Err(CoreError::InvalidSize(size));
        }
        if zoom <= 0.0 || !zoom.is_finite() {
            return Err(CoreError::InvalidZoom(zoom));
        }
        if !center.is_finite() {
            return Err(CoreError::InvalidCenter {
                re: center.re,
                im: center.im,
            });
        }
        Ok(Self { size, center, zoom })
    }

    /// The starting view: centred on the origin, four units wide.
    pub fn default_view(size: u32) -> crate::Result<Self> {
        Self::new(size, Complex::ZERO, Self::DEFAULT_ZOOM)
    }

    /// Canvas edge length in pixels.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn center(&self) -> Complex {
        self.center
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Plane units per pixel.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.zoom / self.size as f64
    }

    /// Same size and center at a different zoom.
    pub fn with_zoom(&self, zoom: f64) -> crate::Result<Self> {
        Self::new(self.size, self.center, zoom)
    }

    /// Same size and zoom around a different center.
    pub fn with_center(&self, center: Complex) -> crate::Result<Self> {
        Self::new(self.size, center, self.zoom)
    }

    /// Map a (possibly fractional) pixel coordinate onto the plane.
    ///
    /// `(0, 0)` is the top-left pixel; imaginary values grow with `y`.
    #[inline]
    pub fn screen_to_complex(&self, x: f64, y: f64) -> Complex {
        let half = self.size as f64 / 2.0;
        self.center + Complex::new(x - half, y - half) * self.scale()
    }

    /// Exact inverse of [`screen_to_complex`](Self::screen_to_complex).
    #[inline]
    pub fn complex_to_screen(&self, c: Complex) -> (f64, f64) {
        let half = self.size as f64 / 2.0;
        let scale = self.scale();
        let d = c - self.center;
        (d.re / scale + half, d.im / scale + half)
    }
}
