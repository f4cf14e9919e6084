use crate::complex::Complex;

/// Squared escape radius. Once `|z| > 2` the orbit of `z² + c` is known to
/// diverge, so the loop compares `|z|²` against 4 and skips the square root.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Outcome of iterating a single point.
///
/// `iteration_count` is the zero-based step on which the orbit first left
/// the escape radius, or `max_iterations` when it never did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeResult {
    /// Orbit value at the moment of escape, or after the last iteration.
    pub final_value: Complex,
    pub iteration_count: u32,
    pub diverged: bool,
}

impl EscapeResult {
    /// Interior result for an orbit that stayed bounded.
    #[inline]
    pub fn bounded(final_value: Complex, max_iterations: u32) -> Self {
        Self {
            final_value,
            iteration_count: max_iterations,
            diverged: false,
        }
    }
}

/// Iterate `z₀ = 0, zₙ₊₁ = zₙ² + c` until `|zₙ₊₁|² > 4` or the cap is hit.
///
/// Deterministic and side-effect free; `max_iterations` bounds the work.
#[inline]
pub fn evaluate(c: Complex, max_iterations: u32) -> EscapeResult {
    let mut z = Complex::ZERO;
    for n in 0..max_iterations {
        z = z.square() + c;
        if z.norm_sq() > ESCAPE_RADIUS_SQ {
            return EscapeResult {
                final_value: z,
                iteration_count: n,
                diverged: true,
            };
        }
    }
    EscapeResult::bounded(z, max_iterations)
}
