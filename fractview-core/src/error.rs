use thiserror::Error;

/// Errors originating from the core math and viewport tools.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid canvas size: {0} (must be >= 1)")]
    InvalidSize(u32),

    #[error("invalid zoom: {0} (must be positive and finite)")]
    InvalidZoom(f64),

    #[error("invalid center: {re} + {im}i (components must be finite)")]
    InvalidCenter { re: f64, im: f64 },

    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid zoom factor: {0} (must be positive and finite)")]
    InvalidZoomFactor(f64),

    #[error("selection is degenerate: {reason}")]
    DegenerateSelection { reason: String },
}
