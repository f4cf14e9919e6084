pub mod complex;
pub mod error;
pub mod escape;
pub mod overlay;
pub mod tools;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{evaluate, EscapeResult, ESCAPE_RADIUS_SQ};
pub use overlay::{DrawCommand, PixelPoint, Stroke, StrokeColor};
pub use tools::{DragState, PointerEvent, Tool, ToolKind, ToolOutcome};
pub use viewport::Viewport;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
