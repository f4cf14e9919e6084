pub mod band;
pub mod buffer;
pub mod colorizer;
pub mod config;
pub mod error;
pub mod renderer;
pub mod request;
pub mod worker;

pub use band::{build_row_bands, RowBand, DEFAULT_ROWS_PER_BAND};
pub use buffer::PixelBuffer;
pub use colorizer::{hsv_to_rgb, ColorizerKind};
pub use config::RenderConfig;
pub use error::RenderError;
pub use renderer::{render, render_parallel, RenderCancel, RenderStats};
pub use request::RenderRequest;
pub use worker::{CancelHandle, RenderOutcome, RenderTicket, RenderWorker};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
