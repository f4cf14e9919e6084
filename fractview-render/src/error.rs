use thiserror::Error;

/// Errors originating from the rendering pipeline and its worker.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel buffer holds {actual} bytes, request needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("render {generation} cancelled")]
    Cancelled { generation: u64 },

    #[error("render {generation} superseded by render {latest}")]
    Superseded { generation: u64, latest: u64 },

    #[error("render worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("render worker is not running")]
    WorkerUnavailable,

    #[error("failed to build render thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn render worker thread")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Core(#[from] fractview_core::CoreError),
}
