use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use fractview_core::evaluate;

use crate::band::build_row_bands;
use crate::buffer::PixelBuffer;
use crate::error::RenderError;
use crate::request::RenderRequest;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Tracks the current render generation for cancellation and progress.
///
/// A render captures the generation it was started under; advancing the
/// generation makes every in-flight band of that render stop early.
#[derive(Debug)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            progress_done: AtomicUsize::new(0),
            progress_total: AtomicUsize::new(0),
        }
    }

    /// Cancel whatever is running by advancing the generation.
    pub fn cancel(&self) {
        self.advance();
    }

    /// Advance the generation and return the new value.
    pub fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Advance the generation only if it is still `generation`.
    ///
    /// Returns `false` when a newer render has already taken over.
    pub fn cancel_generation(&self, generation: u64) -> bool {
        self.generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new render with `total` bands.
    pub fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    /// Mark one more band as finished.
    pub fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current progress as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Timing and partitioning details of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub elapsed: Duration,
    /// Row bands the frame was split into (1 for a synchronous render).
    pub bands: usize,
    /// Threads available to the render.
    pub threads: usize,
}

// ---------------------------------------------------------------------------
// Per-pixel kernel
// ---------------------------------------------------------------------------

/// Fill whole rows starting at `first_row`.
///
/// `pixels` must hold a whole number of rows. Both render modes funnel
/// through this function, which is what makes their output byte-identical.
fn render_rows(pixels: &mut [u8], first_row: u32, request: &RenderRequest) {
    let viewport = request.viewport;
    let size = viewport.size() as usize;
    for (i, px) in pixels.chunks_exact_mut(4).enumerate() {
        let x = (i % size) as f64;
        let y = (first_row as usize + i / size) as f64;
        let c = viewport.screen_to_complex(x, y);
        let result = evaluate(c, request.max_iterations);
        px.copy_from_slice(&request.colorizer.colorize(&result));
    }
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

/// Render a full frame on the calling thread.
///
/// Returns once every pixel of `buffer` has been written.
pub fn render(buffer: &mut PixelBuffer, request: &RenderRequest) -> crate::Result<RenderStats> {
    buffer.check_fits(request)?;
    let start = Instant::now();
    debug!(
        size = request.viewport.size(),
        max_iterations = request.max_iterations,
        colorizer = ?request.colorizer,
        "Starting synchronous render"
    );

    render_rows(buffer.as_bytes_mut(), 0, request);

    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_millis(), "Synchronous render complete");
    Ok(RenderStats {
        elapsed,
        bands: 1,
        threads: 1,
    })
}

/// Render a full frame split into row bands processed in parallel via Rayon.
///
/// Runs on the current Rayon pool (use `ThreadPool::install` to pick one).
/// Every band re-checks `cancel` against `generation` before starting, and
/// the render fails with [`RenderError::Cancelled`] if the generation moved
/// on; the buffer contents are then unspecified.
pub fn render_parallel(
    buffer: &mut PixelBuffer,
    request: &RenderRequest,
    rows_per_band: u32,
    cancel: &RenderCancel,
    generation: u64,
) -> crate::Result<RenderStats> {
    buffer.check_fits(request)?;
    let start = Instant::now();
    let size = request.viewport.size();
    let bands = build_row_bands(size, rows_per_band);
    let band_bytes = rows_per_band.max(1) as usize * buffer.row_bytes();
    let threads = rayon::current_num_threads();

    debug!(
        generation,
        size,
        bands = bands.len(),
        threads,
        max_iterations = request.max_iterations,
        colorizer = ?request.colorizer,
        "Starting parallel render"
    );
    cancel.reset_progress(bands.len());

    buffer
        .as_bytes_mut()
        .par_chunks_mut(band_bytes)
        .zip(bands.par_iter())
        .for_each(|(chunk, band)| {
            if cancel.generation() != generation {
                return;
            }
            debug_assert_eq!(chunk.len(), band.byte_range(size).len());
            render_rows(chunk, band.y, request);
            cancel.inc_progress();
        });

    if cancel.generation() != generation {
        debug!(generation, "Parallel render cancelled");
        return Err(RenderError::Cancelled { generation });
    }

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        generation,
        bands = bands.len(),
        threads,
        "Parallel render complete"
    );
    Ok(RenderStats {
        elapsed,
        bands: bands.len(),
        threads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizer::ColorizerKind;
    use fractview_core::{Complex, Viewport};

    fn request(size: u32, center: Complex, zoom: f64, iters: u32, kind: ColorizerKind) -> RenderRequest {
        RenderRequest::new(Viewport::new(size, center, zoom).unwrap(), iters, kind).unwrap()
    }

    #[test]
    fn four_by_four_black_and_white() {
        // Scale 1: pixel (x, y) maps to (x - 2) + (y - 2)i, so only (2, 2)
        // lands on the origin; every other point has |c| >= 1.
        let req = request(4, Complex::ZERO, 4.0, 1, ColorizerKind::BlackAndWhite);
        let mut buf = PixelBuffer::for_request(&req);
        render(&mut buf, &req).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (x, y) == (2, 2) { [0, 0, 0, 255] } else { [255, 255, 255, 255] };
                assert_eq!(buf.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn parallel_matches_synchronous() {
        for kind in ColorizerKind::ALL {
            let req = request(37, Complex::new(-0.6, 0.2), 2.5, 120, kind);
            let mut sync_buf = PixelBuffer::for_request(&req);
            render(&mut sync_buf, &req).unwrap();

            for rows in [1, 3, 16, 64] {
                let cancel = RenderCancel::new();
                let mut par_buf = PixelBuffer::for_request(&req);
                let stats =
                    render_parallel(&mut par_buf, &req, rows, &cancel, cancel.generation()).unwrap();
                assert_eq!(par_buf, sync_buf, "{kind} with {rows} rows per band");
                assert_eq!(stats.bands, build_row_bands(37, rows).len());
            }
        }
    }

    #[test]
    fn progress_reaches_total() {
        let req = request(20, Complex::ZERO, 4.0, 10, ColorizerKind::Rainbow);
        let cancel = RenderCancel::new();
        let mut buf = PixelBuffer::for_request(&req);
        render_parallel(&mut buf, &req, 4, &cancel, 0).unwrap();
        assert_eq!(cancel.progress(), (5, 5));
    }

    #[test]
    fn stale_generation_is_cancelled() {
        let req = request(16, Complex::ZERO, 4.0, 10, ColorizerKind::Rainbow);
        let cancel = RenderCancel::new();
        cancel.cancel();
        let mut buf = PixelBuffer::for_request(&req);
        let err = render_parallel(&mut buf, &req, 4, &cancel, 0).unwrap_err();
        assert!(matches!(err, RenderError::Cancelled { generation: 0 }));
        assert_eq!(cancel.progress(), (0, 4));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let req = request(8, Complex::ZERO, 4.0, 10, ColorizerKind::Psychedelic);
        let mut small = PixelBuffer::new(7);
        assert!(matches!(
            render(&mut small, &req),
            Err(RenderError::BufferSizeMismatch { .. })
        ));
        let cancel = RenderCancel::new();
        assert!(render_parallel(&mut small, &req, 2, &cancel, 0).is_err());
        // Nothing was written.
        assert_eq!(small, PixelBuffer::new(7));
    }

    #[test]
    fn cancel_generation_only_hits_current() {
        let cancel = RenderCancel::new();
        let g1 = cancel.advance();
        let g2 = cancel.advance();
        assert!(!cancel.cancel_generation(g1));
        assert_eq!(cancel.generation(), g2);
        assert!(cancel.cancel_generation(g2));
        assert_eq!(cancel.generation(), g2 + 1);
    }
}
