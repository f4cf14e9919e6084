//! Offloaded rendering on a dedicated background thread.
//!
//! A [`RenderWorker`] owns one thread and one Rayon pool for its whole
//! lifetime. Each [`submit`](RenderWorker::submit) moves a request and a
//! buffer to the thread and returns a [`RenderTicket`] immediately; the
//! filled buffer comes back through the ticket.
//!
//! Newer submissions win: every submission gets the next generation number,
//! queued older jobs are drained without rendering, and an in-flight older
//! job stops at its next band boundary. Both complete with
//! [`RenderError::Superseded`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::buffer::PixelBuffer;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::renderer::{render, render_parallel, RenderCancel, RenderStats};
use crate::request::RenderRequest;

/// Signature of the function the worker runs for each job.
pub(crate) type RenderFn = fn(
    &RenderConfig,
    &mut PixelBuffer,
    &RenderRequest,
    &RenderCancel,
    u64,
) -> crate::Result<RenderStats>;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A finished offloaded render.
#[derive(Debug)]
pub struct RenderOutcome {
    pub generation: u64,
    pub request: RenderRequest,
    pub buffer: PixelBuffer,
    pub stats: RenderStats,
}

type Completion = crate::Result<RenderOutcome>;

struct Job {
    generation: u64,
    request: RenderRequest,
    buffer: PixelBuffer,
    reply: mpsc::Sender<Completion>,
}

/// Cancels one submitted render, and only that one.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancel: Arc<RenderCancel>,
    generation: u64,
}

impl CancelHandle {
    /// Returns `false` if the render had already been superseded.
    pub fn cancel(&self) -> bool {
        let hit = self.cancel.cancel_generation(self.generation);
        if hit {
            debug!(generation = self.generation, "Render cancelled by caller");
        }
        hit
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to one submitted render: its generation, a way to cancel it, and
/// the channel its completion arrives on.
///
/// Exactly one completion is delivered per ticket.
#[derive(Debug)]
pub struct RenderTicket {
    generation: u64,
    cancel: CancelHandle,
    completion: mpsc::Receiver<Completion>,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    /// Block until the render completes.
    pub fn wait(self) -> Completion {
        self.completion
            .recv()
            .unwrap_or(Err(RenderError::WorkerUnavailable))
    }

    /// Block for at most `timeout`; `None` if the render is still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.completion.recv_timeout(timeout) {
            Ok(done) => Some(done),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Some(Err(RenderError::WorkerUnavailable)),
        }
    }

    /// Poll without blocking; `None` if the render is still running.
    pub fn try_take(&self) -> Option<Completion> {
        match self.completion.try_recv() {
            Ok(done) => Some(done),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(RenderError::WorkerUnavailable)),
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Long-lived background render unit.
///
/// Dropping the worker (or calling [`shutdown`](Self::shutdown)) cancels the
/// running job, lets every queued ticket complete, and joins the thread.
pub struct RenderWorker {
    jobs: Option<mpsc::Sender<Job>>,
    thread: Option<JoinHandle<()>>,
    cancel: Arc<RenderCancel>,
    /// Generation of the newest submission. Held across the generation bump
    /// in `submit` so the worker never sees the bump without the new value.
    latest: Arc<Mutex<u64>>,
    threads: usize,
}

impl RenderWorker {
    /// Start the worker thread and its render pool.
    pub fn create(config: RenderConfig) -> crate::Result<Self> {
        Self::spawn_with(config, run_render)
    }

    pub(crate) fn spawn_with(config: RenderConfig, render_fn: RenderFn) -> crate::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("render-pool-{i}"))
            .build()?;
        let threads = pool.current_num_threads();

        let cancel = Arc::new(RenderCancel::new());
        let latest = Arc::new(Mutex::new(cancel.generation()));
        let (tx, rx) = mpsc::channel::<Job>();

        let ctx = WorkerContext {
            config,
            pool,
            render_fn,
            cancel: Arc::clone(&cancel),
            latest: Arc::clone(&latest),
        };
        let thread = std::thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || ctx.run(rx))
            .map_err(RenderError::Spawn)?;

        info!(
            threads,
            parallel = config.parallel,
            rows_per_band = config.band_rows(),
            "Render worker created"
        );
        Ok(Self {
            jobs: Some(tx),
            thread: Some(thread),
            cancel,
            latest,
            threads,
        })
    }

    /// Queue `request` with a freshly allocated buffer.
    pub fn submit(&self, request: RenderRequest) -> crate::Result<RenderTicket> {
        let buffer = PixelBuffer::for_request(&request);
        self.submit_with_buffer(request, buffer)
    }

    /// Queue `request`, moving `buffer` into the job to be filled.
    ///
    /// The buffer comes back inside the [`RenderOutcome`] on success.
    pub fn submit_with_buffer(
        &self,
        request: RenderRequest,
        buffer: PixelBuffer,
    ) -> crate::Result<RenderTicket> {
        buffer.check_fits(&request)?;
        let jobs = self.jobs.as_ref().ok_or(RenderError::WorkerUnavailable)?;

        let mut latest = lock(&self.latest);
        // Advancing the shared generation also stops the job now in flight.
        let generation = self.cancel.advance();
        *latest = generation;
        drop(latest);

        let (reply, completion) = mpsc::channel();
        jobs.send(Job {
            generation,
            request,
            buffer,
            reply,
        })
        .map_err(|_| RenderError::WorkerUnavailable)?;

        debug!(
            generation,
            size = request.viewport.size(),
            zoom = request.viewport.zoom(),
            max_iterations = request.max_iterations,
            "Render submitted"
        );
        Ok(RenderTicket {
            generation,
            cancel: CancelHandle {
                cancel: Arc::clone(&self.cancel),
                generation,
            },
            completion,
        })
    }

    /// Generation of the most recent submission.
    pub fn latest_generation(&self) -> u64 {
        *lock(&self.latest)
    }

    /// Band progress of the running job as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        self.cancel.progress()
    }

    /// Threads in the render pool.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Cancel the running job, complete queued tickets and join the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.jobs.is_none() && self.thread.is_none() {
            return;
        }
        self.cancel.cancel();
        drop(self.jobs.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Render worker thread panicked during shutdown");
            }
        }
        debug!("Render worker shut down");
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RenderWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWorker")
            .field("running", &self.thread.is_some())
            .field("latest_generation", &self.latest_generation())
            .field("threads", &self.threads)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

/// Everything the worker thread owns.
struct WorkerContext {
    config: RenderConfig,
    pool: rayon::ThreadPool,
    render_fn: RenderFn,
    cancel: Arc<RenderCancel>,
    latest: Arc<Mutex<u64>>,
}

impl WorkerContext {
    fn run(self, rx: mpsc::Receiver<Job>) {
        debug!("Render worker thread started");
        while let Ok(initial) = rx.recv() {
            let Job {
                generation,
                request,
                mut buffer,
                reply,
            } = self.drain_latest(initial, &rx);

            let completion = self
                .run_job(generation, &request, &mut buffer)
                .map(|stats| RenderOutcome {
                    generation,
                    request,
                    buffer,
                    stats,
                });
            if reply.send(completion).is_err() {
                debug!(generation, "Ticket dropped before completion");
            }
        }
        debug!("Render worker thread exiting");
    }

    /// Keep only the newest queued job; older ones complete as stale.
    fn drain_latest(&self, initial: Job, rx: &mpsc::Receiver<Job>) -> Job {
        let mut job = initial;
        while let Ok(newer) = rx.try_recv() {
            let stale = std::mem::replace(&mut job, newer);
            let _ = stale.reply.send(Err(self.stale_error(stale.generation)));
        }
        job
    }

    /// Render one job on the pool, turning a panic into an error so the
    /// worker survives it.
    fn run_job(
        &self,
        generation: u64,
        request: &RenderRequest,
        buffer: &mut PixelBuffer,
    ) -> crate::Result<RenderStats> {
        if self.cancel.generation() != generation {
            return Err(self.stale_error(generation));
        }
        let render_fn = self.render_fn;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                render_fn(&self.config, buffer, request, &self.cancel, generation)
            })
        }));
        match outcome {
            Ok(Err(RenderError::Cancelled { .. })) => Err(self.stale_error(generation)),
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(generation, %message, "Render panicked");
                Err(RenderError::WorkerPanicked(message))
            }
        }
    }

    /// Why a job whose generation is no longer current did not finish.
    fn stale_error(&self, generation: u64) -> RenderError {
        let latest = *lock(&self.latest);
        if latest > generation {
            warn!(generation, latest, "Dropping superseded render");
            RenderError::Superseded { generation, latest }
        } else {
            RenderError::Cancelled { generation }
        }
    }
}

/// The default job body: parallel bands or a plain synchronous pass.
fn run_render(
    config: &RenderConfig,
    buffer: &mut PixelBuffer,
    request: &RenderRequest,
    cancel: &RenderCancel,
    generation: u64,
) -> crate::Result<RenderStats> {
    if config.parallel {
        render_parallel(buffer, request, config.band_rows(), cancel, generation)
    } else {
        cancel.reset_progress(1);
        let stats = render(buffer, request)?;
        if cancel.generation() != generation {
            return Err(RenderError::Cancelled { generation });
        }
        cancel.inc_progress();
        Ok(stats)
    }
}

fn lock(latest: &Mutex<u64>) -> MutexGuard<'_, u64> {
    latest.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
