use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fractview_core::{Complex, DrawCommand, PointerEvent, Tool, ToolKind, Viewport};
use fractview_render::{
    ColorizerKind, PixelBuffer, RenderError, RenderRequest, RenderTicket, RenderWorker,
};

use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// One user action in a scripted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SessionStep {
    /// Switch tool. `factor` defaults to 2 and only matters for the click tools.
    SelectTool {
        tool: ToolKind,
        #[serde(default)]
        factor: Option<f64>,
    },
    Pointer(PointerEvent),
    SetColorizer { colorizer: ColorizerKind },
    SetMaxIterations {
        #[serde(rename = "maxIterations")]
        max_iterations: u32,
    },
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FrameStatus {
    Rendered {
        /// Hash of the RGBA bytes; equal frames hash equal.
        digest: u64,
        elapsed: Duration,
        bands: usize,
    },
    /// A newer frame took over before this one finished.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub index: usize,
    pub generation: u64,
    pub request: RenderRequest,
    pub status: FrameStatus,
}

impl FrameReport {
    pub fn digest(&self) -> Option<u64> {
        match self.status {
            FrameStatus::Rendered { digest, .. } => Some(digest),
            FrameStatus::Superseded => None,
        }
    }
}

pub fn digest(buffer: &PixelBuffer) -> u64 {
    let mut hasher = DefaultHasher::new();
    buffer.as_bytes().hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Headless stand-in for the interactive canvas: owns the current request
/// and tool, forwards every step to them, and sends a frame to the worker
/// whenever the view or its coloring changes.
struct SessionDriver<'w> {
    worker: &'w RenderWorker,
    request: RenderRequest,
    tool: Tool,
    wait_each_frame: bool,
    overlay: Vec<DrawCommand>,
    hover: Option<Complex>,
    pending: Vec<(usize, RenderRequest, RenderTicket)>,
    frames: Vec<FrameReport>,
    submitted: usize,
}

impl<'w> SessionDriver<'w> {
    fn new(config: &AppConfig, worker: &'w RenderWorker) -> fractview_render::Result<Self> {
        Ok(Self {
            worker,
            request: config.initial_request()?,
            tool: Tool::default(),
            wait_each_frame: config.wait_each_frame,
            overlay: Vec::new(),
            hover: None,
            pending: Vec::new(),
            frames: Vec::new(),
            submitted: 0,
        })
    }

    fn step(&mut self, step: &SessionStep) -> fractview_render::Result<()> {
        match *step {
            SessionStep::SelectTool { tool, factor } => {
                self.tool = Tool::select(tool, factor.unwrap_or(Tool::DEFAULT_FACTOR))?;
                self.overlay.clear();
                debug!(tool = ?tool, "Tool selected");
            }
            SessionStep::Pointer(event) => self.pointer(event)?,
            SessionStep::SetColorizer { colorizer } => {
                if colorizer != self.request.colorizer {
                    self.request = self.request.with_colorizer(colorizer);
                    self.submit()?;
                }
            }
            SessionStep::SetMaxIterations { max_iterations } => {
                self.request =
                    RenderRequest::new(self.request.viewport, max_iterations, self.request.colorizer)?;
                self.submit()?;
            }
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) -> fractview_render::Result<()> {
        let viewport = self.request.viewport;
        match self.tool.handle_pointer_event(&viewport, event) {
            Ok(outcome) => {
                if let Some(overlay) = outcome.overlay {
                    self.overlay = overlay;
                }
                if let Some(hover) = outcome.hover {
                    self.hover = Some(hover);
                    debug!(re = hover.re, im = hover.im, "Pointer over plane");
                }
                if let Some(next) = outcome.viewport {
                    self.navigate(next)?;
                }
            }
            Err(e) => {
                // The tool is already idle again; drop the stale overlay.
                warn!("Selection ignored: {e}");
                self.overlay.clear();
            }
        }
        Ok(())
    }

    fn navigate(&mut self, viewport: Viewport) -> fractview_render::Result<()> {
        self.request = RenderRequest { viewport, ..self.request };
        self.submit()
    }

    fn submit(&mut self) -> fractview_render::Result<()> {
        let index = self.submitted;
        self.submitted += 1;
        let ticket = self.worker.submit(self.request)?;
        debug!(
            index,
            generation = ticket.generation(),
            zoom = self.request.viewport.zoom(),
            "Frame submitted"
        );
        if self.wait_each_frame {
            let report = collect(index, self.request, ticket)?;
            self.frames.push(report);
        } else {
            self.pending.push((index, self.request, ticket));
        }
        Ok(())
    }

    fn finish(mut self) -> fractview_render::Result<Vec<FrameReport>> {
        for (index, request, ticket) in std::mem::take(&mut self.pending) {
            self.frames.push(collect(index, request, ticket)?);
        }
        self.frames.sort_by_key(|f| f.index);
        Ok(self.frames)
    }
}

fn collect(
    index: usize,
    request: RenderRequest,
    ticket: RenderTicket,
) -> fractview_render::Result<FrameReport> {
    let generation = ticket.generation();
    let status = match ticket.wait() {
        Ok(outcome) => FrameStatus::Rendered {
            digest: digest(&outcome.buffer),
            elapsed: outcome.stats.elapsed,
            bands: outcome.stats.bands,
        },
        Err(RenderError::Superseded { latest, .. }) => {
            warn!(index, generation, latest, "Dropping stale frame");
            FrameStatus::Superseded
        }
        Err(e) => return Err(e),
    };
    Ok(FrameReport {
        index,
        generation,
        request,
        status,
    })
}

/// Render the starting view, then replay `config.session` step by step.
///
/// Returns one report per submitted frame, in submission order.
pub fn replay(config: &AppConfig, worker: &RenderWorker) -> fractview_render::Result<Vec<FrameReport>> {
    let mut driver = SessionDriver::new(config, worker)?;
    driver.submit()?;
    for (i, step) in config.session.iter().enumerate() {
        debug!(step = i, ?step, "Replaying");
        driver.step(step)?;
    }
    if !driver.overlay.is_empty() {
        info!(commands = driver.overlay.len(), "Session ended mid-drag");
    }
    if let Some(hover) = driver.hover {
        info!(re = hover.re, im = hover.im, "Last pointer position");
    }
    driver.finish()
}
