//! Pointer-driven viewport tools.
//!
//! A [`Tool`] is plain data: the active variant plus, for the drag tools, the
//! anchor of an in-progress drag. Feeding it pointer events together with the
//! current [`Viewport`] yields an optional replacement viewport and optional
//! overlay draw instructions. The tool never holds on to the viewport.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::overlay::{reticle, selection_rect, DrawCommand, PixelPoint};
use crate::viewport::Viewport;

/// Pointer input, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerEvent {
    Down(PixelPoint),
    Move(PixelPoint),
    Up(PixelPoint),
    Click(PixelPoint),
    /// The pointer left the canvas; abandons any drag in progress.
    Leave,
}

/// Anchor of a drag, alive from pointer-down to the matching pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub anchor: PixelPoint,
}

/// Tool selector, as chosen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    ZoomIn,
    ZoomOut,
    ZoomWindow,
    ZoomRect,
}

/// The active viewport tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tool {
    /// Click to zoom in by `factor` around the clicked point.
    ZoomIn { factor: f64 },
    /// Click to zoom out by `factor` around the clicked point.
    ZoomOut { factor: f64 },
    /// Drag a circle from its center; the diameter becomes the new width.
    ZoomWindow { drag: Option<DragState> },
    /// Drag a box; its width becomes the new width.
    ZoomRect { drag: Option<DragState> },
}

/// What a single pointer event produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutcome {
    /// Replacement viewport, when the event completed a zoom.
    pub viewport: Option<Viewport>,
    /// Instructions for the overlay surface, when it needs redrawing.
    pub overlay: Option<Vec<DrawCommand>>,
    /// Plane coordinate under the pointer, reported on every move.
    pub hover: Option<Complex>,
}

impl Tool {
    /// Zoom factor used by the click tools when none is configured.
    pub const DEFAULT_FACTOR: f64 = 2.0;

    pub fn zoom_in(factor: f64) -> crate::Result<Self> {
        Ok(Self::ZoomIn {
            factor: check_factor(factor)?,
        })
    }

    pub fn zoom_out(factor: f64) -> crate::Result<Self> {
        Ok(Self::ZoomOut {
            factor: check_factor(factor)?,
        })
    }

    pub fn zoom_window() -> Self {
        Self::ZoomWindow { drag: None }
    }

    pub fn zoom_rect() -> Self {
        Self::ZoomRect { drag: None }
    }

    /// Build a fresh, idle tool of the given kind.
    ///
    /// `factor` only applies to the click tools.
    pub fn select(kind: ToolKind, factor: f64) -> crate::Result<Self> {
        match kind {
            ToolKind::ZoomIn => Self::zoom_in(factor),
            ToolKind::ZoomOut => Self::zoom_out(factor),
            ToolKind::ZoomWindow => Ok(Self::zoom_window()),
            ToolKind::ZoomRect => Ok(Self::zoom_rect()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::ZoomIn { .. } => ToolKind::ZoomIn,
            Self::ZoomOut { .. } => ToolKind::ZoomOut,
            Self::ZoomWindow { .. } => ToolKind::ZoomWindow,
            Self::ZoomRect { .. } => ToolKind::ZoomRect,
        }
    }

    /// The drag in progress, if any.
    pub fn drag(&self) -> Option<DragState> {
        match self {
            Self::ZoomWindow { drag } | Self::ZoomRect { drag } => *drag,
            Self::ZoomIn { .. } | Self::ZoomOut { .. } => None,
        }
    }

    /// Advance the tool by one pointer event.
    ///
    /// The tool state is updated before any viewport is computed, so a
    /// rejected selection still leaves the tool idle; the caller should then
    /// clear its overlay.
    pub fn handle_pointer_event(
        &mut self,
        viewport: &Viewport,
        event: PointerEvent,
    ) -> crate::Result<ToolOutcome> {
        let mut outcome = ToolOutcome::default();
        if let PointerEvent::Move(p) = event {
            outcome.hover = Some(viewport.screen_to_complex(p.x, p.y));
        }

        match (self, event) {
            (Self::ZoomIn { factor }, PointerEvent::Click(p)) => {
                outcome.viewport = Some(zoom_on_click(viewport, p, *factor)?);
            }
            (Self::ZoomOut { factor }, PointerEvent::Click(p)) => {
                outcome.viewport = Some(zoom_on_click(viewport, p, 1.0 / *factor)?);
            }
            (Self::ZoomIn { .. } | Self::ZoomOut { .. }, _) => {}

            (Self::ZoomWindow { drag } | Self::ZoomRect { drag }, PointerEvent::Down(p)) => {
                *drag = Some(DragState { anchor: p });
            }
            (Self::ZoomWindow { drag: Some(d) }, PointerEvent::Move(p)) => {
                outcome.overlay = Some(reticle(d.anchor, p));
            }
            (Self::ZoomRect { drag: Some(d) }, PointerEvent::Move(p)) => {
                outcome.overlay = Some(selection_rect(d.anchor, p));
            }
            (Self::ZoomWindow { drag }, PointerEvent::Up(p)) => {
                if let Some(d) = drag.take() {
                    outcome.overlay = Some(vec![DrawCommand::Clear]);
                    outcome.viewport = Some(zoom_to_circle(viewport, d.anchor, p)?);
                }
            }
            (Self::ZoomRect { drag }, PointerEvent::Up(p)) => {
                if let Some(d) = drag.take() {
                    outcome.overlay = Some(vec![DrawCommand::Clear]);
                    outcome.viewport = Some(zoom_to_rect(viewport, d.anchor, p)?);
                }
            }
            (Self::ZoomWindow { drag } | Self::ZoomRect { drag }, PointerEvent::Leave) => {
                if drag.take().is_some() {
                    outcome.overlay = Some(vec![DrawCommand::Clear]);
                }
            }
            (Self::ZoomWindow { .. } | Self::ZoomRect { .. }, _) => {}
        }

        if let Some(v) = &outcome.viewport {
            debug!(
                size = v.size(),
                zoom = v.zoom(),
                center = %v.center(),
                "Tool produced viewport"
            );
        }
        Ok(outcome)
    }
}

impl Default for Tool {
    fn default() -> Self {
        Self::ZoomIn {
            factor: Self::DEFAULT_FACTOR,
        }
    }
}

fn check_factor(factor: f64) -> crate::Result<f64> {
    if factor <= 0.0 || !factor.is_finite() {
        return Err(CoreError::InvalidZoomFactor(factor));
    }
    Ok(factor)
}

/// Divide the zoom by `factor` and re-centre on the clicked pixel.
///
/// The click is mapped at the *new* zoom, so the new center is the point
/// that the clicked pixel would show after zooming around the old center.
pub fn zoom_on_click(viewport: &Viewport, at: PixelPoint, factor: f64) -> crate::Result<Viewport> {
    let factor = check_factor(factor)?;
    let zoomed = viewport.with_zoom(viewport.zoom() / factor)?;
    let center = zoomed.screen_to_complex(at.x, at.y);
    zoomed.with_center(center)
}

/// The circle around `anchor` through `release` becomes the new view:
/// its center is the new center and its diameter the new width.
pub fn zoom_to_circle(
    viewport: &Viewport,
    anchor: PixelPoint,
    release: PixelPoint,
) -> crate::Result<Viewport> {
    let radius = anchor.distance(release);
    if radius == 0.0 {
        warn!(x = anchor.x, y = anchor.y, "Ignoring zero-radius zoom window");
        return Err(CoreError::DegenerateSelection {
            reason: "zoom window radius is zero".into(),
        });
    }
    let center = viewport.screen_to_complex(anchor.x, anchor.y);
    let zoom = viewport.zoom() * (2.0 * radius) / viewport.size() as f64;
    Viewport::new(viewport.size(), center, zoom)
}

/// The box spanned by the two corners becomes the new view: its midpoint is
/// the new center and its width the new width.
pub fn zoom_to_rect(
    viewport: &Viewport,
    anchor: PixelPoint,
    release: PixelPoint,
) -> crate::Result<Viewport> {
    let (x1, x2) = (anchor.x.min(release.x), anchor.x.max(release.x));
    let (y1, y2) = (anchor.y.min(release.y), anchor.y.max(release.y));
    if x2 - x1 == 0.0 {
        warn!(x = anchor.x, "Ignoring zero-width zoom rectangle");
        return Err(CoreError::DegenerateSelection {
            reason: "zoom rectangle width is zero".into(),
        });
    }
    let c1 = viewport.screen_to_complex(x1, y1);
    let c2 = viewport.screen_to_complex(x2, y2);
    let center = (c1 + c2) * 0.5;
    let zoom = viewport.zoom() * (x2 - x1) / viewport.size() as f64;
    Viewport::new(viewport.size(), center, zoom)
}
