use serde::{Deserialize, Serialize};

/// A position on the canvas, in (possibly fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeColor {
    Black,
    White,
}

impl StrokeColor {
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Self::Black => [0, 0, 0, 255],
            Self::White => [255, 255, 255, 255],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: StrokeColor,
}

/// Halo stroke drawn under the thin line so the reticle reads on any background.
pub const HALO: Stroke = Stroke {
    width: 3.0,
    color: StrokeColor::White,
};

pub const HAIRLINE: Stroke = Stroke {
    width: 1.0,
    color: StrokeColor::Black,
};

/// Half-length of the thin crosshair arms at the reticle anchor.
pub const CROSSHAIR_ARM: f64 = 10.0;

/// Half-length of the halo crosshair arms.
pub const CROSSHAIR_HALO_ARM: f64 = 12.0;

/// One instruction for the overlay surface, executed in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Erase the whole overlay surface.
    Clear,
    Circle {
        center: PixelPoint,
        radius: f64,
        stroke: Stroke,
    },
    Line {
        from: PixelPoint,
        to: PixelPoint,
        stroke: Stroke,
    },
    /// Axis-aligned rectangle between two opposite corners.
    Rect {
        origin: PixelPoint,
        corner: PixelPoint,
        stroke: Stroke,
    },
}

/// Circular selection reticle: circle through `pointer` around `anchor`,
/// the radius line, and a crosshair on the anchor.
pub fn reticle(anchor: PixelPoint, pointer: PixelPoint) -> Vec<DrawCommand> {
    let radius = anchor.distance(pointer);
    let mut commands = vec![
        DrawCommand::Clear,
        DrawCommand::Circle {
            center: anchor,
            radius,
            stroke: HALO,
        },
        DrawCommand::Circle {
            center: anchor,
            radius,
            stroke: HAIRLINE,
        },
        DrawCommand::Line {
            from: anchor,
            to: pointer,
            stroke: HAIRLINE,
        },
    ];
    commands.extend(crosshair(anchor, CROSSHAIR_HALO_ARM, HALO));
    commands.extend(crosshair(anchor, CROSSHAIR_ARM, HAIRLINE));
    commands
}

/// Rubber-band rectangle between the drag anchor and the pointer.
pub fn selection_rect(anchor: PixelPoint, pointer: PixelPoint) -> Vec<DrawCommand> {
    vec![
        DrawCommand::Clear,
        DrawCommand::Rect {
            origin: anchor,
            corner: pointer,
            stroke: HALO,
        },
        DrawCommand::Rect {
            origin: anchor,
            corner: pointer,
            stroke: HAIRLINE,
        },
    ]
}

fn crosshair(at: PixelPoint, arm: f64, stroke: Stroke) -> [DrawCommand; 2] {
    [
        DrawCommand::Line {
            from: PixelPoint::new(at.x - arm, at.y),
            to: PixelPoint::new(at.x + arm, at.y),
            stroke,
        },
        DrawCommand::Line {
            from: PixelPoint::new(at.x, at.y - arm),
            to: PixelPoint::new(at.x, at.y + arm),
            stroke,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = PixelPoint::new(1.0, 1.0);
        assert_eq!(a.distance(PixelPoint::new(4.0, 5.0)), 5.0);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn reticle_layout() {
        let anchor = PixelPoint::new(300.0, 300.0);
        let pointer = PixelPoint::new(450.0, 300.0);
        let cmds = reticle(anchor, pointer);

        assert_eq!(cmds[0], DrawCommand::Clear);
        let circles: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(circles, vec![(anchor, 150.0), (anchor, 150.0)]);

        // Radius line plus two crosshairs of two arms each.
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 5);
        assert!(cmds.contains(&DrawCommand::Line {
            from: anchor,
            to: pointer,
            stroke: HAIRLINE,
        }));
    }

    #[test]
    fn halo_is_drawn_before_hairline() {
        let cmds = selection_rect(PixelPoint::new(0.0, 0.0), PixelPoint::new(5.0, 5.0));
        let widths: Vec<f64> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { stroke, .. } => Some(stroke.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![3.0, 1.0]);
    }
}
