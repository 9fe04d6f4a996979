//! Anchor points and connection curves between node rectangles.
//!
//! Everything here is a pure function of its inputs so it can be tested
//! without a rendering surface.

use crate::{Node, Point, Rectangle};

/// Distance between the geometric edge and the anchor, so paths touch the
/// painted border instead of the outer edge.
pub const BORDER_INSET: f32 = 2.0;

/// Upper bound for the control point offset of a connection curve
pub const MAX_CONTROL_OFFSET: f32 = 120.0;

/// Fraction of the endpoint distance used as control point offset
pub const CONTROL_OFFSET_RATIO: f32 = 0.4;

/// Side of a rectangle an anchor sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Midpoint of this side, pulled inwards by `BORDER_INSET`
    pub fn anchor(&self, rect: &Rectangle) -> Point {
        let center = rect.center();
        match self {
            Side::Left => Point::new(rect.x + BORDER_INSET, center.y),
            Side::Right => Point::new(rect.right() - BORDER_INSET, center.y),
            Side::Top => Point::new(center.x, rect.y + BORDER_INSET),
            Side::Bottom => Point::new(center.x, rect.bottom() - BORDER_INSET),
        }
    }
}

/// Axis with the larger displacement magnitude. Ties go to vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn dominant(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// Center of a node using the shared node size
pub fn center(node: &Node) -> Point {
    node.bounds().center()
}

/// Side of `rect` that faces `toward`
pub fn facing_side(rect: &Rectangle, toward: Point) -> Side {
    let c = rect.center();
    let dx = toward.x - c.x;
    let dy = toward.y - c.y;

    match Axis::dominant(dx, dy) {
        Axis::Horizontal if dx > 0.0 => Side::Right,
        Axis::Horizontal => Side::Left,
        Axis::Vertical if dy > 0.0 => Side::Bottom,
        Axis::Vertical => Side::Top,
    }
}

/// Anchor on the side of `rect` that faces `toward`
pub fn boundary_anchor(rect: &Rectangle, toward: Point) -> Point {
    facing_side(rect, toward).anchor(rect)
}

/// Exit anchor on `source` and entry anchor on `target`.
///
/// Each node picks its side independently from the direction toward the
/// other node's center, so diagonal layouts may look asymmetric.
pub fn connection_anchors(source: &Node, target: &Node) -> (Point, Point) {
    let source_rect = source.bounds();
    let target_rect = target.bounds();
    (
        boundary_anchor(&source_rect, target_rect.center()),
        boundary_anchor(&target_rect, source_rect.center()),
    )
}

/// Cubic bezier through two anchors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// Evaluate the curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.start.x
            + 3.0 * mt2 * t * self.control1.x
            + 3.0 * mt * t2 * self.control2.x
            + t3 * self.end.x;
        let y = mt3 * self.start.y
            + 3.0 * mt2 * t * self.control1.y
            + 3.0 * mt * t2 * self.control2.y
            + t3 * self.end.y;

        Point::new(x, y)
    }

    /// SVG path command, e.g. "M 10 20 C 60 20, 90 80, 140 80"
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// A curve plus whether it follows a live pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePath {
    pub curve: CubicCurve,
    pub dragging: bool,
}

/// Control point offset for two endpoints
pub fn control_offset(start: Point, end: Point) -> f32 {
    (start.distance(end) * CONTROL_OFFSET_RATIO).min(MAX_CONTROL_OFFSET)
}

/// Curve from `start` to `end` with axis-aware control points.
///
/// Control points push outward from `start` and inward to `end` along the
/// dominant axis; the other coordinate is held. A live connection drag
/// passes the pointer as `end` and sets `dragging`.
pub fn curve_path(start: Point, end: Point, dragging: bool) -> CurvePath {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let offset = control_offset(start, end);

    let (control1, control2) = match Axis::dominant(dx, dy) {
        Axis::Horizontal => {
            let o = if dx > 0.0 { offset } else { -offset };
            (
                Point::new(start.x + o, start.y),
                Point::new(end.x - o, end.y),
            )
        }
        Axis::Vertical => {
            let o = if dy > 0.0 { offset } else { -offset };
            (
                Point::new(start.x, start.y + o),
                Point::new(end.x, end.y - o),
            )
        }
    };

    CurvePath {
        curve: CubicCurve {
            start,
            control1,
            control2,
            end,
        },
        dragging,
    }
}

/// Curve between two persisted nodes
pub fn edge_curve(source: &Node, target: &Node) -> CurvePath {
    let (start, end) = connection_anchors(source, target);
    curve_path(start, end, false)
}

/// Curve from a source node toward the live pointer
pub fn drag_curve(source: &Node, pointer: Point) -> CurvePath {
    let start = boundary_anchor(&source.bounds(), pointer);
    curve_path(start, pointer, true)
}
