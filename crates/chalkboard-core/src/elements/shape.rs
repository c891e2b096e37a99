//! Primitive shapes defined by two corner points.

use super::{ElementId, ElementTrait, SerializableColor, map_point, point_is_finite};
use crate::selection::HandleKind;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;
use uuid::Uuid;

/// Length of each arrowhead barb in world units.
pub const ARROW_BARB_LENGTH: f64 = 15.0;

/// Curve flattening tolerance for the ellipse outline.
const CURVE_TOLERANCE: f64 = 0.1;

/// Kind of primitive shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Rectangle,
    Ellipse,
    Triangle,
    Line,
    Arrow,
}

impl PrimitiveKind {
    /// Kinds whose geometry is a closed area.
    pub fn is_box(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Rectangle | PrimitiveKind::Ellipse | PrimitiveKind::Triangle
        )
    }
}

/// A primitive shape spanned by `start` and `end`.
///
/// The two points are kept as drawn (not normalized), so mirroring a shape
/// through a resize keeps its orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub(crate) id: ElementId,
    pub kind: PrimitiveKind,
    pub start: Point,
    pub end: Point,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Only honored by box kinds.
    #[serde(default)]
    pub filled: bool,
}

impl Primitive {
    /// Create a new shape with the default style.
    pub fn new(kind: PrimitiveKind, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            filled: false,
        }
    }

    /// Set the stroke style.
    pub fn with_stroke(mut self, color: SerializableColor, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    /// Set the fill flag.
    pub fn with_fill(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Distance between the two defining points.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Whether a fill should be painted under the stroke.
    pub fn has_fill(&self) -> bool {
        self.filled && self.kind.is_box()
    }

    /// Ellipse circle: centered on the box midpoint, radius half the box diagonal.
    pub fn ellipse_circle(&self) -> Circle {
        Circle::new(self.start.midpoint(self.end), self.length() / 2.0)
    }

    /// Vertices of the triangle: apex on the `start.y` edge, base on the `end.y` edge.
    pub fn triangle_points(&self) -> [Point; 3] {
        let mid_x = (self.start.x + self.end.x) / 2.0;
        [
            Point::new(mid_x, self.start.y),
            Point::new(self.end.x, self.end.y),
            Point::new(self.start.x, self.end.y),
        ]
    }

    /// Outer ends of the two arrowhead barbs.
    pub fn arrow_barbs(&self) -> [Point; 2] {
        let angle = (self.end.y - self.start.y).atan2(self.end.x - self.start.x);
        let barb = |offset: f64| {
            let a = angle + offset;
            Point::new(
                self.end.x - ARROW_BARB_LENGTH * a.cos(),
                self.end.y - ARROW_BARB_LENGTH * a.sin(),
            )
        };
        [barb(FRAC_PI_6), barb(-FRAC_PI_6)]
    }

    /// Closed outline used for the fill, if this shape has one.
    pub fn fill_path(&self) -> Option<BezPath> {
        self.has_fill().then(|| self.to_path())
    }
}

impl ElementTrait for Primitive {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        match self.kind {
            PrimitiveKind::Rectangle => self.bounds().to_path(CURVE_TOLERANCE),
            PrimitiveKind::Ellipse => self.ellipse_circle().to_path(CURVE_TOLERANCE),
            PrimitiveKind::Triangle => {
                let [apex, right, left] = self.triangle_points();
                let mut path = BezPath::new();
                path.move_to(apex);
                path.line_to(right);
                path.line_to(left);
                path.close_path();
                path
            }
            PrimitiveKind::Line => {
                let mut path = BezPath::new();
                path.move_to(self.start);
                path.line_to(self.end);
                path
            }
            PrimitiveKind::Arrow => {
                let [left, right] = self.arrow_barbs();
                let mut path = BezPath::new();
                path.move_to(self.start);
                path.line_to(self.end);
                path.move_to(left);
                path.line_to(self.end);
                path.line_to(right);
                path
            }
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn scale_within_bounds(&mut self, _handle: HandleKind, target: Rect) {
        let from = self.bounds();
        self.start = map_point(self.start, from, target);
        self.end = map_point(self.end, from, target);
    }

    fn is_valid(&self) -> bool {
        point_is_finite(self.start)
            && point_is_finite(self.end)
            && self.stroke_width.is_finite()
            && self.stroke_width > 0.0
    }
}
