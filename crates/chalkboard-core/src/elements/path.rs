//! Freehand path element.

use super::{ElementId, ElementTrait, SerializableColor, map_point, point_is_finite};
use crate::selection::HandleKind;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (series of world points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ElementId,
    /// Points in drawing order.
    pub points: Vec<Point>,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
}

impl Freehand {
    /// Start a new stroke at `start`.
    pub fn new(start: Point, stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            stroke_color,
            stroke_width,
        }
    }

    /// Create from existing points with the default style.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
        }
    }

    /// Append a point while the stroke is being drawn.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the segment lengths.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl ElementTrait for Freehand {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_origin_size(*first, (0.0, 0.0)), |acc, p| {
                acc.union_pt(*p)
            })
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for p in points {
                path.line_to(*p);
            }
        }
        path
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn scale_within_bounds(&mut self, _handle: HandleKind, target: Rect) {
        let from = self.bounds();
        for p in &mut self.points {
            *p = map_point(*p, from, target);
        }
    }

    fn is_valid(&self) -> bool {
        !self.points.is_empty()
            && self.points.iter().all(|p| point_is_finite(*p))
            && self.stroke_width.is_finite()
            && self.stroke_width > 0.0
    }
}
