//! Element definitions for the whiteboard.

mod path;
mod shape;
mod text;

pub use path::Freehand;
pub use shape::{ARROW_BARB_LENGTH, Primitive, PrimitiveKind};
pub use text::{
    CHAR_WIDTH_FACTOR, DEFAULT_FONT_SIZE, LINE_HEIGHT_FACTOR, MAX_FONT_SIZE, MIN_FONT_SIZE, Text,
};

use crate::selection::HandleKind;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn with_alpha_factor(self, factor: f64) -> Self {
        let a = (f64::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Geometry shared by every element variant.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Axis-aligned bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Move the element by `delta` world units.
    fn translate(&mut self, delta: Vec2);

    /// Map the element from its current bounds into `target`.
    ///
    /// `target` may be inverted (x1 < x0), which mirrors the element.
    fn scale_within_bounds(&mut self, handle: HandleKind, target: Rect);

    /// Whether the element may be committed or loaded.
    fn is_valid(&self) -> bool;
}

/// A drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Path(Freehand),
    Shape(Primitive),
    Text(Text),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Path(e) => e.id(),
            Element::Shape(e) => e.id(),
            Element::Text(e) => e.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Path(e) => e.bounds(),
            Element::Shape(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Path(e) => e.to_path(),
            Element::Shape(e) => e.to_path(),
            Element::Text(e) => e.to_path(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Element::Path(e) => e.is_valid(),
            Element::Shape(e) => e.is_valid(),
            Element::Text(e) => e.is_valid(),
        }
    }

    /// Copy of this element moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Element {
        let mut moved = self.clone();
        match &mut moved {
            Element::Path(e) => e.translate(delta),
            Element::Shape(e) => e.translate(delta),
            Element::Text(e) => e.translate(delta),
        }
        moved
    }

    /// Copy of this element mapped into `target` by dragging `handle`.
    pub fn scaled_within_bounds(&self, handle: HandleKind, target: Rect) -> Element {
        let mut scaled = self.clone();
        match &mut scaled {
            Element::Path(e) => e.scale_within_bounds(handle, target),
            Element::Shape(e) => e.scale_within_bounds(handle, target),
            Element::Text(e) => e.scale_within_bounds(handle, target),
        }
        scaled
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Element::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Freehand> for Element {
    fn from(path: Freehand) -> Self {
        Element::Path(path)
    }
}

impl From<Primitive> for Element {
    fn from(shape: Primitive) -> Self {
        Element::Shape(shape)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}

/// Map `point` from the `from` box into the `to` box.
///
/// An axis with no extent in `from` is left untouched.
pub(crate) fn map_point(point: Point, from: Rect, to: Rect) -> Point {
    Point::new(
        map_axis(point.x, from.x0, from.x1, to.x0, to.x1),
        map_axis(point.y, from.y0, from.y1, to.y0, to.y1),
    )
}

fn map_axis(value: f64, from0: f64, from1: f64, to0: f64, to1: f64) -> f64 {
    let extent = from1 - from0;
    if extent.abs() < f64::EPSILON {
        return value;
    }
    to0 + (value - from0) * (to1 - to0) / extent
}

pub(crate) fn point_is_finite(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tagged_serialization() {
        let rect = Primitive::new(
            PrimitiveKind::Rectangle,
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
        );
        let element = Element::from(rect);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "shape");
        assert_eq!(json["kind"], "rectangle");

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_translated_is_pure() {
        let element = Element::from(Freehand::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        ]));
        let moved = element.translated(Vec2::new(5.0, -5.0));
        assert_eq!(element.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(moved.bounds(), Rect::new(5.0, -5.0, 15.0, 5.0));
        assert_eq!(moved.id(), element.id());
    }

    #[test]
    fn test_map_point_inverted_target() {
        let from = Rect::new(0.0, 0.0, 10.0, 10.0);
        let to = Rect::new(10.0, 0.0, 0.0, 20.0);
        assert_eq!(map_point(Point::new(0.0, 0.0), from, to), Point::new(10.0, 0.0));
        assert_eq!(map_point(Point::new(10.0, 10.0), from, to), Point::new(0.0, 20.0));
    }

    #[test]
    fn test_map_point_degenerate_axis() {
        let from = Rect::new(0.0, 5.0, 10.0, 5.0);
        let to = Rect::new(0.0, 0.0, 20.0, 30.0);
        assert_eq!(map_point(Point::new(10.0, 5.0), from, to), Point::new(20.0, 5.0));
    }

    #[test]
    fn test_alpha_factor() {
        let c = SerializableColor::black().with_alpha_factor(0.3);
        assert_eq!(c.a, 77);
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
    }
}
