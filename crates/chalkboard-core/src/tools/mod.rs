//! Tool system for the whiteboard.

use crate::elements::{
    DEFAULT_FONT_SIZE, Freehand, Primitive, PrimitiveKind, SerializableColor, Text,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Pen,
    Rectangle,
    Ellipse,
    Triangle,
    Line,
    Arrow,
    Text,
}

impl ToolKind {
    /// The primitive a shape tool draws.
    pub fn primitive_kind(self) -> Option<PrimitiveKind> {
        match self {
            ToolKind::Rectangle => Some(PrimitiveKind::Rectangle),
            ToolKind::Ellipse => Some(PrimitiveKind::Ellipse),
            ToolKind::Triangle => Some(PrimitiveKind::Triangle),
            ToolKind::Line => Some(PrimitiveKind::Line),
            ToolKind::Arrow => Some(PrimitiveKind::Arrow),
            ToolKind::Select | ToolKind::Pan | ToolKind::Pen | ToolKind::Text => None,
        }
    }
}

/// Toolbar values applied to new elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Fill box shapes (rectangle, ellipse, triangle).
    pub filled: bool,
    pub font_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            filled: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl ToolSettings {
    /// Start a freehand stroke at `start`.
    pub fn new_path(&self, start: Point) -> Freehand {
        Freehand::new(start, self.stroke_color, self.stroke_width)
    }

    /// Start a shape of `kind` with both corners at `start`.
    pub fn new_shape(&self, kind: PrimitiveKind, start: Point) -> Primitive {
        Primitive::new(kind, start, start)
            .with_stroke(self.stroke_color, self.stroke_width)
            .with_fill(self.filled)
    }

    /// Create an empty text block anchored at `position`.
    pub fn new_text(&self, position: Point) -> Text {
        Text::new(position, String::new())
            .with_font_size(self.font_size)
            .with_color(self.stroke_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementTrait;

    #[test]
    fn test_shape_tools_map_to_kinds() {
        assert_eq!(ToolKind::Triangle.primitive_kind(), Some(PrimitiveKind::Triangle));
        assert_eq!(ToolKind::Pen.primitive_kind(), None);
        assert_eq!(ToolKind::Text.primitive_kind(), None);
    }

    #[test]
    fn test_new_elements_use_settings() {
        let settings = ToolSettings {
            stroke_color: SerializableColor::new(255, 0, 0, 255),
            stroke_width: 5.0,
            filled: true,
            font_size: 32.0,
            ..ToolSettings::default()
        };
        let shape = settings.new_shape(PrimitiveKind::Rectangle, Point::new(1.0, 2.0));
        assert_eq!(shape.start, shape.end);
        assert!(shape.filled);
        assert!((shape.stroke_width - 5.0).abs() < f64::EPSILON);

        let path = settings.new_path(Point::new(1.0, 2.0));
        assert_eq!(path.points.len(), 1);
        assert_eq!(path.stroke_color, settings.stroke_color);

        let text = settings.new_text(Point::ZERO);
        assert!((text.font_size - 32.0).abs() < f64::EPSILON);
        assert!(!text.is_valid());
    }
}
