//! Text element.

use super::{ElementId, ElementTrait, SerializableColor, point_is_finite};
use crate::selection::HandleKind;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const MIN_FONT_SIZE: f64 = 4.0;
pub const MAX_FONT_SIZE: f64 = 400.0;

/// Estimated glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A block of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ElementId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Content, possibly spanning several lines.
    pub content: String,
    pub font_size: f64,
    pub color: SerializableColor,
}

impl Text {
    /// Create a new text element with the default style.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: DEFAULT_FONT_SIZE,
            color: SerializableColor::black(),
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    /// Lines of the content; an empty block still has one line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Line height in world units.
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    /// Append a character at the end of the content.
    pub fn insert_char(&mut self, c: char) {
        self.content.push(c);
    }

    /// Remove the last character. Returns false if there was nothing to remove.
    pub fn backspace(&mut self) -> bool {
        self.content.pop().is_some()
    }

    /// Content with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }
}

impl ElementTrait for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (line_count, widest) = self
            .lines()
            .fold((0usize, 0usize), |(count, widest), line| {
                (count + 1, widest.max(line.chars().count()))
            });
        let width = widest.max(1) as f64 * self.font_size * CHAR_WIDTH_FACTOR;
        let height = line_count.max(1) as f64 * self.line_height();
        Rect::from_origin_size(self.position, (width, height))
    }

    fn to_path(&self) -> BezPath {
        // Glyphs are laid out by the render backend; the layout box stands in.
        self.bounds().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Text keeps its aspect ratio, so one axis of `target` picks the font
    /// size and the box grows away from the edges the handle leaves in place.
    fn scale_within_bounds(&mut self, handle: HandleKind, target: Rect) {
        let from = self.bounds();
        let factor = match handle {
            HandleKind::Left | HandleKind::Right => target.width() / from.width(),
            _ => target.height() / from.height(),
        }
        .abs();
        let font_size = (self.font_size * factor).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let scale = font_size / self.font_size;
        if !factor.is_finite() || !scale.is_finite() {
            return;
        }
        let (width, height) = (from.width() * scale, from.height() * scale);

        let x = if handle.moves_left() {
            anchored_start(from.x1, target.x0, width)
        } else if handle.moves_right() {
            anchored_start(from.x0, target.x1, width)
        } else {
            from.x0
        };
        let y = if handle.moves_top() {
            anchored_start(from.y1, target.y0, height)
        } else if handle.moves_bottom() {
            anchored_start(from.y0, target.y1, height)
        } else {
            from.y0
        };

        self.font_size = font_size;
        self.position = Point::new(x, y);
    }

    fn is_valid(&self) -> bool {
        !self.trimmed().is_empty()
            && point_is_finite(self.position)
            && self.font_size.is_finite()
            && self.font_size > 0.0
    }
}

/// Leading coordinate of an extent of `size` that keeps `fixed` in place and
/// opens toward `moved`.
fn anchored_start(fixed: f64, moved: f64, size: f64) -> f64 {
    if moved < fixed { fixed - size } else { fixed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_estimate() {
        let text = Text::new(Point::new(10.0, 20.0), "abcd\nab".to_string());
        let b = text.bounds();
        assert_eq!(b.origin(), Point::new(10.0, 20.0));
        assert!((b.width() - 4.0 * 20.0 * CHAR_WIDTH_FACTOR).abs() < 1e-9);
        assert!((b.height() - 2.0 * 20.0 * LINE_HEIGHT_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_caret_sized_bounds() {
        let text = Text::new(Point::ZERO, String::new());
        assert!(text.bounds().width() > 0.0);
        assert!(text.bounds().height() > 0.0);
        assert!(!text.is_valid());
    }

    #[test]
    fn test_whitespace_only_is_invalid() {
        assert!(!Text::new(Point::ZERO, "  \n\t".to_string()).is_valid());
        assert!(Text::new(Point::ZERO, " x ".to_string()).is_valid());
    }

    #[test]
    fn test_editing() {
        let mut text = Text::new(Point::ZERO, String::new());
        assert!(!text.backspace());
        text.insert_char('h');
        text.insert_char('i');
        text.insert_char('\n');
        assert_eq!(text.lines().count(), 2);
        assert!(text.backspace());
        assert_eq!(text.content, "hi");
    }

    #[test]
    fn test_scale_moves_anchor_and_font() {
        let mut text = Text::new(Point::ZERO, "ab".to_string());
        let from = text.bounds();
        let target = Rect::new(0.0, 0.0, from.width() * 2.0, from.height() * 2.0);
        text.scale_within_bounds(HandleKind::BottomRight, target);
        assert_eq!(text.position, Point::ZERO);
        assert!((text.font_size - 40.0).abs() < 1e-9);
        assert!((text.bounds().width() - target.width()).abs() < 1e-9);
    }

    #[test]
    fn test_scale_through_inverted_target() {
        let mut text = Text::new(Point::new(100.0, 100.0), "ab".to_string());
        let from = text.bounds();
        let target = Rect::new(from.x0, from.y0, from.x0 - from.width(), from.y1);
        text.scale_within_bounds(HandleKind::Right, target);
        assert_eq!(text.position, Point::new(100.0 - from.width(), 100.0));
        assert!((text.font_size - DEFAULT_FONT_SIZE).abs() < 1e-9);
    }

    #[test]
    fn test_corner_scale_keeps_opposite_corner() {
        let mut text = Text::new(Point::ZERO, "ab".to_string());
        let from = text.bounds();
        assert_eq!(from, Rect::new(0.0, 0.0, 24.0, 24.0));

        // Wider than tall: the height decides, the bottom-right stays put.
        text.scale_within_bounds(HandleKind::TopLeft, Rect::new(-24.0, -6.0, 24.0, 24.0));
        let b = text.bounds();
        assert!((b.x1 - 24.0).abs() < 1e-9);
        assert!((b.y1 - 24.0).abs() < 1e-9);
        assert!((b.x0 + 6.0).abs() < 1e-9);
        assert!((text.font_size - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_corner_scale_through_fixed_corner() {
        let mut text = Text::new(Point::ZERO, "ab".to_string());
        // Top-left dragged past the bottom-right: the box opens beyond it.
        text.scale_within_bounds(HandleKind::TopLeft, Rect::new(48.0, 48.0, 24.0, 24.0));
        let b = text.bounds();
        assert!((b.x0 - 24.0).abs() < 1e-9);
        assert!((b.y0 - 24.0).abs() < 1e-9);
        assert!((b.width() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_scale_keeps_fixed_edge() {
        let mut text = Text::new(Point::new(10.0, 10.0), "ab".to_string());
        let from = text.bounds();
        let target = Rect::new(from.x1 - 48.0, from.y0, from.x1, from.y1);
        text.scale_within_bounds(HandleKind::Left, target);
        let b = text.bounds();
        assert!((b.x1 - from.x1).abs() < 1e-9);
        assert!((b.x0 - target.x0).abs() < 1e-9);
        assert!((b.y0 - from.y0).abs() < 1e-9);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let mut text = Text::new(Point::ZERO, "ab".to_string());
        text.scale_within_bounds(HandleKind::Bottom, Rect::new(0.0, 0.0, 24.0, 0.001));
        assert!((text.font_size - MIN_FONT_SIZE).abs() < 1e-9);
    }
}
