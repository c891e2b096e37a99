//! Display list produced by a render pass.

use chalkboard_core::ElementId;
use kurbo::{Affine, BezPath, Point, Stroke};
use peniko::Color;

/// Which part of the frame a command belongs to.
///
/// Layers are listed in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Grid,
    /// World origin axes.
    Axis,
    /// A committed element.
    Element(ElementId),
    /// The element being drawn.
    Preview,
    /// Dashed bounds and resize handles.
    Selection,
    /// Rubber band while box-selecting.
    Marquee,
}

impl Layer {
    /// Paint rank; commands in a well-formed scene never decrease in rank.
    pub fn rank(self) -> u8 {
        match self {
            Layer::Background => 0,
            Layer::Grid => 1,
            Layer::Axis => 2,
            Layer::Element(_) => 3,
            Layer::Preview => 4,
            Layer::Selection => 5,
            Layer::Marquee => 6,
        }
    }
}

/// A single drawing instruction. Geometry is in world coordinates and
/// `transform` maps it to the surface.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Fill {
        layer: Layer,
        transform: Affine,
        color: Color,
        path: BezPath,
    },
    Stroke {
        layer: Layer,
        transform: Affine,
        style: Stroke,
        color: Color,
        path: BezPath,
    },
    /// One laid-out line of text; `origin` is the top-left of the line box.
    Text {
        layer: Layer,
        transform: Affine,
        origin: Point,
        font_size: f64,
        color: Color,
        content: String,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCommand::Clear(_) => Layer::Background,
            DrawCommand::Fill { layer, .. }
            | DrawCommand::Stroke { layer, .. }
            | DrawCommand::Text { layer, .. } => *layer,
        }
    }
}

/// Counts per command kind, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub fills: usize,
    pub strokes: usize,
    pub texts: usize,
}

/// An ordered list of draw commands.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn fill(&mut self, layer: Layer, transform: Affine, color: Color, path: BezPath) {
        self.commands.push(DrawCommand::Fill {
            layer,
            transform,
            color,
            path,
        });
    }

    pub fn stroke(
        &mut self,
        layer: Layer,
        transform: Affine,
        style: &Stroke,
        color: Color,
        path: BezPath,
    ) {
        self.commands.push(DrawCommand::Stroke {
            layer,
            transform,
            style: style.clone(),
            color,
            path,
        });
    }

    pub fn text(
        &mut self,
        layer: Layer,
        transform: Affine,
        origin: Point,
        font_size: f64,
        color: Color,
        content: &str,
    ) {
        self.commands.push(DrawCommand::Text {
            layer,
            transform,
            origin,
            font_size,
            color,
            content: content.to_string(),
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands belonging to the given layer.
    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer() == layer)
    }

    pub fn summary(&self) -> SceneSummary {
        self.commands
            .iter()
            .fold(SceneSummary::default(), |mut summary, command| {
                match command {
                    DrawCommand::Clear(_) => {}
                    DrawCommand::Fill { .. } => summary.fills += 1,
                    DrawCommand::Stroke { .. } => summary.strokes += 1,
                    DrawCommand::Text { .. } => summary.texts += 1,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};

    #[test]
    fn test_scene_records_in_order() {
        let mut scene = Scene::new();
        let path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1);
        scene.clear(Color::WHITE);
        scene.stroke(
            Layer::Grid,
            Affine::IDENTITY,
            &Stroke::new(1.0),
            Color::BLACK,
            path.clone(),
        );
        scene.fill(Layer::Marquee, Affine::IDENTITY, Color::BLACK, path);
        scene.text(
            Layer::Preview,
            Affine::IDENTITY,
            Point::ZERO,
            20.0,
            Color::BLACK,
            "hi",
        );

        let layers: Vec<Layer> = scene.commands().iter().map(DrawCommand::layer).collect();
        assert_eq!(
            layers,
            vec![Layer::Background, Layer::Grid, Layer::Marquee, Layer::Preview]
        );
        assert_eq!(
            scene.summary(),
            SceneSummary {
                fills: 1,
                strokes: 1,
                texts: 1
            }
        );
        assert_eq!(scene.in_layer(Layer::Grid).count(), 1);

        scene.reset();
        assert!(scene.is_empty());
    }
}
