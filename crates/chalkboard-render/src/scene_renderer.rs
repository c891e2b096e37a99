//! Display-list renderer.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{Layer, Scene};
use chalkboard_core::elements::{CHAR_WIDTH_FACTOR, Freehand, Primitive, Text};
use chalkboard_core::selection::get_handles;
use chalkboard_core::{Element, ElementTrait};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Point, Rect, Shape, Stroke, Vec2};
use peniko::Color;

/// Opacity of shape fills relative to their stroke color.
const FILL_ALPHA: f64 = 0.3;

/// Upper bound on grid lines per axis; a denser grid is skipped.
const MAX_GRID_LINES: f64 = 2000.0;

/// Renderer that records a [`Scene`] instead of talking to a GPU.
#[derive(Default)]
pub struct SceneRenderer {
    scene: Scene,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene built by the last [`Renderer::build_scene`] call.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the last scene, leaving an empty one.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_grid(&mut self, ctx: &RenderContext, transform: Affine, visible: Rect, zoom: f64) {
        let grid_size = ctx.canvas.config.grid_size;
        if ctx.grid_style == GridStyle::None || !(grid_size.is_finite() && grid_size > 0.0) {
            return;
        }
        let (start_x, start_y, end_x, end_y) = grid_bounds(visible, grid_size);
        if (end_x - start_x) / grid_size > MAX_GRID_LINES
            || (end_y - start_y) / grid_size > MAX_GRID_LINES
        {
            return;
        }

        let stroke = Stroke::new(0.5 / zoom);

        // Vertical lines
        let mut x = start_x;
        while x <= end_x {
            let path = segment(Point::new(x, start_y), Point::new(x, end_y));
            self.scene
                .stroke(Layer::Grid, transform, &stroke, ctx.grid_color, path);
            x += grid_size;
        }

        // Horizontal lines
        let mut y = start_y;
        while y <= end_y {
            let path = segment(Point::new(start_x, y), Point::new(end_x, y));
            self.scene
                .stroke(Layer::Grid, transform, &stroke, ctx.grid_color, path);
            y += grid_size;
        }
    }

    fn render_axes(&mut self, ctx: &RenderContext, transform: Affine, visible: Rect, zoom: f64) {
        let stroke = Stroke::new(1.5 / zoom);
        if visible.x0 <= 0.0 && 0.0 <= visible.x1 {
            let path = segment(Point::new(0.0, visible.y0), Point::new(0.0, visible.y1));
            self.scene
                .stroke(Layer::Axis, transform, &stroke, ctx.axis_color, path);
        }
        if visible.y0 <= 0.0 && 0.0 <= visible.y1 {
            let path = segment(Point::new(visible.x0, 0.0), Point::new(visible.x1, 0.0));
            self.scene
                .stroke(Layer::Axis, transform, &stroke, ctx.axis_color, path);
        }
    }

    fn render_element(&mut self, element: &Element, layer: Layer, transform: Affine) {
        match element {
            Element::Path(path) => self.render_freehand(path, layer, transform),
            Element::Shape(shape) => self.render_primitive(shape, layer, transform),
            Element::Text(text) => self.render_text(text, layer, transform),
        }
    }

    fn render_freehand(&mut self, path: &Freehand, layer: Layer, transform: Affine) {
        let color = Color::from(path.stroke_color);
        match path.points.as_slice() {
            [] => {}
            // A single click leaves a dot.
            [point] => {
                let dot = Circle::new(*point, path.stroke_width / 2.0).to_path(0.1);
                self.scene.fill(layer, transform, color, dot);
            }
            _ => {
                let stroke = Stroke::new(path.stroke_width)
                    .with_caps(Cap::Round)
                    .with_join(Join::Round);
                self.scene
                    .stroke(layer, transform, &stroke, color, path.to_path());
            }
        }
    }

    fn render_primitive(&mut self, shape: &Primitive, layer: Layer, transform: Affine) {
        if let Some(fill) = shape.fill_path() {
            let color = Color::from(shape.stroke_color.with_alpha_factor(FILL_ALPHA));
            self.scene.fill(layer, transform, color, fill);
        }
        let stroke = Stroke::new(shape.stroke_width).with_join(Join::Round);
        self.scene.stroke(
            layer,
            transform,
            &stroke,
            Color::from(shape.stroke_color),
            shape.to_path(),
        );
    }

    fn render_text(&mut self, text: &Text, layer: Layer, transform: Affine) {
        let color = Color::from(text.color);
        let line_height = text.line_height();
        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let origin = text.position + Vec2::new(0.0, index as f64 * line_height);
            self.scene
                .text(layer, transform, origin, text.font_size, color, line);
        }
    }

    /// Insertion bar after the last character of the text being edited.
    fn render_caret(&mut self, text: &Text, transform: Affine, zoom: f64) {
        let line_height = text.line_height();
        let (line_count, last_len) = text
            .lines()
            .fold((0usize, 0usize), |(count, _), line| {
                (count + 1, line.chars().count())
            });
        let x = text.position.x + last_len as f64 * text.font_size * CHAR_WIDTH_FACTOR;
        let top = text.position.y + line_count.saturating_sub(1) as f64 * line_height;
        let stroke = Stroke::new(1.5 / zoom);
        self.scene.stroke(
            Layer::Element(text.id()),
            transform,
            &stroke,
            Color::from(text.color),
            segment(Point::new(x, top), Point::new(x, top + line_height)),
        );
    }

    fn render_selection(&mut self, ctx: &RenderContext, transform: Affine, zoom: f64) {
        let canvas = ctx.canvas;
        let dashed = Stroke::new(1.0 / zoom).with_dashes(0.0, [4.0 / zoom, 4.0 / zoom]);
        let handle_stroke = Stroke::new(1.5 / zoom);
        let half = canvas.config.handle_size / 2.0 / zoom;

        for id in canvas.selection.ids() {
            let Some(element) = canvas.document.get(*id) else {
                continue;
            };
            let bounds = element.bounds();
            self.scene.stroke(
                Layer::Selection,
                transform,
                &dashed,
                ctx.selection_color,
                bounds.to_path(0.1),
            );

            for handle in get_handles(bounds) {
                let square = Rect::from_center_size(handle.position, (half * 2.0, half * 2.0))
                    .to_path(0.1);
                self.scene
                    .fill(Layer::Selection, transform, Color::WHITE, square.clone());
                self.scene.stroke(
                    Layer::Selection,
                    transform,
                    &handle_stroke,
                    ctx.selection_color,
                    square,
                );
            }
        }
    }

    fn render_marquee(&mut self, ctx: &RenderContext, rect: Rect, transform: Affine, zoom: f64) {
        let tint = ctx.selection_color.to_rgba8();
        let path = rect.to_path(0.1);
        self.scene.fill(
            Layer::Marquee,
            transform,
            Color::from_rgba8(tint.r, tint.g, tint.b, 25),
            path.clone(),
        );
        let dashed = Stroke::new(1.0 / zoom).with_dashes(0.0, [4.0 / zoom, 4.0 / zoom]);
        self.scene
            .stroke(Layer::Marquee, transform, &dashed, ctx.selection_color, path);
    }
}

impl Renderer for SceneRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.scene.reset();
        if !ctx.has_drawable_surface() {
            return Err(RendererError::Surface(format!(
                "cannot draw into a {}x{} surface",
                ctx.viewport_size.width, ctx.viewport_size.height
            )));
        }

        let canvas = ctx.canvas;
        let viewport = canvas.viewport;
        let transform = viewport.transform(ctx.viewport_size);
        let zoom = viewport.scale;
        let visible = viewport.visible_world_rect(ctx.viewport_size);

        self.scene.clear(self.background_color(ctx));
        self.render_grid(ctx, transform, visible, zoom);
        self.render_axes(ctx, transform, visible, zoom);

        let interaction = canvas.interaction();
        let editing = interaction.editing_text();
        for element in canvas.document.elements() {
            self.render_element(element, Layer::Element(element.id()), transform);
            if editing == Some(element.id()) {
                if let Some(text) = element.as_text() {
                    self.render_caret(text, transform, zoom);
                }
            }
        }

        if let Some(preview) = interaction.preview() {
            self.render_element(&preview, Layer::Preview, transform);
        }

        self.render_selection(ctx, transform, zoom);

        if let Some(rect) = interaction.marquee() {
            self.render_marquee(ctx, rect, transform, zoom);
        }
        Ok(())
    }
}

/// Render one frame of the canvas into a fresh scene.
pub fn render(ctx: &RenderContext) -> RenderResult<Scene> {
    let mut renderer = SceneRenderer::new();
    renderer.build_scene(ctx)?;
    Ok(renderer.take_scene())
}

/// Grid-aligned bounds covering the visible world rectangle.
fn grid_bounds(visible: Rect, grid_size: f64) -> (f64, f64, f64, f64) {
    (
        (visible.x0 / grid_size).floor() * grid_size,
        (visible.y0 / grid_size).floor() * grid_size,
        (visible.x1 / grid_size).ceil() * grid_size,
        (visible.y1 / grid_size).ceil() * grid_size,
    )
}

fn segment(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawCommand;
    use chalkboard_core::elements::PrimitiveKind;
    use chalkboard_core::{Canvas, Key, KeyEvent, Modifiers, MouseButton, ToolKind};

    fn canvas_with_rect() -> (Canvas, chalkboard_core::ElementId) {
        let mut canvas = Canvas::default();
        let rect = Primitive::new(
            PrimitiveKind::Rectangle,
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
        )
        .with_fill(true);
        let id = rect.id();
        canvas.document.add_element(Element::from(rect));
        (canvas, id)
    }

    fn ranks(scene: &Scene) -> Vec<u8> {
        scene.commands().iter().map(|c| c.layer().rank()).collect()
    }

    fn is_sorted(ranks: &[u8]) -> bool {
        ranks.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_empty_canvas_draws_background_grid_and_axes() {
        let canvas = Canvas::default();
        let scene = render(&RenderContext::new(&canvas)).unwrap();

        assert!(matches!(scene.commands()[0], DrawCommand::Clear(_)));
        assert!(scene.in_layer(Layer::Grid).count() > 0);
        assert_eq!(scene.in_layer(Layer::Axis).count(), 2);
        assert!(is_sorted(&ranks(&scene)));
    }

    #[test]
    fn test_grid_is_clipped_to_visible_rect() {
        let canvas = Canvas::default();
        let ctx = RenderContext::new(&canvas);
        let visible = canvas.viewport.visible_world_rect(ctx.viewport_size);
        let grid_size = canvas.config.grid_size;
        let scene = render(&ctx).unwrap();

        let allowed = visible.inflate(grid_size, grid_size);
        for command in scene.in_layer(Layer::Grid) {
            let DrawCommand::Stroke { path, .. } = command else {
                panic!("grid should only stroke");
            };
            let bbox = path.bounding_box();
            assert!(allowed.contains(bbox.origin()));
            assert!(allowed.contains(Point::new(bbox.x1, bbox.y1)));
        }
        // 800x600 at scale 1 spans 16 columns and 12 rows of 50 units, plus the closing lines
        assert_eq!(scene.in_layer(Layer::Grid).count(), 17 + 13);
    }

    #[test]
    fn test_axes_hidden_when_origin_out_of_view() {
        let mut canvas = Canvas::default();
        canvas.viewport.x = 5000.0;
        let scene = render(&RenderContext::new(&canvas).with_grid(GridStyle::None)).unwrap();

        assert_eq!(scene.in_layer(Layer::Grid).count(), 0);
        // Only the horizontal axis (y = 0) is still on screen.
        assert_eq!(scene.in_layer(Layer::Axis).count(), 1);
    }

    #[test]
    fn test_filled_shape_draws_translucent_fill_under_stroke() {
        let (canvas, id) = canvas_with_rect();
        let scene = render(&RenderContext::new(&canvas)).unwrap();

        let commands: Vec<&DrawCommand> = scene.in_layer(Layer::Element(id)).collect();
        assert_eq!(commands.len(), 2);
        let DrawCommand::Fill { color, .. } = commands[0] else {
            panic!("fill should come first");
        };
        let alpha = color.to_rgba8().a;
        assert!(alpha > 0 && alpha < 255);
        let DrawCommand::Stroke { color, .. } = commands[1] else {
            panic!("stroke should come second");
        };
        assert_eq!(color.to_rgba8().a, 255);
    }

    #[test]
    fn test_line_never_fills() {
        let mut canvas = Canvas::default();
        let line = Primitive::new(PrimitiveKind::Arrow, Point::ZERO, Point::new(60.0, 0.0))
            .with_fill(true);
        let id = line.id();
        canvas.document.add_element(Element::from(line));
        let scene = render(&RenderContext::new(&canvas)).unwrap();

        let commands: Vec<&DrawCommand> = scene.in_layer(Layer::Element(id)).collect();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], DrawCommand::Stroke { .. }));
    }

    #[test]
    fn test_elements_follow_insertion_order() {
        let (mut canvas, first) = canvas_with_rect();
        let text = Text::new(Point::new(10.0, 10.0), "one\n\nthree".to_string());
        let second = text.id();
        canvas.document.add_element(Element::from(text));
        let dot = Freehand::from_points(vec![Point::new(-30.0, -30.0)]);
        let third = dot.id();
        canvas.document.add_element(Element::from(dot));

        let scene = render(&RenderContext::new(&canvas)).unwrap();
        let order: Vec<Layer> = scene
            .commands()
            .iter()
            .map(DrawCommand::layer)
            .filter(|l| matches!(l, Layer::Element(_)))
            .collect();
        assert_eq!(
            order,
            vec![
                Layer::Element(first),
                Layer::Element(first),
                Layer::Element(second),
                Layer::Element(second),
                Layer::Element(third),
            ]
        );

        let texts: Vec<(Point, String)> = scene
            .in_layer(Layer::Element(second))
            .filter_map(|c| match c {
                DrawCommand::Text {
                    origin, content, ..
                } => Some((*origin, content.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(texts[0], (Point::new(10.0, 10.0), "one".to_string()));
        assert_eq!(texts[1], (Point::new(10.0, 58.0), "three".to_string()));
    }

    #[test]
    fn test_preview_drawn_above_elements() {
        let (mut canvas, _) = canvas_with_rect();
        canvas.set_tool(ToolKind::Ellipse);
        canvas.pointer_down(Point::new(100.0, 100.0), MouseButton::Left, Modifiers::NONE);
        canvas.pointer_move(Point::new(160.0, 140.0));

        let scene = render(&RenderContext::new(&canvas)).unwrap();
        assert_eq!(scene.in_layer(Layer::Preview).count(), 1);
        assert!(is_sorted(&ranks(&scene)));
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_selection_draws_dashed_bounds_and_handles() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.select(id);
        let scene = render(&RenderContext::new(&canvas)).unwrap();

        let commands: Vec<&DrawCommand> = scene.in_layer(Layer::Selection).collect();
        // Dashed outline, then fill and stroke per handle.
        assert_eq!(commands.len(), 1 + 8 * 2);
        let DrawCommand::Stroke { style, .. } = commands[0] else {
            panic!("selection outline should be a stroke");
        };
        assert!(!style.dash_pattern.is_empty());
        assert!(is_sorted(&ranks(&scene)));
    }

    #[test]
    fn test_handles_keep_screen_size_when_zoomed_out() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.select(id);
        canvas.viewport.scale = 0.5;
        let scene = render(&RenderContext::new(&canvas)).unwrap();

        let handle = scene
            .in_layer(Layer::Selection)
            .find_map(|c| match c {
                DrawCommand::Fill { path, .. } => Some(path.bounding_box()),
                _ => None,
            })
            .unwrap();
        let expected = canvas.config.handle_size / 0.5;
        assert!((handle.width() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_marquee_drawn_last_while_box_selecting() {
        let (mut canvas, _) = canvas_with_rect();
        canvas.pointer_down(Point::new(20.0, 20.0), MouseButton::Left, Modifiers::NONE);
        canvas.pointer_move(Point::new(700.0, 500.0));

        let scene = render(&RenderContext::new(&canvas)).unwrap();
        let last = scene.commands().last().unwrap();
        assert_eq!(last.layer(), Layer::Marquee);
        assert_eq!(scene.in_layer(Layer::Marquee).count(), 2);
        assert!(is_sorted(&ranks(&scene)));
    }

    #[test]
    fn test_caret_follows_edited_text() {
        let mut canvas = Canvas::default();
        canvas.set_tool(ToolKind::Text);
        canvas.pointer_down(Point::new(400.0, 300.0), MouseButton::Left, Modifiers::NONE);
        canvas.handle_key_event(&KeyEvent::plain(Key::Character('h')));
        canvas.handle_key_event(&KeyEvent::plain(Key::Character('i')));
        let id = canvas.interaction().editing_text().unwrap();

        let scene = render(&RenderContext::new(&canvas)).unwrap();
        let commands: Vec<&DrawCommand> = scene.in_layer(Layer::Element(id)).collect();
        assert_eq!(commands.len(), 2);
        let DrawCommand::Stroke { path, .. } = commands[1] else {
            panic!("caret should be a stroke");
        };
        let caret = path.bounding_box();
        let font_size = canvas.tools.font_size;
        assert!((caret.x0 - 2.0 * font_size * CHAR_WIDTH_FACTOR).abs() < 1e-9);
        assert!((caret.height() - font_size * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_render_does_not_mutate_canvas() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.select(id);
        let before = canvas.serialize_state();
        let _ = canvas.take_redraw();

        render(&RenderContext::new(&canvas)).unwrap();

        assert_eq!(canvas.serialize_state(), before);
        assert!(canvas.is_selected(id));
        assert!(!canvas.take_redraw());
    }

    #[test]
    fn test_empty_surface_is_an_error() {
        let mut canvas = Canvas::default();
        canvas.set_surface_size(0.0, 0.0);
        let ctx = RenderContext::new(&canvas);
        let mut renderer = SceneRenderer::new();
        assert!(matches!(
            renderer.build_scene(&ctx),
            Err(RendererError::Surface(_))
        ));
        assert!(renderer.scene().is_empty());
    }
}
