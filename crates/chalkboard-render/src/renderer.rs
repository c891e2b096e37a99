//! Renderer trait and render context.

use chalkboard_core::Canvas;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid, only the background and origin axes.
    None,
    /// Full grid lines.
    #[default]
    Lines,
}

/// Everything a render pass reads.
///
/// The context only borrows the canvas; rendering never mutates it.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Surface size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    pub grid_color: Color,
    /// Color of the world origin axes.
    pub axis_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a render context for the canvas at its current surface size.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            viewport_size: canvas.surface_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Lines,
            grid_color: Color::from_rgba8(200, 200, 200, 100),
            axis_color: Color::from_rgba8(150, 150, 150, 200),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Set grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Whether the surface can be drawn into at all.
    pub fn has_drawable_surface(&self) -> bool {
        let Size { width, height } = self.viewport_size;
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
    }
}

/// Trait for render passes.
pub trait Renderer: Send + Sync {
    /// Build the scene for the given context.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color for clearing.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
