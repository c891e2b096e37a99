//! Chalkboard Render Library
//!
//! Turns canvas state into an ordered display list. Backends consume the
//! [`Scene`]; building it never mutates the canvas.

mod renderer;
mod scene;
mod scene_renderer;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DrawCommand, Layer, Scene, SceneSummary};
pub use scene_renderer::{SceneRenderer, render};
