//! Surface host: owns one canvas, its renderer, and the storage it persists to.

use chalkboard_core::{
    Canvas, CanvasConfig, KeyEvent, PointerEvent, Storage, StorageError, ToolKind,
};
use chalkboard_render::{GridStyle, RenderContext, Renderer, RendererError, Scene, SceneRenderer};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Host configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            grid_style: GridStyle::Lines,
            canvas: CanvasConfig::default(),
        }
    }
}

/// An open drawing surface bound to a document id.
///
/// Every routed event that changes what is on screen is answered with an
/// immediate render, so [`SurfaceHost::scene`] always reflects the canvas.
pub struct SurfaceHost {
    doc_id: String,
    storage: Arc<dyn Storage>,
    canvas: Canvas,
    renderer: SceneRenderer,
    grid_style: GridStyle,
    frames: u64,
}

impl SurfaceHost {
    /// Open the surface for `doc_id`.
    ///
    /// A missing record starts an empty drawing. Any other load failure is
    /// logged and also starts empty.
    pub fn open(storage: Arc<dyn Storage>, doc_id: &str, config: AppConfig) -> Self {
        let mut canvas = Canvas::new(config.canvas);
        canvas.set_surface_size(f64::from(config.width), f64::from(config.height));

        match pollster::block_on(storage.load(doc_id)) {
            Ok(state) => {
                log::info!(
                    "Opened '{}' with {} elements",
                    doc_id,
                    state.elements.len()
                );
                canvas.load_state(state);
            }
            Err(StorageError::NotFound(_)) => {
                log::info!("Opened new drawing '{}'", doc_id);
            }
            Err(e) => {
                log::warn!("Failed to load '{}', starting empty: {}", doc_id, e);
            }
        }

        let mut host = Self {
            doc_id: doc_id.to_string(),
            storage,
            canvas,
            renderer: SceneRenderer::new(),
            grid_style: config.grid_style,
            frames: 0,
        };
        host.redraw_if_needed();
        host
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The most recently rendered frame.
    pub fn scene(&self) -> &Scene {
        self.renderer.scene()
    }

    /// Number of frames rendered since the surface was opened.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.canvas.handle_pointer_event(event);
        self.redraw_if_needed();
    }

    /// Route a key press. Returns true if the canvas consumed it.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let consumed = self.canvas.handle_key_event(event);
        self.redraw_if_needed();
        consumed
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.canvas.set_tool(tool);
        self.redraw_if_needed();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas
            .set_surface_size(f64::from(width), f64::from(height));
        self.redraw_if_needed();
    }

    /// Render if the canvas asked for it. Returns true if a frame was drawn.
    pub fn redraw_if_needed(&mut self) -> bool {
        if !self.canvas.take_redraw() {
            return false;
        }
        match self.render() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Skipped frame for '{}': {}", self.doc_id, e);
                false
            }
        }
    }

    /// Render a frame unconditionally.
    pub fn render(&mut self) -> Result<(), AppError> {
        let ctx = RenderContext::new(&self.canvas).with_grid(self.grid_style);
        self.renderer.build_scene(&ctx)?;
        self.frames += 1;
        Ok(())
    }

    /// Persist the current drawing without closing.
    pub fn save(&self) -> Result<(), AppError> {
        let state = self.canvas.serialize_state();
        pollster::block_on(self.storage.save(&self.doc_id, &state))?;
        log::debug!("Saved '{}' ({} elements)", self.doc_id, state.elements.len());
        Ok(())
    }

    /// Settle any open gesture or text edit, then save.
    pub fn close(mut self) -> Result<(), AppError> {
        self.canvas.pointer_leave();
        self.canvas.finish_text_editing();
        self.save()?;
        log::info!("Closed '{}'", self.doc_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chalkboard_core::storage::{BoxFuture, MemoryStorage};
    use chalkboard_core::{Key, Modifiers, MouseButton, PersistedState, StorageResult, Viewport};
    use chalkboard_render::Layer;
    use kurbo::Point;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_open_new_document_renders_first_frame() {
        let storage = memory();
        let host = SurfaceHost::open(storage, "fresh", AppConfig::default());

        assert_eq!(host.frames(), 1);
        assert!(host.canvas().document.is_empty());
        assert!(!host.scene().is_empty());
    }

    #[test]
    fn test_draw_then_close_persists() {
        let storage = memory();
        let mut host = SurfaceHost::open(storage.clone(), "lesson", AppConfig::default());

        host.set_tool(ToolKind::Rectangle);
        host.handle_pointer_event(down(100.0, 100.0));
        host.handle_pointer_event(moved(150.0, 130.0));
        assert_eq!(host.scene().in_layer(Layer::Preview).count(), 1);
        host.handle_pointer_event(up(200.0, 160.0));
        assert_eq!(host.canvas().document.len(), 1);
        host.close().unwrap();

        let saved = pollster::block_on(storage.load("lesson")).unwrap();
        assert_eq!(saved.elements.len(), 1);

        let reopened = SurfaceHost::open(storage, "lesson", AppConfig::default());
        assert_eq!(reopened.canvas().document.len(), 1);
    }

    #[test]
    fn test_every_mutating_event_renders() {
        let storage = memory();
        let mut host = SurfaceHost::open(storage, "frames", AppConfig::default());
        let start = host.frames();

        host.set_tool(ToolKind::Pen);
        host.handle_pointer_event(down(10.0, 10.0));
        host.handle_pointer_event(moved(20.0, 20.0));
        host.handle_pointer_event(moved(30.0, 25.0));
        host.handle_pointer_event(up(30.0, 25.0));

        assert!(host.frames() >= start + 3);
        assert!(!host.redraw_if_needed());
    }

    #[test]
    fn test_close_commits_text_being_edited() {
        let storage = memory();
        let mut host = SurfaceHost::open(storage.clone(), "notes", AppConfig::default());

        host.set_tool(ToolKind::Text);
        host.handle_pointer_event(down(300.0, 300.0));
        for c in "  hello ".chars() {
            host.handle_key_event(&KeyEvent::plain(Key::Character(c)));
        }
        host.close().unwrap();

        let saved = pollster::block_on(storage.load("notes")).unwrap();
        let text = saved.elements[0].as_text().unwrap();
        assert_eq!(text.content, "hello");
    }

    struct Broken;

    impl Storage for Broken {
        fn save(&self, _id: &str, _state: &PersistedState) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk gone".to_string())) })
        }

        fn load(&self, _id: &str) -> BoxFuture<'_, StorageResult<PersistedState>> {
            Box::pin(async { Err(StorageError::Serialization("garbage".to_string())) })
        }

        fn delete(&self, _id: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn exists(&self, _id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_unreadable_record_fails_closed() {
        let host = SurfaceHost::open(Arc::new(Broken), "doc", AppConfig::default());
        assert!(host.canvas().document.is_empty());
        assert_eq!(host.canvas().viewport, Viewport::new());
        assert!(matches!(
            host.close(),
            Err(AppError::Storage(StorageError::Io(_)))
        ));
    }
}
