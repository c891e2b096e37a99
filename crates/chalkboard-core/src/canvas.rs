//! Canvas document and runtime state.

use crate::camera::Viewport;
use crate::config::CanvasConfig;
use crate::elements::{Element, ElementId};
use crate::history::History;
use crate::interaction::Interaction;
use crate::selection::{Selection, hits_box, hits_point};
use crate::state::PersistedState;
use crate::tools::{ToolKind, ToolSettings};
use kurbo::{Point, Rect, Size};

/// The elements of one drawing, in insertion (paint) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasDocument {
    elements: Vec<Element>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Elements back to front.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Add an element on top of everything else.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Swap in a new version of an existing element, keeping its position in the order.
    pub fn replace_element(&mut self, element: Element) -> bool {
        match self.index_of(element.id()) {
            Some(index) => {
                self.elements[index] = element;
                true
            }
            None => false,
        }
    }

    /// Replace the whole element collection.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(Element::id)
    }

    /// Union of all element bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .map(Element::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Topmost element under a point.
    pub fn element_at_point(&self, point: Point, padding: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| hits_point(e, point, padding))
            .map(Element::id)
    }

    /// Elements touched by a (possibly inverted) rectangle, in paint order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| hits_box(e, rect))
            .map(Element::id)
            .collect()
    }
}

/// Runtime state of one open drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Camera for the view transform.
    pub viewport: Viewport,
    /// Size of the render surface in pixels.
    pub surface_size: Size,
    pub selection: Selection,
    /// Toolbar values set by the host.
    pub tools: ToolSettings,
    pub config: CanvasConfig,
    pub(crate) history: History,
    pub(crate) interaction: Interaction,
    /// Last pointer position in screen coordinates.
    pub(crate) last_pointer: Option<Point>,
    dirty: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            document: CanvasDocument::new(),
            viewport: Viewport::new(),
            surface_size: Size::new(800.0, 600.0),
            selection: Selection::new(),
            tools: ToolSettings::default(),
            history: History::new(Vec::new(), config.history_limit),
            config,
            interaction: Interaction::Idle,
            last_pointer: None,
            dirty: true,
        }
    }

    /// Create a canvas from a persisted record.
    pub fn with_state(config: CanvasConfig, state: PersistedState) -> Self {
        let mut canvas = Self::new(config);
        canvas.load_state(state);
        canvas
    }

    /// Set the surface size. The camera stays centered on the same world point.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.surface_size = Size::new(width, height);
        self.request_redraw();
    }

    /// Mark the surface as needing a redraw.
    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    /// Returns true once per batch of changes; the host renders when it does.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Current gesture state.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Switch tools, finishing any gesture in progress first.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tools.tool == tool {
            return;
        }
        self.finish_text_editing();
        self.cancel_gesture();
        log::debug!("Tool: {:?} -> {:?}", self.tools.tool, tool);
        self.tools.tool = tool;
        self.request_redraw();
    }

    /// Select a single element.
    pub fn select(&mut self, id: ElementId) {
        if self.document.contains(id) {
            self.selection.select_only(id);
            self.request_redraw();
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.request_redraw();
        }
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.document.ids());
        self.request_redraw();
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(id)
    }

    /// Delete the selected elements and record the change. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        let removed = ids
            .into_iter()
            .filter(|id| self.document.remove_element(*id).is_some())
            .count();
        let document = &self.document;
        self.selection.purge(|id| document.contains(id));
        if removed > 0 {
            log::debug!("Deleted {} element(s)", removed);
            self.commit();
        }
        self.request_redraw();
        removed
    }

    /// Record the current elements as a new history step.
    pub(crate) fn commit(&mut self) {
        self.history.commit(self.document.elements());
    }

    /// Undo the last committed change.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        let elements = snapshot.to_vec();
        self.restore(elements);
        true
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        let elements = snapshot.to_vec();
        self.restore(elements);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, elements: Vec<Element>) {
        self.document.replace_all(elements);
        self.selection.clear();
        self.interaction = Interaction::Idle;
        self.request_redraw();
    }

    /// Reset the camera to the origin at zoom 1.
    pub fn home(&mut self) {
        self.viewport.reset();
        self.request_redraw();
    }

    /// Zoom around a screen point.
    pub fn zoom_at(&mut self, focal: Point, factor: f64) -> bool {
        let changed = self.viewport.zoom_at(focal, factor, self.surface_size);
        if changed {
            self.request_redraw();
        }
        changed
    }

    /// Screen position to world coordinates for the current camera.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.viewport.screen_to_world(screen, self.surface_size)
    }

    /// Replace everything with a persisted record. Invalid parts are dropped.
    pub fn load_state(&mut self, state: PersistedState) {
        let state = state.sanitized();
        log::debug!("Loading {} element(s)", state.elements.len());
        self.viewport = state.viewport_hint.unwrap_or_default();
        self.history.reset(state.elements.clone());
        self.document.replace_all(state.elements);
        self.selection.clear();
        self.interaction = Interaction::Idle;
        self.last_pointer = None;
        self.request_redraw();
    }

    /// Load a persisted record from JSON, falling back to an empty document.
    pub fn load_state_json(&mut self, json: &str) {
        match PersistedState::from_json(json) {
            Ok(state) => self.load_state(state),
            Err(e) => {
                log::warn!("Failed to load drawing state, starting empty: {}", e);
                self.load_state(PersistedState::default());
            }
        }
    }

    /// Snapshot of the committed drawing suitable for persistence.
    ///
    /// Elements that could not be reloaded (such as text still being typed
    /// and empty) are left out.
    pub fn serialize_state(&self) -> PersistedState {
        let elements = self
            .document
            .elements()
            .iter()
            .filter(|e| e.is_valid())
            .cloned()
            .collect();
        PersistedState::new(elements, Some(self.viewport))
    }

    pub fn serialize_state_json(&self) -> Result<String, serde_json::Error> {
        self.serialize_state().to_json()
    }
}
