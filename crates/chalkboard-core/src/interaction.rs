//! Pointer and keyboard state machine driving a [`Canvas`].

use crate::canvas::Canvas;
use crate::elements::{Element, ElementId, ElementTrait, Freehand, Primitive, Text};
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{ManipulationState, MultiMoveState, hit_test_handles, hits_point};
use crate::tools::ToolKind;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// The gesture currently in progress.
#[derive(Debug, Clone, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Dragging the camera; `last` is in screen coordinates.
    Panning { last: Point },
    /// Provisional stroke, not yet in the document.
    DrawingPath { path: Freehand },
    /// Provisional shape, not yet in the document.
    DrawingShape { shape: Primitive },
    /// Rubber band in world coordinates.
    BoxSelecting { start: Point, current: Point },
    DraggingSelection(MultiMoveState),
    Resizing(ManipulationState),
    /// Typing into a text element that already lives in the document.
    EditingText {
        id: ElementId,
        /// Content before editing began; `None` for a freshly placed text.
        original: Option<String>,
    },
}

impl Interaction {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Panning { .. } => "panning",
            Interaction::DrawingPath { .. } => "drawing-path",
            Interaction::DrawingShape { .. } => "drawing-shape",
            Interaction::BoxSelecting { .. } => "box-selecting",
            Interaction::DraggingSelection(_) => "dragging",
            Interaction::Resizing(_) => "resizing",
            Interaction::EditingText { .. } => "editing-text",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// Element being drawn, shown on top of the document.
    pub fn preview(&self) -> Option<Element> {
        match self {
            Interaction::DrawingPath { path } => Some(Element::Path(path.clone())),
            Interaction::DrawingShape { shape } => Some(Element::Shape(shape.clone())),
            _ => None,
        }
    }

    /// Rubber band rectangle (world coordinates, normalized).
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            Interaction::BoxSelecting { start, current } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }

    /// Id of the text element being typed into.
    pub fn editing_text(&self) -> Option<ElementId> {
        match self {
            Interaction::EditingText { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl Canvas {
    /// Route a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
            PointerEvent::Scroll { position, delta } => self.wheel(position, delta),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        self.last_pointer = Some(position);
        let world = self.screen_to_world(position);

        if let Interaction::EditingText { id, .. } = self.interaction {
            let inside = self
                .document
                .get(id)
                .is_some_and(|e| hits_point(e, world, 0.0));
            if inside {
                return;
            }
            self.finish_text_editing();
        }
        if !self.interaction.is_idle() {
            // A second button while a gesture is active is ignored.
            return;
        }

        let pan_trigger = self.tools.tool == ToolKind::Pan
            || modifiers.space
            || matches!(button, MouseButton::Middle | MouseButton::Right);
        if pan_trigger {
            self.set_interaction(Interaction::Panning { last: position });
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        match self.tools.tool {
            ToolKind::Select => self.select_down(world, modifiers),
            ToolKind::Pen => {
                let path = self.tools.new_path(world);
                self.set_interaction(Interaction::DrawingPath { path });
            }
            ToolKind::Text => self.text_down(world),
            tool => {
                if let Some(kind) = tool.primitive_kind() {
                    let shape = self.tools.new_shape(kind, world);
                    self.set_interaction(Interaction::DrawingShape { shape });
                }
            }
        }
    }

    fn select_down(&mut self, world: Point, modifiers: Modifiers) {
        // Handles of selected elements win over everything else.
        let handle_hit = self.selection.ids().iter().rev().find_map(|id| {
            let element = self.document.get(*id)?;
            let handle = hit_test_handles(
                element.bounds(),
                world,
                self.config.handle_size,
                self.viewport.scale,
            )?;
            Some((handle, element.clone()))
        });
        if let Some((handle, original)) = handle_hit {
            log::debug!("Resize {} via {}", original.id(), handle.name());
            self.set_interaction(Interaction::Resizing(ManipulationState::new(
                handle, world, original,
            )));
            return;
        }

        match self.document.element_at_point(world, self.config.hit_padding) {
            Some(id) if modifiers.shift => {
                self.selection.toggle(id);
                self.request_redraw();
            }
            Some(id) => {
                if !self.selection.contains(id) {
                    self.selection.select_only(id);
                }
                let originals: HashMap<ElementId, Element> = self
                    .selection
                    .ids()
                    .iter()
                    .filter_map(|sid| self.document.get(*sid).map(|e| (*sid, e.clone())))
                    .collect();
                self.set_interaction(Interaction::DraggingSelection(MultiMoveState::new(
                    world, originals,
                )));
            }
            None => {
                self.selection.clear();
                self.set_interaction(Interaction::BoxSelecting {
                    start: world,
                    current: world,
                });
            }
        }
    }

    fn text_down(&mut self, world: Point) {
        let existing = self
            .document
            .elements()
            .iter()
            .rev()
            .find(|e| e.is_text() && hits_point(e, world, self.config.hit_padding))
            .and_then(Element::as_text)
            .map(|t| (t.id, t.content.clone()));

        let (id, original) = match existing {
            Some((id, content)) => (id, Some(content)),
            None => {
                let text = self.tools.new_text(world);
                let id = text.id;
                self.document.add_element(Element::Text(text));
                (id, None)
            }
        };
        self.selection.select_only(id);
        self.set_interaction(Interaction::EditingText { id, original });
    }

    /// Pointer moved to a screen position.
    pub fn pointer_move(&mut self, position: Point) {
        self.last_pointer = Some(position);
        let world = self.screen_to_world(position);

        match &mut self.interaction {
            Interaction::Idle | Interaction::EditingText { .. } => return,
            Interaction::Panning { last } => {
                let delta = position - *last;
                *last = position;
                self.viewport.pan(delta);
            }
            Interaction::DrawingPath { path } => {
                if path.points.last() != Some(&world) {
                    path.add_point(world);
                }
            }
            Interaction::DrawingShape { shape } => {
                shape.end = world;
            }
            Interaction::BoxSelecting { start, current } => {
                *current = world;
                let rect = Rect::from_points(*start, *current);
                let hits = self.document.elements_in_rect(rect);
                self.selection.set(hits);
            }
            Interaction::DraggingSelection(state) => {
                state.current_point = world;
                let delta = state.delta();
                for original in state.originals.values() {
                    self.document.replace_element(original.translated(delta));
                }
            }
            Interaction::Resizing(state) => {
                state.current_point = world;
                self.document.replace_element(state.resized());
            }
        }
        self.request_redraw();
    }

    /// Pointer released at a screen position.
    pub fn pointer_up(&mut self, position: Point) {
        self.pointer_move(position);
        self.finish_gesture();
    }

    /// Pointer left the surface; the gesture ends where it was last seen.
    pub fn pointer_leave(&mut self) {
        self.finish_gesture();
    }

    /// Wheel zoom around the cursor.
    pub fn wheel(&mut self, position: Point, delta: Vec2) {
        let factor = self.config.wheel_factor(delta.y);
        self.zoom_at(position, factor);
    }

    fn finish_gesture(&mut self) {
        if matches!(
            self.interaction,
            Interaction::Idle | Interaction::EditingText { .. }
        ) {
            return;
        }
        let finished = std::mem::take(&mut self.interaction);
        log::debug!("Finish {}", finished.name());
        match finished {
            Interaction::Idle | Interaction::EditingText { .. } => {}
            Interaction::Panning { .. } | Interaction::BoxSelecting { .. } => {}
            Interaction::DrawingPath { path } => {
                if path.is_valid() && path.length() >= self.config.min_path_length {
                    self.document.add_element(Element::Path(path));
                    self.commit();
                } else {
                    log::debug!("Discarded degenerate path");
                }
            }
            Interaction::DrawingShape { shape } => {
                let big_enough = if shape.kind.is_box() {
                    shape.bounds().area() >= self.config.min_shape_area
                } else {
                    shape.length() >= self.config.min_line_length
                };
                if shape.is_valid() && big_enough {
                    self.document.add_element(Element::Shape(shape));
                    self.commit();
                } else {
                    log::debug!("Discarded degenerate {:?}", shape.kind);
                }
            }
            Interaction::DraggingSelection(state) => {
                if state.has_moved() {
                    self.commit();
                }
            }
            Interaction::Resizing(state) => {
                if state.current_point != state.start_point {
                    self.commit();
                }
            }
        }
        self.request_redraw();
    }

    /// Abandon the active gesture, putting any touched elements back.
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::DraggingSelection(state) => {
                for original in state.originals.into_values() {
                    self.document.replace_element(original);
                }
            }
            Interaction::Resizing(state) => {
                self.document.replace_element(state.original);
            }
            Interaction::EditingText { id, original } => {
                // Not a gesture; keep editing.
                self.interaction = Interaction::EditingText { id, original };
                return;
            }
            Interaction::Idle => return,
            Interaction::Panning { .. }
            | Interaction::DrawingPath { .. }
            | Interaction::DrawingShape { .. }
            | Interaction::BoxSelecting { .. } => {}
        }
        self.request_redraw();
    }

    /// Leave text editing, committing trimmed content or removing an empty element.
    pub fn finish_text_editing(&mut self) {
        if !matches!(self.interaction, Interaction::EditingText { .. }) {
            return;
        }
        let Interaction::EditingText { id, original } = std::mem::take(&mut self.interaction)
        else {
            return;
        };
        self.request_redraw();

        let trimmed = match self.document.get_mut(id).and_then(Element::as_text_mut) {
            Some(text) => {
                let trimmed = text.trimmed().to_string();
                text.content = trimmed.clone();
                trimmed
            }
            None => return,
        };

        if trimmed.is_empty() {
            self.document.remove_element(id);
            let document = &self.document;
            self.selection.purge(|id| document.contains(id));
            log::debug!("Removed empty text {}", id);
            if original.is_some() {
                self.commit();
            }
        } else if original.as_deref() != Some(trimmed.as_str()) {
            self.commit();
        }
    }

    /// Route a key press. Returns true if the canvas consumed it.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let mods = event.modifiers;

        if let Interaction::EditingText { id, .. } = self.interaction {
            let handled = match &event.key {
                Key::Escape => {
                    self.finish_text_editing();
                    return true;
                }
                Key::Enter if !mods.shift => {
                    self.finish_text_editing();
                    return true;
                }
                Key::Enter => self.edit_text(id, |t| t.insert_char('\n')),
                Key::Backspace => self.edit_text(id, Text::backspace),
                Key::Character(c) if !mods.command() => {
                    let c = *c;
                    self.edit_text(id, |t| t.insert_char(c))
                }
                _ => false,
            };
            return handled;
        }

        if !self.interaction.is_idle() {
            if event.key == Key::Escape {
                self.cancel_gesture();
                self.clear_selection();
                return true;
            }
            return false;
        }

        match &event.key {
            Key::Escape => {
                self.clear_selection();
                true
            }
            Key::Delete | Key::Backspace => self.delete_selected() > 0,
            key if mods.command() && key.is_letter('z') => {
                if mods.shift { self.redo() } else { self.undo() }
            }
            key if mods.command() && key.is_letter('y') => self.redo(),
            key if mods.command() && key.is_letter('a') => {
                self.select_all();
                true
            }
            _ => false,
        }
    }

    fn edit_text<R>(&mut self, id: ElementId, edit: impl FnOnce(&mut Text) -> R) -> bool {
        match self.document.get_mut(id).and_then(Element::as_text_mut) {
            Some(text) => {
                edit(text);
                self.request_redraw();
                true
            }
            None => false,
        }
    }

    fn set_interaction(&mut self, next: Interaction) {
        log::debug!("{} -> {}", self.interaction.name(), next.name());
        self.interaction = next;
        self.request_redraw();
    }
}
