//! Selection set, hit-testing predicates, and the resize handle system.

use crate::elements::{Element, ElementId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A resized box never gets thinner than this along a moved axis.
pub const MIN_RESIZE_EXTENT: f64 = 1.0;

/// One of the eight resize handles around an element's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "br")]
    BottomRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "b")]
    Bottom,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "r")]
    Right,
}

impl HandleKind {
    /// All handles, corners first.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomRight,
        HandleKind::BottomLeft,
        HandleKind::Top,
        HandleKind::Bottom,
        HandleKind::Left,
        HandleKind::Right,
    ];

    /// Short name (`tl`, `t`, ...).
    pub fn name(self) -> &'static str {
        match self {
            HandleKind::TopLeft => "tl",
            HandleKind::TopRight => "tr",
            HandleKind::BottomRight => "br",
            HandleKind::BottomLeft => "bl",
            HandleKind::Top => "t",
            HandleKind::Bottom => "b",
            HandleKind::Left => "l",
            HandleKind::Right => "r",
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft | HandleKind::TopRight | HandleKind::BottomRight | HandleKind::BottomLeft
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::BottomLeft | HandleKind::Left)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, HandleKind::TopRight | HandleKind::BottomRight | HandleKind::Right)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::TopRight | HandleKind::Top)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, HandleKind::BottomLeft | HandleKind::BottomRight | HandleKind::Bottom)
    }

    /// Position of this handle on `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            HandleKind::TopLeft => Point::new(bounds.x0, bounds.y0),
            HandleKind::TopRight => Point::new(bounds.x1, bounds.y0),
            HandleKind::BottomRight => Point::new(bounds.x1, bounds.y1),
            HandleKind::BottomLeft => Point::new(bounds.x0, bounds.y1),
            HandleKind::Top => Point::new(center.x, bounds.y0),
            HandleKind::Bottom => Point::new(center.x, bounds.y1),
            HandleKind::Left => Point::new(bounds.x0, center.y),
            HandleKind::Right => Point::new(bounds.x1, center.y),
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in world coordinates) hits this handle.
    /// `tolerance` should already be adjusted for the zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight handles of a bounding box.
pub fn get_handles(bounds: Rect) -> Vec<Handle> {
    HandleKind::ALL
        .iter()
        .map(|kind| Handle::new(kind.position(bounds), *kind))
        .collect()
}

/// Find the handle under `point`.
///
/// `handle_size` is in screen pixels; the hit radius is half of it converted
/// to world units at `scale`.
pub fn hit_test_handles(
    bounds: Rect,
    point: Point,
    handle_size: f64,
    scale: f64,
) -> Option<HandleKind> {
    let tolerance = handle_size / 2.0 / scale;
    get_handles(bounds)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Bounds after dragging `handle` of `original` to `pointer`.
///
/// Only the edges named by the handle move. The result is not normalized: when
/// the pointer crosses the fixed edge, the box comes back inverted.
pub fn resize_bounds(original: Rect, handle: HandleKind, pointer: Point) -> Rect {
    let mut target = original;
    if handle.moves_left() {
        target.x0 = moved_edge(original.x1, pointer.x, original.x0);
    }
    if handle.moves_right() {
        target.x1 = moved_edge(original.x0, pointer.x, original.x1);
    }
    if handle.moves_top() {
        target.y0 = moved_edge(original.y1, pointer.y, original.y0);
    }
    if handle.moves_bottom() {
        target.y1 = moved_edge(original.y0, pointer.y, original.y1);
    }
    target
}

/// Place the moving edge at `pointer`, at least `MIN_RESIZE_EXTENT` away from `fixed`.
fn moved_edge(fixed: f64, pointer: f64, original: f64) -> f64 {
    let offset = pointer - fixed;
    if offset.abs() >= MIN_RESIZE_EXTENT {
        return pointer;
    }
    let side = if offset != 0.0 {
        offset.signum()
    } else if original >= fixed {
        1.0
    } else {
        -1.0
    };
    fixed + side * MIN_RESIZE_EXTENT
}

/// Resize an element from its pre-gesture copy.
pub fn apply_resize(original: &Element, handle: HandleKind, pointer: Point) -> Element {
    let target = resize_bounds(original.bounds(), handle, pointer);
    original.scaled_within_bounds(handle, target)
}

/// Point hit-test: bounds inflated by `padding` contain `point` (edges included).
pub fn hits_point(element: &Element, point: Point, padding: f64) -> bool {
    let b = element.bounds().inflate(padding, padding);
    point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
}

/// Box hit-test against a (possibly inverted) query rectangle.
///
/// Text is selected by its anchor, everything else by overlapping bounds.
pub fn hits_box(element: &Element, query: Rect) -> bool {
    let q = query.abs();
    match element {
        Element::Text(text) => {
            let p = text.position;
            p.x >= q.x0 && p.x <= q.x1 && p.y >= q.y0 && p.y <= q.y1
        }
        _ => {
            let b = element.bounds();
            b.x0 <= q.x1 && b.x1 >= q.x0 && b.y0 <= q.y1 && b.y1 >= q.y0
        }
    }
}

/// Ordered set of selected element ids with an optional primary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ElementId>,
    primary: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn primary(&self) -> Option<ElementId> {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Replace the selection with a single element.
    pub fn select_only(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
        self.primary = Some(id);
    }

    /// Replace the selection with `ids`, keeping their order and dropping repeats.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        self.primary = self.ids.first().copied();
    }

    pub fn add(&mut self, id: ElementId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
        self.primary = Some(id);
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|i| *i != id);
        if self.primary == Some(id) {
            self.primary = self.ids.last().copied();
        }
    }

    /// Add `id` if absent, remove it otherwise.
    pub fn toggle(&mut self, id: ElementId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.primary = None;
    }

    /// Drop every id for which `is_live` is false.
    pub fn purge(&mut self, is_live: impl Fn(ElementId) -> bool) {
        self.ids.retain(|id| is_live(*id));
        if self.primary.is_some_and(|id| !is_live(id)) {
            self.primary = self.ids.last().copied();
        }
    }
}

/// Active resize of a single element.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    pub element_id: ElementId,
    pub handle: HandleKind,
    pub start_point: Point,
    pub current_point: Point,
    /// Pre-gesture copy; every update resizes from it.
    pub original: Element,
}

impl ManipulationState {
    pub fn new(handle: HandleKind, start_point: Point, original: Element) -> Self {
        Self {
            element_id: original.id(),
            handle,
            start_point,
            current_point: start_point,
            original,
        }
    }

    /// Element as it should look with the pointer at `current_point`.
    pub fn resized(&self) -> Element {
        apply_resize(&self.original, self.handle, self.current_point)
    }
}

/// Active drag of the whole selection.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    pub start_point: Point,
    pub current_point: Point,
    /// Pre-gesture copies keyed by id.
    pub originals: HashMap<ElementId, Element>,
}

impl MultiMoveState {
    pub fn new(start_point: Point, originals: HashMap<ElementId, Element>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            originals,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    pub fn has_moved(&self) -> bool {
        self.delta().hypot2() > 0.0
    }
}
