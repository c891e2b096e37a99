//! Linear undo/redo over full element snapshots.

use crate::elements::Element;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Snapshot list plus a cursor pointing at the current state.
///
/// There is always at least one snapshot, so `0 <= cursor < len` holds at all times.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Element>>,
    cursor: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Start a history whose first snapshot is `initial`.
    pub fn new(initial: Vec<Element>, limit: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Drop everything and start again from `initial`.
    pub fn reset(&mut self, initial: Vec<Element>) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = 0;
    }

    /// Record a new state, discarding anything that could have been redone.
    pub fn commit(&mut self, elements: &[Element]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(elements.to_vec());
        if self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
        log::debug!("History commit ({} of {})", self.cursor + 1, self.snapshots.len());
    }

    /// Step back. Returns the restored state, or `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward. Returns the restored state, or `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> &[Element] {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots kept, including the current one.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Primitive, PrimitiveKind};
    use kurbo::Point;
    use proptest::prelude::*;

    fn shape(n: f64) -> Element {
        Element::from(Primitive::new(
            PrimitiveKind::Rectangle,
            Point::new(n, n),
            Point::new(n + 10.0, n + 10.0),
        ))
    }

    #[test]
    fn test_undo_redo_at_boundaries() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.snapshot_count(), 1);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::default();
        let one = vec![shape(0.0)];
        history.commit(&one);
        assert_eq!(history.undo().map(<[Element]>::len), Some(0));
        assert_eq!(history.redo(), Some(one.as_slice()));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_truncates_redo_branch() {
        let mut history = History::default();
        history.commit(&[shape(1.0)]);
        history.commit(&[shape(1.0), shape(2.0)]);
        history.undo();
        history.commit(&[shape(3.0)]);
        assert_eq!(history.snapshot_count(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.current().len(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(Vec::new(), 3);
        let shapes: Vec<Element> = (0..5).map(|i| shape(i as f64)).collect();
        for s in &shapes {
            history.commit(std::slice::from_ref(s));
        }
        assert_eq!(history.snapshot_count(), 3);
        assert_eq!(history.cursor(), 2);
        while history.undo().is_some() {}
        assert_eq!(history.current(), std::slice::from_ref(&shapes[2]));
    }

    #[test]
    fn test_reset() {
        let mut history = History::default();
        history.commit(&[shape(0.0)]);
        history.reset(vec![shape(5.0)]);
        assert_eq!(history.snapshot_count(), 1);
        assert!(!history.can_undo());
    }

    proptest! {
        #[test]
        fn prop_undo_all_then_redo_all(count in 1usize..20) {
            let mut history = History::default();
            let mut states = vec![Vec::new()];
            let mut elements = Vec::new();
            for i in 0..count {
                elements.push(shape(i as f64));
                history.commit(&elements);
                states.push(elements.clone());
            }
            for expected in states.iter().rev().skip(1) {
                prop_assert_eq!(history.undo(), Some(expected.as_slice()));
            }
            prop_assert!(history.undo().is_none());
            for expected in states.iter().skip(1) {
                prop_assert_eq!(history.redo(), Some(expected.as_slice()));
            }
            prop_assert!(history.redo().is_none());
        }
    }
}
