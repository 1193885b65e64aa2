//! Linear snapshot history of the component list.
//!
//! Each entry is a full copy of the components after a mutating action.
//! `index` points at the entry reflecting the current state. Recording a
//! new entry drops everything after `index` (the redo tail).
//!
//! Only components are snapshotted. Canvas size, background, selection,
//! zoom and pan are never captured, so undo/redo leaves them alone.
//!
//! Interactive gestures can be coalesced: between `begin_gesture` and
//! `end_gesture`, the first record appends a new entry and later records
//! overwrite it, so one drag becomes one undo step. Actions that are not
//! part of the gesture go through `record_standalone` and always get their
//! own entry.

use crate::model::PlacedComponent;

pub type Snapshot = Vec<PlacedComponent>;

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Snapshot>,
    /// Index of the current entry; `None` while the history is empty.
    index: Option<usize>,
    /// Maximum entries kept; `0` = unbounded.
    max_depth: usize,
    gesture: Option<GestureState>,
}

#[derive(Debug, Clone, Copy)]
struct GestureState {
    recorded: bool,
}

impl History {
    /// Empty history with no entries and no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history keeping at most `max_depth` entries (`0` = unbounded).
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// History seeded with a baseline entry, so the first recorded action
    /// can be undone back to `baseline`.
    pub fn with_baseline(baseline: Snapshot, max_depth: usize) -> Self {
        Self {
            entries: vec![baseline],
            index: Some(0),
            max_depth,
            gesture: None,
        }
    }

    /// Record the state after a mutating action.
    pub fn record(&mut self, snapshot: Snapshot) {
        if let Some(gesture) = &mut self.gesture {
            if gesture.recorded
                && let Some(idx) = self.index
            {
                self.entries[idx] = snapshot;
                return;
            }
            gesture.recorded = true;
        }

        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);

        if self.max_depth > 0 && self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Record an entry that never merges into an open gesture. The next
    /// gesture record after it appends a fresh entry.
    pub fn record_standalone(&mut self, snapshot: Snapshot) {
        self.reset_gesture();
        self.record(snapshot);
        self.reset_gesture();
    }

    /// Step back one entry and return it. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let idx = self.index?;
        if idx == 0 {
            return None;
        }
        self.reset_gesture();
        self.index = Some(idx - 1);
        self.entries.get(idx - 1)
    }

    /// Step forward one entry and return it. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.index.map_or(0, |i| i + 1);
        if next >= self.entries.len() {
            return None;
        }
        self.reset_gesture();
        self.index = Some(next);
        self.entries.get(next)
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.map_or(0, |i| i + 1) < self.entries.len()
    }

    /// Start coalescing records into a single entry.
    pub fn begin_gesture(&mut self) {
        self.gesture = Some(GestureState { recorded: false });
    }

    /// Stop coalescing. Returns whether the gesture recorded anything.
    pub fn end_gesture(&mut self) -> bool {
        self.gesture.take().is_some_and(|g| g.recorded)
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Undo/redo in the middle of a gesture must not let the next record
    /// overwrite the entry we just moved to.
    fn reset_gesture(&mut self) {
        if let Some(g) = &mut self.gesture {
            g.recorded = false;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index?)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
        self.gesture = None;
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ComponentId;
    use crate::model::{ComponentKind, Frame, TextProps};

    fn snap(xs: &[f64]) -> Snapshot {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| {
                PlacedComponent::new(
                    ComponentId::intern(&format!("h-{i}")),
                    Frame::new(x, 0.0, 10.0, 10.0),
                    ComponentKind::Text(TextProps::default()),
                )
            })
            .collect()
    }

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let mut h = History::new();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
        assert_eq!(h.index(), None);
    }

    #[test]
    fn first_record_without_baseline_is_not_undoable() {
        let mut h = History::new();
        h.record(snap(&[1.0]));
        assert_eq!(h.index(), Some(0));
        assert!(!h.can_undo());
    }

    #[test]
    fn undo_redo_walk_the_entries() {
        let mut h = History::with_baseline(vec![], 0);
        h.record(snap(&[1.0]));
        h.record(snap(&[1.0, 2.0]));

        assert_eq!(h.undo().map(Vec::len), Some(1));
        assert_eq!(h.undo().map(Vec::len), Some(0));
        assert!(h.undo().is_none());
        assert_eq!(h.index(), Some(0));

        assert_eq!(h.redo().map(Vec::len), Some(1));
        assert_eq!(h.redo().map(Vec::len), Some(2));
        assert!(h.redo().is_none());
    }

    #[test]
    fn record_after_undo_drops_redo_tail() {
        let mut h = History::with_baseline(vec![], 0);
        h.record(snap(&[1.0]));
        h.record(snap(&[2.0]));
        h.undo();
        h.record(snap(&[3.0]));

        assert!(!h.can_redo());
        assert_eq!(h.len(), 3);
        assert_eq!(h.current().unwrap()[0].frame.x, 3.0);
    }

    #[test]
    fn max_depth_drops_oldest() {
        let mut h = History::with_max_depth(3);
        for x in 0..5 {
            h.record(snap(&[x as f64]));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), Some(2));
        assert_eq!(h.undo().unwrap()[0].frame.x, 3.0);
        assert_eq!(h.undo().unwrap()[0].frame.x, 2.0);
        assert!(h.undo().is_none());
    }

    #[test]
    fn gesture_coalesces_into_one_entry() {
        let mut h = History::with_baseline(vec![], 0);
        h.begin_gesture();
        h.record(snap(&[1.0]));
        h.record(snap(&[2.0]));
        h.record(snap(&[3.0]));
        assert!(h.end_gesture());

        assert_eq!(h.len(), 2);
        assert_eq!(h.current().unwrap()[0].frame.x, 3.0);
        assert_eq!(h.undo().map(Vec::len), Some(0));
    }

    #[test]
    fn empty_gesture_records_nothing() {
        let mut h = History::with_baseline(vec![], 0);
        h.begin_gesture();
        assert!(!h.end_gesture());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn standalone_record_splits_gesture() {
        let mut h = History::with_baseline(vec![], 0);
        h.begin_gesture();
        h.record(snap(&[1.0]));
        h.record(snap(&[2.0]));
        h.record_standalone(snap(&[]));
        h.record(snap(&[3.0]));
        h.record(snap(&[4.0]));
        assert!(h.end_gesture());

        // baseline, [2.0], [], [4.0]
        assert_eq!(h.len(), 4);
        assert!(h.undo().unwrap().is_empty());
        assert_eq!(h.undo().unwrap()[0].frame.x, 2.0);
    }

    #[test]
    fn undo_inside_gesture_does_not_overwrite() {
        let mut h = History::with_baseline(vec![], 0);
        h.record(snap(&[1.0]));
        h.begin_gesture();
        h.record(snap(&[2.0]));
        h.undo();
        h.record(snap(&[5.0]));
        h.end_gesture();

        // baseline, [1.0], [5.0]
        assert_eq!(h.len(), 3);
        assert_eq!(h.undo().unwrap()[0].frame.x, 1.0);
    }
}
