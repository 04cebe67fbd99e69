//! Bounded, linear undo/redo log of canvas snapshots.

use crate::canvas::Canvas;
use std::collections::VecDeque;

/// Maximum number of snapshots kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Immutable copy of the canvas at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    canvas: Canvas,
}

impl HistorySnapshot {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

/// Snapshot log with a cursor.
///
/// The cursor always points at the snapshot matching what is on screen.
/// Pushing after an undo discards the redo branch. When the log is full the
/// oldest snapshot is dropped.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistorySnapshot>,
    cursor: usize,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    /// Create an empty log. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    /// Record the canvas after a discrete change.
    ///
    /// Returns false (and records nothing) when the canvas equals the snapshot
    /// under the cursor, so repeated pushes of the same state are harmless.
    pub fn push(&mut self, canvas: &Canvas) -> bool {
        if self.current() == Some(canvas) {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(HistorySnapshot {
            canvas: canvas.clone(),
        });

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;

        log::debug!("History push: {}/{}", self.cursor + 1, self.entries.len());
        true
    }

    /// Step back. Returns the snapshot to restore, or None at the oldest entry.
    pub fn undo(&mut self) -> Option<&Canvas> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(HistorySnapshot::canvas)
    }

    /// Step forward. Returns the snapshot to restore, or None at the newest entry.
    pub fn redo(&mut self) -> Option<&Canvas> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(HistorySnapshot::canvas)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Canvas> {
        self.entries.get(self.cursor).map(HistorySnapshot::canvas)
    }

    /// Drop everything and start over with `baseline` as the only entry.
    pub fn reset(&mut self, baseline: &Canvas) {
        self.clear();
        self.push(baseline);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Index of the snapshot under the cursor, if any.
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.entries.iter()
    }
}
