use chrono::{DateTime, Utc};

use crate::state::data_model::Dataset;

/// Maximum retained snapshots; the oldest is evicted beyond this.
pub const HISTORY_CAP: usize = 50;

/// An immutable full-copy snapshot. Diff-based history is a deliberate
/// non-feature at editor-scale datasets.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub data: Dataset,
    pub timestamp: DateTime<Utc>,
}

/// Linear undo/redo buffer: an ordered snapshot list with a cursor. The
/// cursor always indexes a valid entry; undo/redo only move it.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Dataset) -> Self {
        Self {
            entries: vec![HistoryEntry {
                data: initial,
                timestamp: Utc::now(),
            }],
            cursor: 0,
        }
    }

    /// Discards any redo-able tail, appends a snapshot, and advances the
    /// cursor. At the cap the oldest entry is evicted instead, leaving the
    /// cursor on the new latest entry.
    pub fn push(&mut self, data: Dataset) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            data,
            timestamp: Utc::now(),
        });

        if self.entries.len() > HISTORY_CAP {
            self.entries.remove(0);
        } else {
            self.cursor += 1;
        }
    }

    /// Steps the cursor back and returns that entry's dataset; `None` at the
    /// oldest entry.
    pub fn undo(&mut self) -> Option<&Dataset> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor].data)
    }

    /// Steps the cursor forward and returns that entry's dataset; `None` at
    /// the latest entry.
    pub fn redo(&mut self) -> Option<&Dataset> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor].data)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Dataset {
        &self.entries[self.cursor].data
    }
}
