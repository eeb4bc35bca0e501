//! Bounded undo history for slides.

use std::collections::VecDeque;

use tilewalk_core::CellCoord;

/// Record of a single slide, kept so it can be reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UndoRecord {
    /// Cell the tile occupied before the slide.
    pub origin: CellCoord,
    /// Cell the tile moved into.
    pub destination: CellCoord,
}

/// Ring of the most recent slides. Pushing past capacity drops the oldest.
#[derive(Clone, Debug)]
pub(crate) struct UndoHistory {
    records: VecDeque<UndoRecord>,
    capacity: usize,
}

impl UndoHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, record: UndoRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            let _ = self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub(crate) fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &UndoRecord> + '_ {
        self.records.iter()
    }
}
