//! Snapshot-based undo/redo history.
//!
//! Whole-buffer clones are pushed before every mutating command. Training
//! buffers are a handful of short lines, so coarse snapshots are cheaper than
//! any delta scheme would be to maintain. A new mutation always invalidates
//! the redo stack.

use core_text::Buffer;
use tracing::trace;

/// Maximum number of snapshots retained.
pub const UNDO_DEPTH_MAX: usize = 100;

#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Buffer>,
    redo_stack: Vec<Buffer>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Record the pre-mutation state. Clears the redo stack and trims the
    /// oldest snapshot once the bound is exceeded.
    pub fn snapshot(&mut self, buffer: &Buffer) {
        self.undo_stack.push(buffer.clone());
        if self.undo_stack.len() > UNDO_DEPTH_MAX {
            self.undo_stack.remove(0);
            trace!(target: "engine.undo", "undo_stack_trimmed");
        }
        self.redo_stack.clear();
        trace!(
            target: "engine.undo",
            undo_depth = self.undo_stack.len(),
            "snapshot_pushed"
        );
    }

    /// Swap the current state for the most recent snapshot. No-op on an empty
    /// stack.
    pub fn undo(&mut self, buffer: &mut Buffer) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(std::mem::replace(buffer, previous));
        trace!(
            target: "engine.undo",
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "undo_pop"
        );
        true
    }

    /// Inverse of [`History::undo`]. No-op on an empty stack.
    pub fn redo(&mut self, buffer: &mut Buffer) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(std::mem::replace(buffer, next));
        trace!(
            target: "engine.undo",
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "redo_pop"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_round_trip() {
        let mut history = History::new();
        let mut buf = Buffer::new("one");
        history.snapshot(&buf);
        buf.set_text("two");
        assert!(history.undo(&mut buf));
        assert_eq!(buf.text(), "one");
        assert!(history.redo(&mut buf));
        assert_eq!(buf.text(), "two");
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut history = History::new();
        let mut buf = Buffer::new("text");
        assert!(!history.undo(&mut buf));
        assert!(!history.redo(&mut buf));
        assert_eq!(buf.text(), "text");
    }

    #[test]
    fn new_snapshot_clears_redo() {
        let mut history = History::new();
        let mut buf = Buffer::new("a");
        history.snapshot(&buf);
        buf.set_text("b");
        history.undo(&mut buf);
        assert_eq!(history.redo_depth(), 1);
        history.snapshot(&buf);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn history_is_bounded() {
        let mut history = History::new();
        let buf = Buffer::new("x");
        for _ in 0..UNDO_DEPTH_MAX + 25 {
            history.snapshot(&buf);
        }
        assert_eq!(history.undo_depth(), UNDO_DEPTH_MAX);
    }
}
