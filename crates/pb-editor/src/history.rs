//! Undo/Redo history of canvas snapshots.
//!
//! Every tracked mutation pushes the serialized canvas *after* the change,
//! so the entry on top of the undo stack always mirrors the live canvas and
//! the entry below it is the state one step back. The baseline snapshot
//! taken at start-up is never popped: undoing past it is a no-op.

/// Undo/redo stacks of serialized-canvas snapshots.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    /// Maximum undo depth (`None` = unbounded).
    max_depth: Option<usize>,
}

impl History {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.map(|d| d.max(1)),
        }
    }

    /// Record a snapshot of the current canvas. Clears redo unconditionally.
    pub fn save(&mut self, snapshot: String) {
        self.push_undo(snapshot);
        self.redo_stack.clear();
    }

    /// Step back. `current` is the live canvas serialization, kept for redo
    /// (it differs from the top entry when untracked moves happened since).
    /// Returns the snapshot to restore, or `None` at the oldest state.
    pub fn undo(&mut self, current: String) -> Option<&str> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        self.undo_stack.pop();
        self.redo_stack.push(current);
        self.undo_stack.last().map(String::as_str)
    }

    /// Step forward. `current` is the live canvas serialization; when
    /// untracked moves made it differ from the top entry it is recorded
    /// first, so undoing the redo brings it back. The restored snapshot
    /// becomes the new top. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, current: String) -> Option<&str> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.last() != Some(&current) {
            self.push_undo(current);
        }
        self.push_undo(next);
        self.undo_stack.last().map(String::as_str)
    }

    fn push_undo(&mut self, snapshot: String) {
        self.undo_stack.push(snapshot);
        if let Some(max) = self.max_depth
            && self.undo_stack.len() > max
        {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_entries(&self) -> &[String] {
        &self.undo_stack
    }

    pub fn redo_entries(&self) -> &[String] {
        &self.redo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
