use anyhow::Result;

use crate::surface::{DrawingSurface, Snapshot};

/// Whole-canvas undo/redo history.
///
/// The undo stack is seeded with the surface it was created from and never
/// drops below that entry, so its top always mirrors the last committed
/// canvas.
pub struct SnapshotHistory {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(surface: &DrawingSurface) -> Self {
        Self {
            undo: vec![surface.snapshot()],
            redo: Vec::new(),
        }
    }

    /// Commits the current surface. Returns `false` when it is identical to
    /// the last committed state and nothing was recorded.
    pub fn save_state(&mut self, surface: &DrawingSurface) -> bool {
        let snapshot = surface.snapshot();
        if self.undo.last() == Some(&snapshot) {
            return false;
        }
        self.undo.push(snapshot);
        self.redo.clear();
        tracing::debug!(depth = self.undo.len(), "committed canvas state");
        true
    }

    /// The stacks only move once the surface has been restored.
    pub fn undo(&mut self, surface: &mut DrawingSurface) -> Result<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        let previous = &self.undo[self.undo.len() - 2];
        surface.restore(previous)?;
        if let Some(top) = self.undo.pop() {
            self.redo.push(top);
        }
        Ok(true)
    }

    pub fn redo(&mut self, surface: &mut DrawingSurface) -> Result<bool> {
        let Some(next) = self.redo.last() else {
            return Ok(false);
        };
        surface.restore(next)?;
        if let Some(snapshot) = self.redo.pop() {
            self.undo.push(snapshot);
        }
        Ok(true)
    }

    /// Blanks the surface and commits the result.
    pub fn clear(&mut self, surface: &mut DrawingSurface) -> bool {
        surface.clear();
        self.save_state(surface)
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
