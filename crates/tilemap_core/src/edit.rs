//! Scoped edits of a tile layer
//!
//! A `LayerEdit` buffers cell writes and applies them together. Dropping the
//! session without calling [`LayerEdit::apply`] leaves the layer untouched.

use std::collections::HashMap;

use crate::cell::Cell;
use crate::layer::{MapView, TileLayer};

/// A single cell change, recorded so it can be undone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChange {
    pub x: i32,
    pub y: i32,
    pub old: Option<Cell>,
    pub new: Option<Cell>,
}

impl TileChange {
    /// The change that reverts this one
    pub fn reversed(&self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            old: self.new,
            new: self.old,
        }
    }
}

/// Buffered write session over a tile layer
pub struct LayerEdit<'a> {
    layer: &'a mut TileLayer,
    pending: HashMap<(i32, i32), Option<Cell>>,
}

impl<'a> LayerEdit<'a> {
    pub fn new(layer: &'a mut TileLayer) -> Self {
        Self {
            layer,
            pending: HashMap::new(),
        }
    }

    /// Queue a write; returns false if the position is outside the layer
    pub fn set_tile(&mut self, x: i32, y: i32, cell: Option<Cell>) -> bool {
        if !self.layer.in_bounds(x, y) {
            return false;
        }
        self.pending.insert((x, y), cell);
        true
    }

    pub fn erase(&mut self, x: i32, y: i32) -> bool {
        self.set_tile(x, y, None)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Write every queued cell and return the changes that took effect,
    /// sorted by row then column
    pub fn apply(self) -> Vec<TileChange> {
        let mut positions: Vec<(i32, i32)> = self.pending.keys().copied().collect();
        positions.sort_by_key(|&(x, y)| (y, x));

        let mut changes = Vec::new();
        for (x, y) in positions {
            let new = self.pending[&(x, y)];
            if self.layer.cell_at(x, y) == new {
                continue;
            }
            if let Some(old) = self.layer.set_cell(x, y, new) {
                changes.push(TileChange { x, y, old, new });
            }
        }
        changes
    }
}

impl MapView for LayerEdit<'_> {
    /// Reads see queued writes
    fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        match self.pending.get(&(x, y)) {
            Some(cell) => *cell,
            None => self.layer.cell_at(x, y),
        }
    }
}

/// Write a batch of changes without buffering
pub fn apply_changes(layer: &mut TileLayer, changes: &[TileChange]) {
    for change in changes {
        layer.set_cell(change.x, change.y, change.new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TileRef;
    use uuid::Uuid;

    fn cell(id: u32) -> Option<Cell> {
        Some(Cell::new(TileRef::new(Uuid::nil(), id)))
    }

    #[test]
    fn test_dropped_edit_discards() {
        let mut layer = TileLayer::new(3, 3);
        {
            let mut edit = LayerEdit::new(&mut layer);
            edit.set_tile(1, 1, cell(4));
            assert_eq!(edit.cell_at(1, 1), cell(4));
        }
        assert!(layer.is_empty());
    }

    #[test]
    fn test_apply_reports_sorted_changes() {
        let mut layer = TileLayer::new(3, 3);
        layer.set_cell(0, 0, cell(1));

        let mut edit = LayerEdit::new(&mut layer);
        edit.set_tile(2, 1, cell(2));
        edit.set_tile(0, 0, cell(1));
        edit.set_tile(1, 0, cell(3));
        assert!(!edit.set_tile(3, 0, cell(3)));
        let changes = edit.apply();

        // (0, 0) already held tile 1, so it is not a change
        assert_eq!(
            changes,
            vec![
                TileChange {
                    x: 1,
                    y: 0,
                    old: None,
                    new: cell(3)
                },
                TileChange {
                    x: 2,
                    y: 1,
                    old: None,
                    new: cell(2)
                },
            ]
        );

        let undo: Vec<TileChange> = changes.iter().rev().map(TileChange::reversed).collect();
        apply_changes(&mut layer, &undo);
        assert_eq!(layer.tile_at(1, 0), None);
        assert_eq!(layer.tile_at(0, 0), cell(1).map(|c| c.tile));
    }
}
