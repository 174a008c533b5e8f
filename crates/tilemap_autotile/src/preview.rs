//! Uncommitted tile placements of a stroke

use std::collections::BTreeMap;
use tilemap_core::{Cell, LayerEdit, MapView, TileChange, TileLayer};

/// Tiles placed by the current stroke, not yet written to the map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preview {
    cells: BTreeMap<(i32, i32), Cell>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        self.cells.insert((x, y), cell);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.cells.get(&(x, y)).copied()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.cells.contains_key(&(x, y))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Placements in row order
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), Cell)> + '_ {
        let mut cells: Vec<_> = self.cells.iter().map(|(&pos, &cell)| (pos, cell)).collect();
        cells.sort_by_key(|&((x, y), _)| (y, x));
        cells.into_iter()
    }

    /// Overwrite with the placements of a later preview
    pub fn merge(&mut self, other: Preview) {
        self.cells.extend(other.cells);
    }

    /// Write every placement into `layer` in one edit session
    pub fn commit(&self, layer: &mut TileLayer) -> Vec<TileChange> {
        let mut edit = LayerEdit::new(layer);
        for ((x, y), cell) in self.iter() {
            edit.set_tile(x, y, Some(cell));
        }
        edit.apply()
    }
}

/// A map view with a preview laid over it
pub struct PreviewOverlay<'a, V: MapView + ?Sized> {
    base: &'a V,
    preview: &'a Preview,
}

impl<'a, V: MapView + ?Sized> PreviewOverlay<'a, V> {
    pub fn new(base: &'a V, preview: &'a Preview) -> Self {
        Self { base, preview }
    }
}

impl<V: MapView + ?Sized> MapView for PreviewOverlay<'_, V> {
    fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.preview.get(x, y).or_else(|| self.base.cell_at(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::TileRef;
    use uuid::Uuid;

    fn cell(id: u32) -> Cell {
        Cell::new(TileRef::new(Uuid::nil(), id))
    }

    #[test]
    fn test_overlay_prefers_preview() {
        let mut layer = TileLayer::new(2, 1);
        layer.set_cell(0, 0, Some(cell(1)));
        layer.set_cell(1, 0, Some(cell(2)));
        let mut preview = Preview::new();
        preview.set(1, 0, cell(9));

        let overlay = PreviewOverlay::new(&layer, &preview);
        assert_eq!(overlay.cell_at(0, 0), Some(cell(1)));
        assert_eq!(overlay.cell_at(1, 0), Some(cell(9)));
    }

    #[test]
    fn test_commit_skips_out_of_bounds() {
        let mut layer = TileLayer::new(2, 2);
        let mut preview = Preview::new();
        preview.set(1, 1, cell(3));
        preview.set(0, 0, cell(4));
        preview.set(5, 5, cell(5));

        let changes = preview.commit(&mut layer);
        assert_eq!(changes.len(), 2);
        assert_eq!((changes[0].x, changes[0].y), (0, 0));
        assert_eq!(layer.cell_at(1, 1), Some(cell(3)));
    }
}
