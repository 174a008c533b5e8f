//! Layer types for tile, object and group layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cell::{Cell, FlipFlags, TileRef};
use crate::error::CoreError;

/// Read-only geometry query over a grid of cells.
///
/// Coordinates are tile coordinates with `y` growing downwards. Reads outside
/// the grid are empty.
pub trait MapView {
    fn cell_at(&self, x: i32, y: i32) -> Option<Cell>;

    fn tile_at(&self, x: i32, y: i32) -> Option<TileRef> {
        self.cell_at(x, y).map(|cell| cell.tile)
    }

    fn flags_at(&self, x: i32, y: i32) -> FlipFlags {
        self.cell_at(x, y).map(|cell| cell.flags).unwrap_or_default()
    }
}

/// Axis-aligned rectangle in tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both corner cells
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let min_x = a.0.min(b.0);
        let min_y = a.1.min(b.1);
        let max_x = a.0.max(b.0);
        let max_y = a.1.max(b.1);
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let rect = *self;
        (rect.y..rect.bottom()).flat_map(move |y| (rect.x..rect.right()).map(move |x| (x, y)))
    }
}

/// A grid of optional cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTileLayer")]
pub struct TileLayer {
    pub width: u32,
    pub height: u32,
    cells: Vec<Option<Cell>>,
}

/// Tile layer as stored, before the cell count is checked
#[derive(Deserialize)]
struct RawTileLayer {
    width: u32,
    height: u32,
    cells: Vec<Option<Cell>>,
}

impl TryFrom<RawTileLayer> for TileLayer {
    type Error = CoreError;

    fn try_from(raw: RawTileLayer) -> Result<Self, Self::Error> {
        let expected = raw.width as usize * raw.height as usize;
        if raw.cells.len() != expected {
            return Err(CoreError::CellCountMismatch {
                width: raw.width,
                height: raw.height,
                expected,
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            cells: raw.cells,
        })
    }
}

impl TileLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Replace a cell, returning the previous contents, or `None` if out of bounds
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Option<Cell>) -> Option<Option<Cell>> {
        let idx = self.index(x, y)?;
        let slot = self.cells.get_mut(idx)?;
        Some(std::mem::replace(slot, cell))
    }

    /// Iterate all non-empty cells as (x, y, cell)
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            let idx = idx as u32;
            cell.map(|c| ((idx % width) as i32, (idx / width) as i32, c))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Occupied area as horizontal runs of filled cells, one rectangle per run
    pub fn region(&self) -> Vec<Rect> {
        let mut rects = Vec::new();
        for y in 0..self.height as i32 {
            let mut run_start: Option<i32> = None;
            for x in 0..=self.width as i32 {
                let filled = self.cell_at(x, y).is_some();
                match (filled, run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        rects.push(Rect::new(start, y, (x - start) as u32, 1));
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
        rects
    }

    /// Bounding rectangle of the occupied area
    pub fn bounds(&self) -> Option<Rect> {
        let mut cells = self.iter_cells();
        let (x, y, _) = cells.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
        for (x, y, _) in cells {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Rect::from_corners((min_x, min_y), (max_x, max_y)))
    }

    /// Tilesets referenced by this layer, in order of first use
    pub fn used_tilesets(&self) -> Vec<Uuid> {
        let mut used = Vec::new();
        for (_, _, cell) in self.iter_cells() {
            if !used.contains(&cell.tile.tileset_id) {
                used.push(cell.tile.tileset_id);
            }
        }
        used
    }
}

impl MapView for TileLayer {
    fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y)
            .and_then(|idx| self.cells.get(idx).copied().flatten())
    }
}

/// A layer (tiles, objects or a group of layers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    pub data: LayerData,
}

impl Layer {
    /// Create a new empty tile layer
    pub fn new_tile_layer(name: String, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            visible: true,
            data: LayerData::Tiles(TileLayer::new(width, height)),
        }
    }

    /// Create a new object layer
    pub fn new_object_layer(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            visible: true,
            data: LayerData::Objects {
                entities: Vec::new(),
            },
        }
    }

    /// Create a group layer holding `layers`, bottom-most first
    pub fn new_group(name: String, layers: Vec<Layer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            visible: true,
            data: LayerData::Group { layers },
        }
    }

    /// Get the type of this layer
    pub fn layer_type(&self) -> LayerType {
        match &self.data {
            LayerData::Tiles(_) => LayerType::Tiles,
            LayerData::Objects { .. } => LayerType::Objects,
            LayerData::Group { .. } => LayerType::Group,
        }
    }

    pub fn is_tile_layer(&self) -> bool {
        matches!(self.data, LayerData::Tiles(_))
    }

    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match &self.data {
            LayerData::Tiles(tiles) => Some(tiles),
            _ => None,
        }
    }

    pub fn as_tile_layer_mut(&mut self) -> Option<&mut TileLayer> {
        match &mut self.data {
            LayerData::Tiles(tiles) => Some(tiles),
            _ => None,
        }
    }

    /// Child layers of a group; empty for other layer types
    pub fn children(&self) -> &[Layer] {
        match &self.data {
            LayerData::Group { layers } => layers,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Layer>> {
        match &mut self.data {
            LayerData::Group { layers } => Some(layers),
            _ => None,
        }
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Tiles,
    Objects,
    Group,
}

/// The data contained in a layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerData {
    /// Tile layer
    Tiles(TileLayer),
    /// Object layer containing entity references
    Objects {
        /// Entity IDs placed on this layer
        entities: Vec<Uuid>,
    },
    /// Nested layers, bottom-most first
    Group { layers: Vec<Layer> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: u32) -> Cell {
        Cell::new(TileRef::new(Uuid::nil(), id))
    }

    #[test]
    fn test_new_tile_layer() {
        let layer = Layer::new_tile_layer("Ground".to_string(), 10, 10);

        assert_eq!(layer.name, "Ground");
        assert!(layer.visible);
        assert_eq!(layer.layer_type(), LayerType::Tiles);

        let tiles = layer.as_tile_layer().expect("Expected tile layer");
        assert!(tiles.is_empty());
        assert_eq!(tiles.region(), Vec::new());
        assert_eq!(tiles.bounds(), None);
    }

    #[test]
    fn test_deserialize_rejects_wrong_cell_count() {
        let json = r#"{"width":4,"height":4,"cells":[null]}"#;
        let err = serde_json::from_str::<TileLayer>(json).unwrap_err();
        assert!(err.to_string().contains("needs 16 cells, found 1"));

        let layer = TileLayer::new(2, 2);
        let json = serde_json::to_string(&layer).unwrap();
        assert_eq!(serde_json::from_str::<TileLayer>(&json).unwrap(), layer);
    }

    #[test]
    fn test_new_object_layer() {
        let layer = Layer::new_object_layer("Entities".to_string());

        assert_eq!(layer.name, "Entities");
        assert!(layer.visible);
        assert_eq!(layer.layer_type(), LayerType::Objects);
        assert!(layer.as_tile_layer().is_none());
    }

    #[test]
    fn test_out_of_bounds_reads_are_empty() {
        let mut layer = TileLayer::new(2, 2);
        assert_eq!(layer.set_cell(0, 0, Some(tile(1))), Some(None));
        assert_eq!(layer.set_cell(2, 0, Some(tile(1))), None);

        assert_eq!(layer.tile_at(0, 0), Some(TileRef::new(Uuid::nil(), 1)));
        assert_eq!(layer.tile_at(-1, 0), None);
        assert_eq!(layer.flags_at(5, 5), FlipFlags::NONE);
    }

    #[test]
    fn test_region_and_bounds() {
        let mut layer = TileLayer::new(5, 3);
        layer.set_cell(1, 0, Some(tile(0)));
        layer.set_cell(2, 0, Some(tile(0)));
        layer.set_cell(4, 2, Some(tile(0)));

        assert_eq!(
            layer.region(),
            vec![Rect::new(1, 0, 2, 1), Rect::new(4, 2, 1, 1)]
        );
        assert_eq!(layer.bounds(), Some(Rect::new(1, 0, 4, 3)));
    }

    #[test]
    fn test_rect_from_corners_is_order_independent() {
        let a = Rect::from_corners((3, 1), (0, 4));
        let b = Rect::from_corners((0, 4), (3, 1));
        assert_eq!(a, b);
        assert_eq!(a, Rect::new(0, 1, 4, 4));
        assert_eq!(a.cells().count(), 16);
        assert!(a.contains(3, 4));
        assert!(!a.contains(4, 4));
    }

    #[test]
    fn test_used_tilesets_in_first_use_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut layer = TileLayer::new(3, 1);
        layer.set_cell(0, 0, Some(Cell::new(TileRef::new(second, 0))));
        layer.set_cell(1, 0, Some(Cell::new(TileRef::new(first, 0))));
        layer.set_cell(2, 0, Some(Cell::new(TileRef::new(second, 1))));
        assert_eq!(layer.used_tilesets(), vec![second, first]);
    }
}
