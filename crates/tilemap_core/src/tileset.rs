//! Tileset configuration with per-tile probability and properties

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::cell::TileRef;

fn default_probability() -> f32 {
    1.0
}

/// A single tile within a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    /// Relative chance of being picked among equally valid tiles
    #[serde(default = "default_probability")]
    pub probability: f32,
    /// Custom user-defined properties
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Tile {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            probability: default_probability(),
            properties: HashMap::new(),
        }
    }

    /// Set the probability for this tile
    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability.max(0.0);
        self
    }

    /// Set a custom property
    pub fn with_property(mut self, key: String, value: serde_json::Value) -> Self {
        self.properties.insert(key, value);
        self
    }
}

/// The image (or rendered map) a tileset slices its tiles from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Path to the image file; for metatilesets this is the source map
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Tileset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
    /// Tiles indexed by id. Hosts may leave gaps, which are `None`.
    #[serde(default)]
    pub tiles: Vec<Option<Tile>>,
}

impl Tileset {
    /// Create a new empty tileset without an image
    pub fn new(name: String, tile_width: u32, tile_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tile_width,
            tile_height,
            image: None,
            margin: 0,
            spacing: 0,
            tiles: Vec::new(),
        }
    }

    /// Create an image-based tileset with `columns * rows` tiles
    pub fn with_grid(
        name: String,
        path: String,
        tile_width: u32,
        tile_height: u32,
        columns: u32,
        rows: u32,
    ) -> Self {
        let mut tileset = Self::new(name, tile_width, tile_height);
        tileset.image = Some(TilesetImage {
            path,
            width: columns * tile_width,
            height: rows * tile_height,
        });
        tileset.tiles = (0..columns * rows).map(|id| Some(Tile::new(id))).collect();
        tileset
    }

    /// Handle for the tile with the given id in this tileset
    pub fn tile_ref(&self, tile_id: u32) -> TileRef {
        TileRef::new(self.id, tile_id)
    }

    /// Whether a handle refers to an existing tile of this tileset
    pub fn contains(&self, tile: TileRef) -> bool {
        tile.tileset_id == self.id && self.tile(tile.tile_id).is_some()
    }

    pub fn tile(&self, tile_id: u32) -> Option<&Tile> {
        self.tiles.get(tile_id as usize).and_then(Option::as_ref)
    }

    /// Get mutable tile, creating it (and any gap before it) if it doesn't exist
    pub fn tile_mut(&mut self, tile_id: u32) -> &mut Tile {
        let index = tile_id as usize;
        if index >= self.tiles.len() {
            self.tiles.resize(index + 1, None);
        }
        self.tiles[index].get_or_insert_with(|| Tile::new(tile_id))
    }

    /// Remove a tile, leaving a gap in the id sequence
    pub fn remove_tile(&mut self, tile_id: u32) -> Option<Tile> {
        self.tiles.get_mut(tile_id as usize).and_then(Option::take)
    }

    /// Probability of a tile; missing tiles are never picked
    pub fn probability(&self, tile_id: u32) -> f32 {
        self.tile(tile_id).map(|t| t.probability).unwrap_or(0.0)
    }

    /// Iterate the existing tiles, skipping gaps
    pub fn iter_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// Number of id slots, including gaps
    pub fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    /// Number of tile columns in the image
    pub fn columns(&self) -> u32 {
        let Some(image) = &self.image else {
            return 0;
        };
        let stride = self.tile_width + self.spacing;
        if stride == 0 {
            return 0;
        }
        (image.width + self.spacing).saturating_sub(self.margin) / stride
    }

    /// Convert a tile id to its (column, row) within the image
    pub fn tile_grid_position(&self, tile_id: u32) -> Option<(u32, u32)> {
        let columns = self.columns();
        if columns == 0 {
            return None;
        }
        Some((tile_id % columns, tile_id / columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_tileset() {
        let tileset = Tileset::with_grid("Test".to_string(), "tiles.png".to_string(), 16, 16, 4, 3);

        assert_eq!(tileset.tile_count(), 12);
        assert_eq!(tileset.columns(), 4);
        assert_eq!(tileset.tile_grid_position(5), Some((1, 1)));
        assert!(tileset.contains(tileset.tile_ref(11)));
        assert!(!tileset.contains(tileset.tile_ref(12)));
    }

    #[test]
    fn test_columns_with_margin_and_spacing() {
        let mut tileset = Tileset::new("Spaced".to_string(), 16, 16);
        tileset.margin = 1;
        tileset.spacing = 2;
        // 1 + 16 + 2 + 16 + 2 + 16 + 1
        tileset.image = Some(TilesetImage {
            path: "spaced.png".to_string(),
            width: 54,
            height: 16,
        });
        assert_eq!(tileset.columns(), 3);
    }

    #[test]
    fn test_gaps_are_skipped() {
        let mut tileset = Tileset::new("Sparse".to_string(), 8, 8);
        tileset.tile_mut(0);
        tileset.tile_mut(3).probability = 0.5;

        assert_eq!(tileset.tile_count(), 4);
        let ids: Vec<u32> = tileset.iter_tiles().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 3]);
        assert_eq!(tileset.probability(3), 0.5);
        assert_eq!(tileset.probability(1), 0.0);

        tileset.remove_tile(0);
        assert!(tileset.tile(0).is_none());
        assert_eq!(tileset.tile_count(), 4);
    }

    #[test]
    fn test_tile_handle_from_other_tileset() {
        let a = Tileset::with_grid("A".to_string(), "a.png".to_string(), 8, 8, 2, 2);
        let b = Tileset::with_grid("B".to_string(), "b.png".to_string(), 8, 8, 2, 2);
        assert!(!a.contains(b.tile_ref(0)));
    }
}
