//! Terrain types and data structures
//!
//! This module contains the core terrain types used for autotiling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tilemap_core::TileRef;
use uuid::Uuid;

use crate::wang_id::{SlotMask, WangId};

/// Simple RGBA color for terrain visualization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Type of terrain set - determines which label positions are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainSetType {
    /// 4 corners per tile (TL, TR, BL, BR)
    /// Good for basic terrain transitions
    #[default]
    Corner,
    /// 4 edges per tile (Top, Right, Bottom, Left)
    /// Good for roads, platforms, paths
    Edge,
    /// 4 corners + 4 edges per tile
    /// Most flexible, requires more tiles
    Mixed,
}

impl TerrainSetType {
    /// Label positions compared when matching tiles of this type
    pub const fn slot_mask(self) -> SlotMask {
        match self {
            TerrainSetType::Corner => SlotMask::CORNERS,
            TerrainSetType::Edge => SlotMask::EDGES,
            TerrainSetType::Mixed => SlotMask::ALL,
        }
    }

    /// Get the number of positions used by this terrain set type
    pub fn position_count(self) -> usize {
        self.slot_mask().len() as usize
    }

    /// Classify a Mixed set by where a color is actually used
    pub fn from_usage(uses_edges: bool, uses_corners: bool) -> Self {
        if uses_corners == uses_edges {
            TerrainSetType::Mixed
        } else if uses_corners {
            TerrainSetType::Corner
        } else {
            TerrainSetType::Edge
        }
    }
}

/// A terrain color within a set (e.g., "Grass", "Dirt", "Water")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub id: Uuid,
    pub name: String,
    /// Display color for UI visualization
    pub color: Color,
}

impl Terrain {
    pub fn new(name: String, color: Color) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            color,
        }
    }
}

/// A terrain set attached to a tileset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSet {
    pub id: Uuid,
    pub name: String,
    /// Which tileset this terrain set belongs to
    pub tileset_id: Uuid,
    /// Type of terrain matching (Corner, Edge, or Mixed)
    pub set_type: TerrainSetType,
    /// Terrain colors; color index `i` refers to `terrains[i - 1]`, index 0 is "none"
    pub terrains: Vec<Terrain>,
    /// Labels for each tile (tile_id -> WangId)
    pub tile_wang_ids: HashMap<u32, WangId>,
}

impl TerrainSet {
    pub fn new(name: String, tileset_id: Uuid, set_type: TerrainSetType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tileset_id,
            set_type,
            terrains: Vec::new(),
            tile_wang_ids: HashMap::new(),
        }
    }

    /// Add a new terrain color to this set, returning its 1-based index
    pub fn add_terrain(&mut self, name: String, color: Color) -> u32 {
        self.terrains.push(Terrain::new(name, color));
        self.terrains.len() as u32
    }

    /// Remove a terrain color by index
    pub fn remove_terrain(&mut self, color_index: u32) -> Option<Terrain> {
        if color_index == 0 || color_index as usize > self.terrains.len() {
            return None;
        }
        // Clear labels of the removed color and shift later colors down
        for wang_id in self.tile_wang_ids.values_mut() {
            for color in wang_id.colors.iter_mut() {
                if *color == color_index {
                    *color = 0;
                } else if *color > color_index {
                    *color -= 1;
                }
            }
        }
        self.tile_wang_ids.retain(|_, wang_id| !wang_id.is_empty());
        Some(self.terrains.remove(color_index as usize - 1))
    }

    pub fn color_count(&self) -> u32 {
        self.terrains.len() as u32
    }

    pub fn terrain(&self, color_index: u32) -> Option<&Terrain> {
        let index = (color_index as usize).checked_sub(1)?;
        self.terrains.get(index)
    }

    /// Name of a color; empty for index 0 or unknown colors
    pub fn color_name(&self, color_index: u32) -> &str {
        self.terrain(color_index)
            .map(|t| t.name.as_str())
            .unwrap_or_default()
    }

    /// Get color index by name
    pub fn get_terrain_index(&self, name: &str) -> Option<u32> {
        self.terrains
            .iter()
            .position(|t| t.name == name)
            .map(|i| i as u32 + 1)
    }

    /// Label a tile; an all-zero id removes the tile's labels
    pub fn set_wang_id(&mut self, tile_id: u32, wang_id: WangId) {
        if wang_id.is_empty() {
            self.tile_wang_ids.remove(&tile_id);
        } else {
            self.tile_wang_ids.insert(tile_id, wang_id);
        }
    }

    pub fn wang_id_for(&self, tile_id: u32) -> Option<WangId> {
        self.tile_wang_ids.get(&tile_id).copied()
    }

    /// Labels of a tile, or `None` if the tile is unlabeled or belongs to another tileset
    pub fn wang_id(&self, tile: TileRef) -> Option<WangId> {
        if tile.tileset_id != self.tileset_id {
            return None;
        }
        self.wang_id_for(tile.tile_id)
    }

    /// Labeled tile ids in ascending order
    pub fn labeled_tiles(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.tile_wang_ids.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.tile_wang_ids.is_empty()
    }

    /// How a color behaves when painted.
    ///
    /// Mixed sets whose tiles only use the color on corners (or only on
    /// edges) behave like Corner (or Edge) sets for that color.
    pub fn effective_type_for_color(&self, color_index: u32) -> TerrainSetType {
        if self.set_type != TerrainSetType::Mixed {
            return self.set_type;
        }
        let mut uses_edges = false;
        let mut uses_corners = false;
        for wang_id in self.tile_wang_ids.values() {
            uses_edges |= wang_id.has_color_in(color_index, SlotMask::EDGES);
            uses_corners |= wang_id.has_color_in(color_index, SlotMask::CORNERS);
        }
        TerrainSetType::from_usage(uses_edges, uses_corners)
    }

    /// Find all tiles filled with one color (useful for finding "fill" tiles)
    pub fn find_uniform_tiles(&self, color_index: u32) -> Vec<u32> {
        let mask = self.set_type.slot_mask();
        let mut tiles: Vec<u32> = self
            .tile_wang_ids
            .iter()
            .filter_map(|(&tile_id, wang_id)| {
                (wang_id.uniform_color(mask) == Some(color_index)).then_some(tile_id)
            })
            .collect();
        tiles.sort_unstable();
        tiles
    }

    /// First color found on a tile, clockwise from Top, ignoring the set type
    pub fn first_color_of(&self, tile: TileRef) -> Option<u32> {
        self.wang_id(tile)?.colors.into_iter().find(|&c| c > 0)
    }
}
