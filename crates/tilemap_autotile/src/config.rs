//! Autotile configuration and terrain selection
//!
//! This module contains the registry of terrain sets and the brush that
//! tracks which terrain the user has selected.

use crate::terrain::TerrainSet;
use serde::{Deserialize, Serialize};
use tilemap_core::TileRef;
use uuid::Uuid;

/// Configuration for autotiling in a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutotileConfig {
    /// All terrain sets defined in the project
    pub terrain_sets: Vec<TerrainSet>,
}

impl AutotileConfig {
    pub fn new() -> Self {
        Self {
            terrain_sets: Vec::new(),
        }
    }

    /// Add a terrain set
    pub fn add_terrain_set(&mut self, terrain_set: TerrainSet) {
        self.terrain_sets.push(terrain_set);
    }

    /// Get terrain set by ID
    pub fn get_terrain_set(&self, id: Uuid) -> Option<&TerrainSet> {
        self.terrain_sets.iter().find(|ts| ts.id == id)
    }

    /// Get mutable terrain set by ID
    pub fn get_terrain_set_mut(&mut self, id: Uuid) -> Option<&mut TerrainSet> {
        self.terrain_sets.iter_mut().find(|ts| ts.id == id)
    }

    /// Remove terrain set by ID
    pub fn remove_terrain_set(&mut self, id: Uuid) -> Option<TerrainSet> {
        let pos = self.terrain_sets.iter().position(|ts| ts.id == id)?;
        Some(self.terrain_sets.remove(pos))
    }

    /// Get all terrain sets for a specific tileset
    pub fn get_terrain_sets_for_tileset(&self, tileset_id: Uuid) -> Vec<&TerrainSet> {
        self.terrain_sets
            .iter()
            .filter(|ts| ts.tileset_id == tileset_id)
            .collect()
    }

    /// Terrain of a tile: the first set of its tileset labelling it, and the
    /// first nonzero label clockwise from Top
    pub fn terrain_from_tile(&self, tile: TileRef) -> Option<(Uuid, u32)> {
        self.get_terrain_sets_for_tileset(tile.tileset_id)
            .into_iter()
            .find_map(|set| set.first_color_of(tile).map(|color| (set.id, color)))
    }
}

/// Terrain brush state: what the host currently has selected
#[derive(Debug, Clone, Default)]
pub struct TerrainBrush {
    /// Currently selected terrain set ID
    pub selected_terrain_set: Option<Uuid>,
    /// Currently selected color within the set (1-based, 0 erases)
    pub selected_color: Option<u32>,
    /// Currently selected tile, used when no terrain is selected
    pub selected_tile: Option<TileRef>,
    /// Whether terrain painting mode is active
    pub active: bool,
}

impl TerrainBrush {
    pub fn new() -> Self {
        Self {
            selected_terrain_set: None,
            selected_color: None,
            selected_tile: None,
            active: false,
        }
    }

    pub fn select(&mut self, terrain_set_id: Uuid, color: u32) {
        self.selected_terrain_set = Some(terrain_set_id);
        self.selected_color = Some(color);
        self.active = true;
    }

    /// Change only the color, keeping the terrain set
    pub fn select_color(&mut self, color: u32) {
        if self.selected_terrain_set.is_some() {
            self.selected_color = Some(color);
        }
    }

    pub fn select_tile(&mut self, tile: TileRef) {
        self.selected_tile = Some(tile);
    }

    pub fn deselect(&mut self) {
        self.selected_terrain_set = None;
        self.selected_color = None;
        self.active = false;
    }

    /// The (terrain set, color) to paint with.
    ///
    /// An explicit selection with a nonzero color wins; otherwise the terrain
    /// is taken from the selected tile.
    pub fn resolve(&self, config: &AutotileConfig) -> Option<(Uuid, u32)> {
        if let (Some(set_id), Some(color)) = (self.selected_terrain_set, self.selected_color) {
            if color > 0 && config.get_terrain_set(set_id).is_some() {
                return Some((set_id, color));
            }
        }
        self.selected_tile
            .and_then(|tile| config.terrain_from_tile(tile))
    }
}
