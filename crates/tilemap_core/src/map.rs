//! A map: dimensions plus a tree of layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::layer::{Layer, TileLayer};
use crate::walk::{find_layer_path, find_layers, WalkMode};

/// A complete map with its layer tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    pub id: Uuid,
    pub name: String,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Root layers, bottom-most first
    pub layers: Vec<Layer>,
}

impl TileMap {
    pub fn new(name: String, width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            width,
            height,
            tile_width,
            tile_height,
            layers: Vec::new(),
        }
    }

    /// Append a layer on top, returning its id
    pub fn add_layer(&mut self, layer: Layer) -> Uuid {
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Append an empty tile layer sized to the map
    pub fn add_tile_layer(&mut self, name: String) -> Uuid {
        self.add_layer(Layer::new_tile_layer(name, self.width, self.height))
    }

    pub fn layer(&self, id: Uuid) -> Option<&Layer> {
        find_layers(&self.layers, |l| l.id == id, WalkMode::First)
            .into_iter()
            .next()
    }

    pub fn layer_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        let path = find_layer_path(&self.layers, id)?;
        let (first, rest) = path.split_first()?;
        let mut layer = self.layers.get_mut(*first)?;
        for &index in rest {
            layer = layer.children_mut()?.get_mut(index)?;
        }
        Some(layer)
    }

    /// The bottom-most tile layer anywhere in the tree
    pub fn bottom_tile_layer(&self) -> Option<&Layer> {
        find_layers(&self.layers, Layer::is_tile_layer, WalkMode::First)
            .into_iter()
            .next()
    }

    pub fn tile_layer(&self, id: Uuid) -> Result<&TileLayer, CoreError> {
        let layer = self.layer(id).ok_or(CoreError::UnknownLayer(id))?;
        layer
            .as_tile_layer()
            .ok_or_else(|| CoreError::NotATileLayer(layer.name.clone()))
    }

    pub fn tile_layer_mut(&mut self, id: Uuid) -> Result<&mut TileLayer, CoreError> {
        let layer = self.layer_mut(id).ok_or(CoreError::UnknownLayer(id))?;
        let name = layer.name.clone();
        layer.as_tile_layer_mut().ok_or(CoreError::NotATileLayer(name))
    }

    /// Tilesets referenced by any tile layer, in order of first use
    pub fn used_tilesets(&self) -> Vec<Uuid> {
        let mut used = Vec::new();
        for layer in find_layers(&self.layers, Layer::is_tile_layer, WalkMode::All) {
            let Some(tiles) = layer.as_tile_layer() else {
                continue;
            };
            for id in tiles.used_tilesets() {
                if !used.contains(&id) {
                    used.push(id);
                }
            }
        }
        used
    }
}
