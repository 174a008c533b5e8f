//! The open document and the editor state around it

use serde::{Deserialize, Serialize};
use tilemap_autotile::{AutotileConfig, TerrainBrush, TerrainSet};
use tilemap_core::{TileMap, Tileset};
use uuid::Uuid;

use crate::commands::CommandHistory;

/// A map together with the tilesets and terrain sets it is edited with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub map: TileMap,
    pub tilesets: Vec<Tileset>,
    /// Terrain sets of every tileset in `tilesets`
    #[serde(default)]
    pub terrains: AutotileConfig,
    #[serde(skip)]
    pub dirty: bool,
}

impl Document {
    pub fn new(map: TileMap) -> Self {
        Self {
            version: 1,
            map,
            tilesets: Vec::new(),
            terrains: AutotileConfig::default(),
            dirty: false,
        }
    }

    /// Mark document as modified
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_tileset(&mut self, tileset: Tileset) -> Uuid {
        let id = tileset.id;
        self.tilesets.push(tileset);
        id
    }

    pub fn tileset(&self, id: Uuid) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.id == id)
    }

    pub fn tileset_mut(&mut self, id: Uuid) -> Option<&mut Tileset> {
        self.tilesets.iter_mut().find(|t| t.id == id)
    }

    /// A terrain set together with the tileset it labels
    pub fn terrain(&self, terrain_set_id: Uuid) -> Option<(&TerrainSet, &Tileset)> {
        let terrain_set = self.terrains.get_terrain_set(terrain_set_id)?;
        let tileset = self.tileset(terrain_set.tileset_id)?;
        Some((terrain_set, tileset))
    }
}

/// Everything the tools and actions read and write
#[derive(Default)]
pub struct EditorState {
    /// The open document; `None` when no map is open
    pub document: Option<Document>,
    pub history: CommandHistory,
    /// Current terrain selection
    pub brush: TerrainBrush,
    /// Layer the tools draw on
    pub selected_layer: Option<Uuid>,
    /// Tile ids selected in the tileset editor, in selection order
    pub selected_tiles: Vec<u32>,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    /// Undo the last command
    pub fn undo(&mut self) {
        if let Some(document) = self.document.as_mut() {
            self.history.undo(document);
        }
    }

    /// Redo the last undone command
    pub fn redo(&mut self) {
        if let Some(document) = self.document.as_mut() {
            self.history.redo(document);
        }
    }
}
