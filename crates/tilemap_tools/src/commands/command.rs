//! Command pattern for undo/redo

use tilemap_autotile::{TerrainSet, WangId};
use tilemap_core::{apply_changes, TileChange};
use tracing::warn;
use uuid::Uuid;

use crate::document::Document;

/// A command that can be undone/redone
pub trait Command: Send + Sync {
    /// Execute the command (do/redo)
    fn execute(&self, document: &mut Document);
    /// Undo the command
    fn undo(&self, document: &mut Document);
    /// Get a description of the command
    fn description(&self) -> &str;
}

/// Command for batch tile changes (terrain strokes, fills, etc.)
pub struct BatchTileCommand {
    pub layer_id: Uuid,
    pub changes: Vec<TileChange>,
    description: String,
}

impl BatchTileCommand {
    pub fn new(layer_id: Uuid, changes: Vec<TileChange>, description: impl Into<String>) -> Self {
        Self {
            layer_id,
            changes,
            description: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl Command for BatchTileCommand {
    fn execute(&self, document: &mut Document) {
        match document.map.tile_layer_mut(self.layer_id) {
            Ok(layer) => apply_changes(layer, &self.changes),
            Err(err) => warn!("Cannot redo \"{}\": {}", self.description, err),
        }
    }

    fn undo(&self, document: &mut Document) {
        let reverted: Vec<TileChange> = self.changes.iter().rev().map(|c| c.reversed()).collect();
        match document.map.tile_layer_mut(self.layer_id) {
            Ok(layer) => apply_changes(layer, &reverted),
            Err(err) => warn!("Cannot undo \"{}\": {}", self.description, err),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Command adding new terrain sets, e.g. from an import
pub struct AddTerrainSetsCommand {
    pub terrain_sets: Vec<TerrainSet>,
    description: String,
}

impl AddTerrainSetsCommand {
    pub fn new(terrain_sets: Vec<TerrainSet>, description: impl Into<String>) -> Self {
        Self {
            terrain_sets,
            description: description.into(),
        }
    }
}

impl Command for AddTerrainSetsCommand {
    fn execute(&self, document: &mut Document) {
        for set in &self.terrain_sets {
            if document.terrains.get_terrain_set(set.id).is_none() {
                document.terrains.add_terrain_set(set.clone());
            }
        }
    }

    fn undo(&self, document: &mut Document) {
        for set in &self.terrain_sets {
            document.terrains.remove_terrain_set(set.id);
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Command relabelling tiles of one terrain set.
///
/// Changes are `(tile_id, old, new)`; an empty id means unlabelled.
pub struct SetWangIdsCommand {
    pub terrain_set_id: Uuid,
    pub changes: Vec<(u32, WangId, WangId)>,
    description: String,
}

impl SetWangIdsCommand {
    /// Build from the new labels, reading the old ones from `terrain_set`.
    /// Tiles whose labels do not change are left out.
    pub fn from_new_labels(
        terrain_set: &TerrainSet,
        labels: impl IntoIterator<Item = (u32, WangId)>,
        description: impl Into<String>,
    ) -> Self {
        let changes = labels
            .into_iter()
            .filter_map(|(tile_id, new)| {
                let old = terrain_set.wang_id_for(tile_id).unwrap_or_default();
                (old != new).then_some((tile_id, old, new))
            })
            .collect();
        Self {
            terrain_set_id: terrain_set.id,
            changes,
            description: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl Command for SetWangIdsCommand {
    fn execute(&self, document: &mut Document) {
        if let Some(set) = document.terrains.get_terrain_set_mut(self.terrain_set_id) {
            for &(tile_id, _, new) in &self.changes {
                set.set_wang_id(tile_id, new);
            }
        }
    }

    fn undo(&self, document: &mut Document) {
        if let Some(set) = document.terrains.get_terrain_set_mut(self.terrain_set_id) {
            for &(tile_id, old, _) in self.changes.iter().rev() {
                set.set_wang_id(tile_id, old);
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Several commands undone and redone together
pub struct CompoundCommand {
    pub commands: Vec<Box<dyn Command>>,
    description: String,
}

impl CompoundCommand {
    pub fn new(commands: Vec<Box<dyn Command>>, description: impl Into<String>) -> Self {
        Self {
            commands,
            description: description.into(),
        }
    }
}

impl Command for CompoundCommand {
    fn execute(&self, document: &mut Document) {
        for command in &self.commands {
            command.execute(document);
        }
    }

    fn undo(&self, document: &mut Document) {
        for command in self.commands.iter().rev() {
            command.undo(document);
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Stores command history for undo/redo
#[derive(Default)]
pub struct CommandHistory {
    /// Stack of commands that have been executed
    undo_stack: Vec<Box<dyn Command>>,
    /// Stack of commands that have been undone
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    /// Execute a command and add it to history
    pub fn execute(&mut self, command: Box<dyn Command>, document: &mut Document) {
        command.execute(document);
        self.undo_stack.push(command);
        self.redo_stack.clear(); // Clear redo stack on new command
        document.mark_dirty();
    }

    /// Execute several commands as one undo step.
    ///
    /// Returns false, and records nothing, when `commands` is empty.
    pub fn run_as_one_step(
        &mut self,
        description: impl Into<String>,
        commands: Vec<Box<dyn Command>>,
        document: &mut Document,
    ) -> bool {
        if commands.is_empty() {
            return false;
        }
        self.execute(Box::new(CompoundCommand::new(commands, description)), document);
        true
    }

    /// Undo the last command
    pub fn undo(&mut self, document: &mut Document) {
        if let Some(command) = self.undo_stack.pop() {
            command.undo(document);
            self.redo_stack.push(command);
            document.mark_dirty();
        }
    }

    /// Redo the last undone command
    pub fn redo(&mut self, document: &mut Document) {
        if let Some(command) = self.redo_stack.pop() {
            command.execute(document);
            self.undo_stack.push(command);
            document.mark_dirty();
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of command to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get description of command to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Push a command directly onto the undo stack without executing it.
    /// Use this when the changes have already been applied (e.g., a committed stroke).
    pub fn push_undo(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }
}
