//! One-shot editor actions: terrain clipboards and metatile import
//!
//! Each action reads the current selection from the [`EditorState`] and
//! records at most one undo step. Rejections come back as [`ActionError`],
//! whose message is meant for the user.

use thiserror::Error;
use tilemap_autotile::TerrainSet;
use tilemap_core::TileMap;
use tilemap_metatile::{ImportReport, MetatileError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::commands::{
    AddTerrainSetsCommand, ArrangementClipboard, ClipboardError, Command, SetWangIdsCommand,
    TerrainClipboard,
};
use crate::document::{Document, EditorState};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("No map is open.")]
    NoDocument,
    #[error("No terrain set is selected.")]
    NoTerrainSet,
    #[error("The tileset is not part of this document.")]
    UnknownTileset,
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Metatile(#[from] MetatileError),
}

/// Log a rejected action and hand the error back
fn rejected<T>(action: &str, err: ActionError) -> Result<T, ActionError> {
    warn!("{} rejected: {}", action, err);
    Err(err)
}

/// The selected terrain set of the open document
fn selected_set(state: &EditorState) -> Result<&TerrainSet, ActionError> {
    let document = state.document.as_ref().ok_or(ActionError::NoDocument)?;
    state
        .brush
        .selected_terrain_set
        .and_then(|id| document.terrains.get_terrain_set(id))
        .ok_or(ActionError::NoTerrainSet)
}

/// Run a relabelling command; empty commands change nothing and are not recorded
fn relabel(state: &mut EditorState, command: SetWangIdsCommand) -> bool {
    let Some(document) = state.document.as_mut() else {
        return false;
    };
    if command.is_empty() {
        return false;
    }
    info!(
        "{}: relabelled {} tiles",
        command.description(),
        command.changes.len()
    );
    state.history.execute(Box::new(command), document);
    true
}

/// Copy the labels of the selected tiles
pub fn copy_terrains(
    state: &EditorState,
    clipboard: &mut TerrainClipboard,
) -> Result<(), ActionError> {
    match selected_set(state) {
        Ok(set) => {
            clipboard.copy(set, &state.selected_tiles);
            Ok(())
        }
        Err(err) => rejected("Copy Terrains", err),
    }
}

/// Paste copied labels onto the selected tiles.
///
/// Returns whether any label changed.
pub fn paste_terrains(
    state: &mut EditorState,
    clipboard: &TerrainClipboard,
) -> Result<bool, ActionError> {
    let command = selected_set(state).and_then(|set| {
        clipboard
            .paste(set, &state.selected_tiles)
            .map_err(ActionError::from)
    });
    match command {
        Ok(command) => Ok(relabel(state, command)),
        Err(err) => rejected("Paste Terrains", err),
    }
}

/// Copy where the selected color occurs on the selected tiles
pub fn copy_terrain_arrangement(
    state: &EditorState,
    clipboard: &mut ArrangementClipboard,
) -> Result<(), ActionError> {
    let color = state.brush.selected_color.unwrap_or(0);
    let copied = selected_set(state).and_then(|set| {
        clipboard
            .copy(set, color, &state.selected_tiles)
            .map_err(ActionError::from)
    });
    match copied {
        Ok(()) => Ok(()),
        Err(err) => rejected("Copy Terrain Arrangement", err),
    }
}

/// Paint the selected color over the copied arrangement of the selected tiles
pub fn paste_terrain_arrangement(
    state: &mut EditorState,
    clipboard: &ArrangementClipboard,
) -> Result<bool, ActionError> {
    let color = state.brush.selected_color.unwrap_or(0);
    let command = selected_set(state).and_then(|set| {
        clipboard
            .paste(set, color, &state.selected_tiles)
            .map_err(ActionError::from)
    });
    match command {
        Ok(command) => Ok(relabel(state, command)),
        Err(err) => rejected("Paste Terrain Arrangement", err),
    }
}

/// Import terrains for a metatileset from the map its image was rendered from.
///
/// The source map is read from the path of the metatileset's image.
pub fn import_metatile_terrains(
    state: &mut EditorState,
    metatileset_id: Uuid,
) -> Result<ImportReport, ActionError> {
    let source = state
        .document
        .as_ref()
        .ok_or(ActionError::NoDocument)
        .and_then(|document| {
            document
                .tileset(metatileset_id)
                .ok_or(ActionError::UnknownTileset)
        })
        .and_then(|tileset| tilemap_metatile::source_map_for(tileset).map_err(ActionError::from));
    match source {
        Ok(source) => import_metatile_terrains_from(state, metatileset_id, &source),
        Err(err) => rejected("Import Metatile Terrains", err),
    }
}

/// Import terrains for a metatileset from an already loaded source map.
///
/// The source tiles' labels are looked up in the document's terrain sets.
/// All new sets are added in one undo step.
pub fn import_metatile_terrains_from(
    state: &mut EditorState,
    metatileset_id: Uuid,
    source: &TileMap,
) -> Result<ImportReport, ActionError> {
    let Some(document) = state.document.as_mut() else {
        return rejected("Import Metatile Terrains", ActionError::NoDocument);
    };
    let sets = match prepare(document, metatileset_id, source) {
        Ok(sets) => sets,
        Err(err) => return rejected("Import Metatile Terrains", err),
    };

    let report = ImportReport::from_sets(&sets);
    if !sets.is_empty() {
        let add: Box<dyn Command> =
            Box::new(AddTerrainSetsCommand::new(sets, "Add Terrain Sets"));
        state
            .history
            .run_as_one_step("Import Metatile Terrains", vec![add], document);
    }
    info!(
        "Imported {} terrain sets ({} tiles) from \"{}\"",
        report.sets_created(),
        report.labeled_tiles,
        source.name
    );
    Ok(report)
}

fn prepare(
    document: &Document,
    metatileset_id: Uuid,
    source: &TileMap,
) -> Result<Vec<TerrainSet>, ActionError> {
    let destination = document
        .tileset(metatileset_id)
        .ok_or(ActionError::UnknownTileset)?;
    Ok(tilemap_metatile::prepare_import(
        source,
        &document.terrains,
        destination,
    )?)
}
