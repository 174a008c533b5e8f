//! Interactive terrain tools
//!
//! Each tool forwards host pointer events to a [`StrokeEngine`], reading the
//! current terrain selection from the [`EditorState`] at every event. A
//! finished stroke is written to the selected layer as one undo step.

mod force_edge;
mod rectangle;

pub use force_edge::ForceEdgeTerrainTool;
pub use rectangle::TerrainRectangleTool;

use tilemap_autotile::{
    CandidateCache, PointerButton, PointerPosition, Preview, StrokeEngine, StrokeKind,
    StrokeResponse, TerrainSelection, TerrainSet, TerrainSetType,
};
use tilemap_core::{CoreError, MapView, Tileset};
use tracing::{info, warn};
use uuid::Uuid;

use crate::commands::BatchTileCommand;
use crate::document::{Document, EditorState};

/// Keyboard modifiers held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// A tool driven by host pointer and keyboard events
pub trait TerrainTool {
    fn name(&self) -> &'static str;
    /// The tool was picked; re-read the selection
    fn activated(&mut self, state: &EditorState);
    fn pointer_down(
        &mut self,
        button: PointerButton,
        position: PointerPosition,
        state: &mut EditorState,
    );
    fn pointer_moved(&mut self, position: PointerPosition, state: &mut EditorState);
    fn pointer_up(&mut self, button: PointerButton, state: &mut EditorState);
    fn modifiers_changed(&mut self, modifiers: Modifiers, state: &mut EditorState);
    /// The document or selected layer was replaced; drops any stroke in progress
    fn map_changed(&mut self, state: &EditorState);
    /// Uncommitted placements to draw over the map
    fn preview(&self) -> &Preview;
    /// Status bar text
    fn status(&self) -> &str;
}

#[derive(Clone, Copy)]
enum ToolEvent {
    Down(PointerButton, PointerPosition),
    Moved(PointerPosition),
    Up(PointerButton),
    IgnoreSurroundings(bool),
}

/// Where the selected layer stands
enum Target {
    Ready(Uuid),
    NoLayer,
    NotTileLayer,
}

fn target(state: &EditorState) -> Target {
    let (Some(document), Some(layer_id)) = (state.document.as_ref(), state.selected_layer) else {
        return Target::NoLayer;
    };
    match document.map.tile_layer(layer_id) {
        Ok(_) => Target::Ready(layer_id),
        Err(CoreError::NotATileLayer(_)) => Target::NotTileLayer,
        Err(_) => Target::NoLayer,
    }
}

/// The terrain a tool paints with.
///
/// Rectangle strokes need a real color and fall back to the terrain of the
/// selected tile. Edge strokes take the selection as is, so color 0 erases.
fn resolve_terrain<'d>(
    state: &EditorState,
    document: &'d Document,
    kind: StrokeKind,
) -> Option<(&'d TerrainSet, &'d Tileset, u32)> {
    let (set_id, color) = match kind {
        StrokeKind::Rectangle => state.brush.resolve(&document.terrains)?,
        StrokeKind::EdgeLine => (
            state.brush.selected_terrain_set?,
            state.brush.selected_color?,
        ),
    };
    let (terrain_set, tileset) = document.terrain(set_id)?;
    Some((terrain_set, tileset, color))
}

/// State and event plumbing shared by the terrain tools
struct ToolCore {
    name: &'static str,
    /// Undo step description of a committed stroke
    action: &'static str,
    engine: StrokeEngine,
    cache: CandidateCache,
    tile_position: (i32, i32),
    status: String,
}

impl ToolCore {
    fn new(name: &'static str, action: &'static str, engine: StrokeEngine) -> Self {
        Self {
            name,
            action,
            engine,
            cache: CandidateCache::new(),
            tile_position: (0, 0),
            status: String::new(),
        }
    }

    fn reset(&mut self, state: &EditorState) {
        self.engine.cancel();
        self.cache.invalidate();
        self.update_status(state);
    }

    /// Run one event through the engine and apply what it returns
    fn dispatch(&mut self, state: &mut EditorState, event: ToolEvent) -> StrokeResponse {
        match event {
            ToolEvent::Down(_, position) | ToolEvent::Moved(position) => {
                self.tile_position = position.tile;
            }
            _ => {}
        }

        let Target::Ready(layer_id) = target(state) else {
            self.engine.cancel();
            self.update_status(state);
            return StrokeResponse::Ignored;
        };

        let response = {
            let Some(document) = state.document.as_ref() else {
                return StrokeResponse::Ignored;
            };
            let Ok(layer) = document.map.tile_layer(layer_id) else {
                return StrokeResponse::Ignored;
            };
            let selection = match resolve_terrain(state, document, self.engine.kind()) {
                Some((terrain_set, tileset, color)) => Some(TerrainSelection {
                    terrain_set,
                    tileset,
                    color,
                    candidates: self.cache.get(terrain_set, tileset, color),
                }),
                None => None,
            };
            let selection = selection.as_ref();
            match event {
                ToolEvent::Down(button, position) => {
                    self.engine.pointer_down(button, position, layer, selection)
                }
                ToolEvent::Moved(position) => self.engine.pointer_moved(position, layer, selection),
                ToolEvent::Up(button) => self.engine.pointer_up(button),
                ToolEvent::IgnoreSurroundings(ignore) => {
                    self.engine.set_ignore_surroundings(ignore, layer, selection)
                }
            }
        };

        match &response {
            StrokeResponse::SampledColor(color) => state.brush.select_color(*color),
            StrokeResponse::SampledTile(tile) => state.brush.select_tile(*tile),
            StrokeResponse::Commit(preview) => self.commit(state, layer_id, preview),
            StrokeResponse::Ignored | StrokeResponse::PreviewChanged => {}
        }
        self.update_status(state);
        response
    }

    /// Write a finished stroke and record it as one undo step
    fn commit(&self, state: &mut EditorState, layer_id: Uuid, preview: &Preview) {
        let Some(document) = state.document.as_mut() else {
            return;
        };
        let changes = match document.map.tile_layer_mut(layer_id) {
            Ok(layer) => preview.commit(layer),
            Err(err) => {
                warn!("{} could not commit its stroke: {}", self.name, err);
                return;
            }
        };
        if changes.is_empty() {
            return;
        }
        info!("{} changed {} tiles", self.name, changes.len());
        state
            .history
            .push_undo(Box::new(BatchTileCommand::new(layer_id, changes, self.action)));
        document.mark_dirty();
    }

    fn update_status(&mut self, state: &EditorState) {
        self.status = self.describe(state);
    }

    fn describe(&self, state: &EditorState) -> String {
        let target = target(state);
        let Some(document) = state.document.as_ref() else {
            return self.no_target();
        };
        if let Target::NoLayer = target {
            return self.no_target();
        }
        let kind = self.engine.kind();
        let Some((terrain_set, _, color)) = resolve_terrain(state, document, kind) else {
            return "No terrain selected.".to_string();
        };
        if kind == StrokeKind::EdgeLine
            && terrain_set.effective_type_for_color(color) == TerrainSetType::Corner
        {
            return "Selected Terrain does not have Edge labels.".to_string();
        }
        let Target::Ready(layer_id) = target else {
            return "The selected layer is not a Tile Layer.".to_string();
        };

        let (x, y) = self.tile_position;
        let terrain = format!(
            "Terrain \"{}\" from Terrain Set \"{}\"",
            terrain_set.color_name(color),
            terrain_set.name
        );
        if let Some(rect) = self.engine.rectangle() {
            return format!("{x}, {y} [{}x{} using {terrain}]", rect.width, rect.height);
        }
        let tile = document
            .map
            .tile_layer(layer_id)
            .ok()
            .and_then(|layer| layer.tile_at(x, y))
            .map(|tile| tile.tile_id.to_string())
            .unwrap_or_else(|| "empty".to_string());
        if color > 0 {
            format!("{x}, {y} [{tile}] [Using {terrain}]")
        } else {
            format!("{x}, {y} [{tile}]")
        }
    }

    fn no_target(&self) -> String {
        format!(
            "{} has no map or selected layers, so it cannot draw anything.",
            self.name
        )
    }
}
