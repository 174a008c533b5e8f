//! Force Edge Terrain tool

use tilemap_autotile::{PointerButton, PointerPosition, Preview, StrokeKind};

use super::{Modifiers, TerrainTool, ToolCore, ToolEvent};
use crate::config::ToolConfig;
use crate::document::EditorState;

/// Paint the selected color along tile edges.
///
/// Hovering previews the edge nearest the pointer; dragging extends the
/// stroke edge by edge. Color 0 paints the edges empty. Right-click picks
/// the color under the pointer.
pub struct ForceEdgeTerrainTool {
    core: ToolCore,
}

impl ForceEdgeTerrainTool {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            core: ToolCore::new(
                "Force Edge Terrain Tool",
                "Force Edge Terrain",
                config.stroke_engine(StrokeKind::EdgeLine),
            ),
        }
    }
}

impl TerrainTool for ForceEdgeTerrainTool {
    fn name(&self) -> &'static str {
        self.core.name
    }

    fn activated(&mut self, state: &EditorState) {
        self.core.reset(state);
    }

    fn pointer_down(
        &mut self,
        button: PointerButton,
        position: PointerPosition,
        state: &mut EditorState,
    ) {
        self.core.dispatch(state, ToolEvent::Down(button, position));
    }

    fn pointer_moved(&mut self, position: PointerPosition, state: &mut EditorState) {
        self.core.dispatch(state, ToolEvent::Moved(position));
    }

    fn pointer_up(&mut self, button: PointerButton, state: &mut EditorState) {
        self.core.dispatch(state, ToolEvent::Up(button));
    }

    // edges have no surroundings to ignore
    fn modifiers_changed(&mut self, _modifiers: Modifiers, _state: &mut EditorState) {}

    fn map_changed(&mut self, state: &EditorState) {
        self.core.reset(state);
    }

    fn preview(&self) -> &Preview {
        self.core.engine.preview()
    }

    fn status(&self) -> &str {
        &self.core.status
    }
}
