//! Terrain Rectangle tool

use tilemap_autotile::{PointerButton, PointerPosition, Preview, StrokeKind};

use super::{Modifiers, TerrainTool, ToolCore, ToolEvent};
use crate::config::ToolConfig;
use crate::document::EditorState;

/// Drag out a rectangle filled with the selected terrain.
///
/// The border of the rectangle blends into the terrain around it unless
/// surroundings are ignored; holding any modifier flips that setting for as
/// long as it is held. Right-click picks the tile under the cursor.
pub struct TerrainRectangleTool {
    core: ToolCore,
    ignore_surroundings: bool,
}

impl TerrainRectangleTool {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            core: ToolCore::new(
                "Terrain Rectangle Tool",
                "Terrain Rectangle",
                config.stroke_engine(StrokeKind::Rectangle),
            ),
            ignore_surroundings: config.ignore_surroundings,
        }
    }
}

impl TerrainTool for TerrainRectangleTool {
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

    fn modifiers_changed(&mut self, modifiers: Modifiers, state: &mut EditorState) {
        let ignore = self.ignore_surroundings != modifiers.any();
        self.core.dispatch(state, ToolEvent::IgnoreSurroundings(ignore));
    }

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
