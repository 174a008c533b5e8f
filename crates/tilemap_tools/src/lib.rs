//! Terrain editing for tilemap documents
//!
//! This crate sits between a host editor and the terrain engine:
//!
//! - [`tools`]: the Terrain Rectangle and Force Edge Terrain tools, driven by
//!   pointer and modifier events, with status bar text
//! - [`actions`]: terrain copy/paste and metatile terrain import
//! - [`commands`]: undo/redo history, with several commands grouped into one step
//! - [`ToolConfig`]: tool settings loaded from TOML
//!
//! # Example
//!
//! ```rust,ignore
//! use tilemap_tools::{EditorState, TerrainRectangleTool, TerrainTool, ToolConfig};
//!
//! let mut state = EditorState::new(document);
//! state.selected_layer = Some(layer_id);
//! state.brush.select(terrain_set_id, 1);
//!
//! let mut tool = TerrainRectangleTool::new(&ToolConfig::default());
//! tool.pointer_down(PointerButton::Primary, start, &mut state);
//! tool.pointer_moved(end, &mut state);
//! tool.pointer_up(PointerButton::Primary, &mut state);
//! state.undo();
//! ```

pub mod actions;
pub mod commands;
pub mod config;
pub mod document;
pub mod tools;

pub use actions::ActionError;
pub use commands::{Command, CommandHistory};
pub use config::{ConfigError, ToolConfig};
pub use document::{Document, EditorState};
pub use tools::{ForceEdgeTerrainTool, Modifiers, TerrainRectangleTool, TerrainTool};

pub use tilemap_autotile;
pub use tilemap_core;
