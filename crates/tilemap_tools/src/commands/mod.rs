//! Undo/redo command system

pub mod clipboard;
mod command;

pub use clipboard::{ArrangementClipboard, ClipboardError, TerrainClipboard};
pub use command::{
    AddTerrainSetsCommand, BatchTileCommand, Command, CommandHistory, CompoundCommand,
    SetWangIdsCommand,
};
