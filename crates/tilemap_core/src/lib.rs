//! Core data structures for tilemap terrain tools
//!
//! This crate provides the host-side document model that the terrain engine reads
//! and writes:
//! - `TileMap` - A map with a tree of layers
//! - `Layer` - A tile, object or group layer
//! - `Tileset` - Tile atlas with per-tile probability and properties
//! - `Cell` - A placed tile handle plus its flip flags
//! - `LayerEdit` - Scoped edit session that applies all changes at once
//!
//! The crate has no rendering or windowing dependency.

mod cell;
mod edit;
mod error;
mod layer;
mod map;
mod tileset;
mod walk;

pub use cell::{Cell, FlipFlags, TileRef};
pub use edit::{apply_changes, LayerEdit, TileChange};
pub use error::CoreError;
pub use layer::{Layer, LayerData, LayerType, MapView, Rect, TileLayer};
pub use map::TileMap;
pub use tileset::{Tile, Tileset, TilesetImage};
pub use walk::{find_layer_path, find_layers, WalkMode};
