//! Tiled-compatible terrain autotile engine
//!
//! This crate matches Wang tiles against corner and edge constraints and
//! turns painting gestures into tile placements.
//!
//! # Features
//! - Corner, Edge, and Mixed terrain set types
//! - Flip-aware label matching with weighted random selection
//! - Border cells that continue the terrain already on the map
//! - Rectangle and edge-line strokes with previews
//!
//! # Example
//!
//! ```rust,ignore
//! use tilemap_autotile::{
//!     paint_stroke, CandidateIndex, Color, StrokeOptions, StrokeShape, TerrainSelection,
//!     TerrainSet, TerrainSetType, WangId,
//! };
//! use tilemap_core::{Rect, TileLayer, Tileset};
//!
//! let tileset = Tileset::with_grid("Ground".into(), "ground.png".into(), 16, 16, 8, 8);
//! let mut terrain_set = TerrainSet::new("Ground".into(), tileset.id, TerrainSetType::Mixed);
//! let grass = terrain_set.add_terrain("Grass".into(), Color::GREEN);
//! terrain_set.set_wang_id(0, WangId::filled(grass));
//! // ... more tile labels
//!
//! let candidates = CandidateIndex::build(&terrain_set, &tileset, grass);
//! let selection = TerrainSelection {
//!     terrain_set: &terrain_set,
//!     tileset: &tileset,
//!     color: grass,
//!     candidates: &candidates,
//! };
//! let mut layer = TileLayer::new(32, 32);
//! let mut rng = rand::thread_rng();
//! paint_stroke(
//!     &mut layer,
//!     &selection,
//!     StrokeShape::Rectangle(Rect::new(4, 4, 6, 3)),
//!     &StrokeOptions::default(),
//!     &mut rng,
//! );
//! ```

pub mod candidates;
pub mod config;
pub mod filler;
pub mod matcher;
pub mod preview;
pub mod propagate;
pub mod stroke;
pub mod terrain;
pub mod transform;
pub mod wang_id;

// Re-export main types at crate root
pub use candidates::{CandidateCache, CandidateEntry, CandidateIndex};
pub use config::{AutotileConfig, TerrainBrush};
pub use filler::WangFiller;
pub use matcher::{match_tiles, random_from, CellConstraint, TileMatch, DEFAULT_TRANSFORMS};
pub use preview::{Preview, PreviewOverlay};
pub use propagate::{
    derive_edge_constraint, derive_target_wang_id, neighbor_wang_id, surrounding_wang_id, Side,
    Surroundings,
};
pub use stroke::{
    edge_at, edge_between, line_edges, line_points, paint_edges, paint_rectangle, paint_stroke,
    rectangle_targets, sample_index, PointerButton, PointerPosition, StrokeEngine, StrokeKind,
    StrokeOptions, StrokeResponse, StrokeShape, StrokeState, TerrainSelection,
};
pub use terrain::{Color, Terrain, TerrainSet, TerrainSetType};
pub use wang_id::{ParseWangIdError, SlotMask, WangId, WangIndex};

// Re-export tilemap_core
pub use tilemap_core;
