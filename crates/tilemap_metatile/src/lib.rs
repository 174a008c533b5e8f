//! Terrain import for metatilesets
//!
//! A metatileset is a tileset whose image is a rendered map: each of its
//! tiles is a snapshot of a block of tiles in that source map. Labelling the
//! source tileset is enough; this crate derives the metatiles' labels by
//! sampling the corners and edge midpoints of each block.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilemap_autotile::AutotileConfig;
//! use tilemap_metatile::{import_metatile_terrains, source_map_for};
//!
//! let source = source_map_for(&metatileset)?;
//! let report = import_metatile_terrains(&source, &project_terrains, &metatileset, &mut metatile_terrains)?;
//! println!("created {} terrain sets", report.sets_created());
//! ```

mod error;
mod import;

pub use error::MetatileError;
pub use import::{
    import_from_layer, import_metatile_terrains, load_source_map, prepare_import, source_map_for,
    ImportReport, MetatileRatio, SampleOffsets,
};
