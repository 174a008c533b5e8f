//! Sampling a metatileset's source map into terrain labels

use std::path::Path;

use tilemap_autotile::{
    neighbor_wang_id, AutotileConfig, Terrain, TerrainSet, TerrainSetType, WangId, WangIndex,
};
use tilemap_core::{MapView, TileLayer, TileMap, Tileset};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::MetatileError;

/// Size of a metatile measured in source tiles, per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetatileRatio {
    pub width: f64,
    pub height: f64,
}

impl MetatileRatio {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Ratio between a metatileset's tile size and its source map's tile size
    pub fn between(destination: &Tileset, source: &TileMap) -> Result<Self, MetatileError> {
        if source.tile_width == 0
            || source.tile_height == 0
            || destination.tile_width == 0
            || destination.tile_height == 0
        {
            return Err(MetatileError::ZeroTileSize);
        }
        Ok(Self {
            width: destination.tile_width as f64 / source.tile_width as f64,
            height: destination.tile_height as f64 / source.tile_height as f64,
        })
    }
}

/// Offsets from a metatile's top-left source tile to its sampled subtiles.
///
/// The far offsets land on the last source tile still inside the metatile,
/// so an integral ratio of 2 gives 1, not 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOffsets {
    pub right: i32,
    pub bottom: i32,
    pub middle_x: i32,
    pub middle_y: i32,
}

impl SampleOffsets {
    pub fn from_ratio(ratio: MetatileRatio) -> Self {
        Self {
            right: far_offset(ratio.width),
            bottom: far_offset(ratio.height),
            middle_x: (ratio.width / 2.0).floor() as i32,
            middle_y: (ratio.height / 2.0).floor() as i32,
        }
    }

    /// Where to sample for `slot`, and which label of the sampled subtile to read
    fn sample(&self, slot: WangIndex) -> ((i32, i32), WangIndex) {
        match slot {
            WangIndex::TopLeft => ((0, 0), WangIndex::TopLeft),
            WangIndex::Top => ((self.middle_x, 0), WangIndex::TopLeft),
            WangIndex::TopRight => ((self.right, 0), WangIndex::TopRight),
            WangIndex::Left => ((0, self.middle_y), WangIndex::TopLeft),
            WangIndex::Right => ((self.right, self.middle_y), WangIndex::TopRight),
            WangIndex::BottomLeft => ((0, self.bottom), WangIndex::BottomLeft),
            WangIndex::Bottom => ((self.middle_x, self.bottom), WangIndex::BottomLeft),
            WangIndex::BottomRight => ((self.right, self.bottom), WangIndex::BottomRight),
        }
    }
}

fn far_offset(ratio: f64) -> i32 {
    let floor = ratio.floor();
    if floor == ratio {
        floor as i32 - 1
    } else {
        floor as i32
    }
}

/// Summary of a finished import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of the created terrain sets
    pub terrain_sets: Vec<Uuid>,
    /// Labelled metatiles, summed over all created sets
    pub labeled_tiles: usize,
}

impl ImportReport {
    pub fn from_sets(sets: &[TerrainSet]) -> Self {
        Self {
            terrain_sets: sets.iter().map(|s| s.id).collect(),
            labeled_tiles: sets.iter().map(|s| s.tile_wang_ids.len()).sum(),
        }
    }

    pub fn sets_created(&self) -> usize {
        self.terrain_sets.len()
    }
}

/// Labels of the metatile whose top-left source tile is (x, y).
///
/// `None` if a sampled subtile comes from another tileset than the one
/// `source_set` labels, or if no sampled label is set.
fn metatile_wang_id(
    layer: &TileLayer,
    source_set: &TerrainSet,
    x: i32,
    y: i32,
    offsets: &SampleOffsets,
) -> Option<WangId> {
    let mixed_tilesets = WangIndex::ALL.iter().any(|&slot| {
        let ((dx, dy), _) = offsets.sample(slot);
        layer
            .tile_at(x + dx, y + dy)
            .is_some_and(|tile| tile.tileset_id != source_set.tileset_id)
    });
    if mixed_tilesets {
        return None;
    }

    let mut wang_id = WangId::EMPTY;
    for slot in WangIndex::ALL {
        let ((dx, dy), read) = offsets.sample(slot);
        if let Some(subtile) = neighbor_wang_id(layer, source_set, x + dx, y + dy) {
            wang_id.set(slot, subtile.get(read));
        }
    }
    (wang_id.sum() > 0).then_some(wang_id)
}

/// Derive new terrain sets for `destination` from the labels of the tiles in `layer`.
///
/// One Mixed set is produced per source terrain set that yields at least one
/// label. Nothing is modified.
pub fn import_from_layer(
    layer: &TileLayer,
    used_tilesets: &[Uuid],
    source_terrains: &AutotileConfig,
    destination: &Tileset,
    ratio: MetatileRatio,
) -> Vec<TerrainSet> {
    let columns = destination.columns();
    if columns == 0 {
        return Vec::new();
    }
    let offsets = SampleOffsets::from_ratio(ratio);

    let mut imported = Vec::new();
    for &tileset_id in used_tilesets {
        for source_set in source_terrains.get_terrain_sets_for_tileset(tileset_id) {
            let mut terrain_set = TerrainSet::new(
                source_set.name.clone(),
                destination.id,
                TerrainSetType::Mixed,
            );
            terrain_set.terrains = source_set
                .terrains
                .iter()
                .map(|t| Terrain::new(t.name.clone(), t.color))
                .collect();

            for tile in destination.iter_tiles() {
                let dst_x = tile.id % columns;
                let dst_y = tile.id / columns;
                let src_x = (dst_x as f64 * ratio.width).floor() as i32;
                let src_y = (dst_y as f64 * ratio.height).floor() as i32;
                match metatile_wang_id(layer, source_set, src_x, src_y, &offsets) {
                    Some(wang_id) => terrain_set.set_wang_id(tile.id, wang_id),
                    None => debug!(
                        "No labels from \"{}\" for metatile {}",
                        source_set.name, tile.id
                    ),
                }
            }

            if !terrain_set.is_empty() {
                imported.push(terrain_set);
            }
        }
    }
    imported
}

/// Validate the inputs and compute the imported sets without applying them
pub fn prepare_import(
    source: &TileMap,
    source_terrains: &AutotileConfig,
    destination: &Tileset,
) -> Result<Vec<TerrainSet>, MetatileError> {
    if destination.image.is_none() {
        return Err(MetatileError::MissingImage);
    }
    let ratio = MetatileRatio::between(destination, source)?;
    let layer = source
        .bottom_tile_layer()
        .and_then(|layer| layer.as_tile_layer())
        .ok_or(MetatileError::NoTileLayer)?;
    let used_tilesets = source.used_tilesets();
    if used_tilesets.is_empty() {
        return Err(MetatileError::NoTilesets);
    }
    Ok(import_from_layer(
        layer,
        &used_tilesets,
        source_terrains,
        destination,
        ratio,
    ))
}

/// Import terrains for `destination` from its source map into `target`.
///
/// Either every new set is added or, on error, none is.
pub fn import_metatile_terrains(
    source: &TileMap,
    source_terrains: &AutotileConfig,
    destination: &Tileset,
    target: &mut AutotileConfig,
) -> Result<ImportReport, MetatileError> {
    let sets = prepare_import(source, source_terrains, destination)?;
    let report = ImportReport::from_sets(&sets);
    for set in sets {
        target.add_terrain_set(set);
    }
    info!(
        "Imported {} terrain sets ({} tiles) into \"{}\"",
        report.sets_created(),
        report.labeled_tiles,
        destination.name
    );
    Ok(report)
}

/// Read a map saved as JSON
pub fn load_source_map(path: &Path) -> Result<TileMap, MetatileError> {
    let content = std::fs::read_to_string(path)?;
    let map = serde_json::from_str(&content)?;
    Ok(map)
}

/// Load the map a metatileset was rendered from
pub fn source_map_for(tileset: &Tileset) -> Result<TileMap, MetatileError> {
    let image = tileset.image.as_ref().ok_or(MetatileError::MissingImage)?;
    load_source_map(Path::new(&image.path))
}
