//! Candidate tiles for painting one terrain color

use tilemap_core::{TileRef, Tileset};
use tracing::debug;
use uuid::Uuid;

use crate::terrain::{TerrainSet, TerrainSetType};
use crate::wang_id::{SlotMask, WangId};

/// A labeled tile that may be placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateEntry {
    pub tile: TileRef,
    pub wang_id: WangId,
    pub probability: f32,
}

/// Tiles of a terrain set that carry a given color, and how the color paints
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    pub terrain_set_id: Uuid,
    pub color: u32,
    /// Mixed sets resolve to Edge or Corner when the color only uses one kind of slot
    pub effective_type: TerrainSetType,
    pub candidates: Vec<CandidateEntry>,
}

impl CandidateIndex {
    /// Collect the tiles of `tileset` carrying `color` in a slot relevant to the set type.
    ///
    /// Gaps in the tileset are skipped.
    pub fn build(terrain_set: &TerrainSet, tileset: &Tileset, color: u32) -> Self {
        let set_mask = terrain_set.set_type.slot_mask();
        let mut uses_edges = false;
        let mut uses_corners = false;
        let mut candidates = Vec::new();

        for tile in tileset.iter_tiles() {
            let Some(wang_id) = terrain_set.wang_id_for(tile.id) else {
                continue;
            };
            if !wang_id.has_color_in(color, set_mask) {
                continue;
            }
            uses_edges |= wang_id.has_color_in(color, SlotMask::EDGES & set_mask);
            uses_corners |= wang_id.has_color_in(color, SlotMask::CORNERS & set_mask);
            candidates.push(CandidateEntry {
                tile: tileset.tile_ref(tile.id),
                wang_id,
                probability: tile.probability,
            });
        }

        let effective_type = match terrain_set.set_type {
            TerrainSetType::Mixed => TerrainSetType::from_usage(uses_edges, uses_corners),
            other => other,
        };

        debug!(
            terrain_set = %terrain_set.name,
            color,
            candidates = candidates.len(),
            ?effective_type,
            "Built candidate index"
        );

        Self {
            terrain_set_id: terrain_set.id,
            color,
            effective_type,
            candidates,
        }
    }

    /// Every labeled tile of the set, regardless of color
    pub fn all_labeled(terrain_set: &TerrainSet, tileset: &Tileset) -> Self {
        let candidates = tileset
            .iter_tiles()
            .filter_map(|tile| {
                terrain_set.wang_id_for(tile.id).map(|wang_id| CandidateEntry {
                    tile: tileset.tile_ref(tile.id),
                    wang_id,
                    probability: tile.probability,
                })
            })
            .collect();

        Self {
            terrain_set_id: terrain_set.id,
            color: 0,
            effective_type: terrain_set.set_type,
            candidates,
        }
    }

    /// Slots compared when matching against this index
    pub fn comparison_mask(&self) -> SlotMask {
        self.effective_type.slot_mask()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateEntry> {
        self.candidates.iter()
    }
}

/// Keeps the last built index until the selection changes
#[derive(Debug, Default)]
pub struct CandidateCache {
    current: Option<CandidateIndex>,
}

impl CandidateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for (terrain set, color), rebuilding only when the selection changed
    pub fn get(&mut self, terrain_set: &TerrainSet, tileset: &Tileset, color: u32) -> &CandidateIndex {
        let stale = self
            .current
            .as_ref()
            .map_or(true, |index| index.terrain_set_id != terrain_set.id || index.color != color);
        if stale {
            self.current = None;
        }
        self.current
            .get_or_insert_with(|| CandidateIndex::build(terrain_set, tileset, color))
    }

    /// Drop the cached index, e.g. after tile labels were edited
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&CandidateIndex> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Color;

    fn setup(set_type: TerrainSetType) -> (Tileset, TerrainSet) {
        let tileset = Tileset::with_grid("Terrain".to_string(), "terrain.png".to_string(), 16, 16, 4, 1);
        let mut set = TerrainSet::new("Ground".to_string(), tileset.id, set_type);
        set.add_terrain("Grass".to_string(), Color::GREEN);
        set.add_terrain("Sand".to_string(), Color::rgb(0.9, 0.8, 0.5));
        (tileset, set)
    }

    #[test]
    fn test_only_tiles_with_color_are_candidates() {
        let (tileset, mut set) = setup(TerrainSetType::Mixed);
        set.set_wang_id(0, WangId::filled(1));
        set.set_wang_id(1, WangId::filled(2));
        set.set_wang_id(2, WangId::new([1, 1, 2, 2, 2, 2, 2, 1]));

        let index = CandidateIndex::build(&set, &tileset, 1);
        let ids: Vec<u32> = index.iter().map(|c| c.tile.tile_id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(index.effective_type, TerrainSetType::Mixed);
        assert_eq!(index.comparison_mask(), SlotMask::ALL);
    }

    #[test]
    fn test_mixed_set_with_corner_labels_behaves_as_corner() {
        let (tileset, mut set) = setup(TerrainSetType::Mixed);
        set.set_wang_id(0, WangId::from_mask(1, SlotMask::CORNERS));
        set.set_wang_id(1, WangId::new([0, 1, 0, 2, 0, 2, 0, 2]));

        let index = CandidateIndex::build(&set, &tileset, 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.effective_type, TerrainSetType::Corner);
    }

    #[test]
    fn test_labels_outside_set_type_are_ignored() {
        let (tileset, mut set) = setup(TerrainSetType::Edge);
        // color 1 only on corners, which an Edge set never compares
        set.set_wang_id(0, WangId::from_mask(1, SlotMask::CORNERS));
        set.set_wang_id(1, WangId::from_mask(1, SlotMask::EDGES));

        let index = CandidateIndex::build(&set, &tileset, 1);
        assert_eq!(index.len(), 1);
        assert_eq!(index.effective_type, TerrainSetType::Edge);
    }

    #[test]
    fn test_tileset_gaps_are_skipped() {
        let (mut tileset, mut set) = setup(TerrainSetType::Corner);
        set.set_wang_id(1, WangId::filled(1));
        set.set_wang_id(3, WangId::filled(1));
        tileset.remove_tile(1);

        let index = CandidateIndex::build(&set, &tileset, 1);
        let ids: Vec<u32> = index.iter().map(|c| c.tile.tile_id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_cache_rebuilds_on_selection_change() {
        let (tileset, mut set) = setup(TerrainSetType::Corner);
        set.set_wang_id(0, WangId::filled(1));
        set.set_wang_id(1, WangId::filled(2));

        let mut cache = CandidateCache::new();
        assert_eq!(cache.get(&set, &tileset, 1).len(), 1);

        // label edits are not seen until invalidated
        set.set_wang_id(2, WangId::filled(1));
        assert_eq!(cache.get(&set, &tileset, 1).len(), 1);
        cache.invalidate();
        assert_eq!(cache.get(&set, &tileset, 1).len(), 2);

        assert_eq!(cache.get(&set, &tileset, 2).color, 2);
    }
}
