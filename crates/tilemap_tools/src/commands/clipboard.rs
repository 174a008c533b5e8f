//! Terrain clipboards for copying labels between tiles
//!
//! The exact clipboard copies whole WangIds. The arrangement clipboard copies
//! only where one color occurs, so it can be pasted back as another color
//! (or into another terrain set or tileset).

use thiserror::Error;
use tilemap_autotile::{SlotMask, TerrainSet, WangId};

use super::command::SetWangIdsCommand;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("There are no terrains to paste.")]
    NoTerrains,
    #[error("There are no terrain arrangements to paste.")]
    NoArrangements,
    #[error("No labels of terrain \"{0}\" were copied.")]
    NoLabelsCopied(String),
}

/// Pair copied entries with paste targets.
///
/// A single entry goes to every target; otherwise entries pair up in order
/// and surplus targets are left alone.
fn pair_with<'a, T: Copy>(
    entries: &'a [T],
    targets: &'a [u32],
) -> impl Iterator<Item = (u32, T)> + 'a {
    let single = (entries.len() == 1).then(|| entries[0]);
    targets
        .iter()
        .enumerate()
        .map_while(move |(i, &tile_id)| match single {
            Some(entry) => Some((tile_id, entry)),
            None => entries.get(i).map(|&entry| (tile_id, entry)),
        })
}

/// Exact copies of tile labels
#[derive(Debug, Default, Clone)]
pub struct TerrainClipboard {
    entries: Vec<WangId>,
}

impl TerrainClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the clipboard with the labels of `tiles`; unlabelled tiles copy as empty
    pub fn copy(&mut self, terrain_set: &TerrainSet, tiles: &[u32]) {
        self.entries = tiles
            .iter()
            .map(|&tile_id| terrain_set.wang_id_for(tile_id).unwrap_or_default())
            .collect();
    }

    /// Command writing the copied labels verbatim onto `tiles`
    pub fn paste(
        &self,
        terrain_set: &TerrainSet,
        tiles: &[u32],
    ) -> Result<SetWangIdsCommand, ClipboardError> {
        if self.entries.is_empty() {
            return Err(ClipboardError::NoTerrains);
        }
        Ok(SetWangIdsCommand::from_new_labels(
            terrain_set,
            pair_with(&self.entries, tiles),
            "Paste Terrains",
        ))
    }
}

/// Where one color occurred on each copied tile
#[derive(Debug, Default, Clone)]
pub struct ArrangementClipboard {
    entries: Vec<SlotMask>,
}

impl ArrangementClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the clipboard with the positions of `color` on `tiles`.
    ///
    /// Color 0 copies the unlabelled positions. The clipboard is filled even
    /// when no position was found, which is reported as an error.
    pub fn copy(
        &mut self,
        terrain_set: &TerrainSet,
        color: u32,
        tiles: &[u32],
    ) -> Result<(), ClipboardError> {
        self.entries = tiles
            .iter()
            .map(|&tile_id| {
                terrain_set
                    .wang_id_for(tile_id)
                    .unwrap_or_default()
                    .positions_of(color)
            })
            .collect();
        if self.entries.iter().all(|mask| mask.is_empty()) {
            return Err(ClipboardError::NoLabelsCopied(
                terrain_set.color_name(color).to_string(),
            ));
        }
        Ok(())
    }

    /// Command painting `color` over the copied positions of `tiles`.
    ///
    /// Only positions meaningful for the set type are written; all other
    /// labels of the targets are kept.
    pub fn paste(
        &self,
        terrain_set: &TerrainSet,
        color: u32,
        tiles: &[u32],
    ) -> Result<SetWangIdsCommand, ClipboardError> {
        if self.entries.is_empty() {
            return Err(ClipboardError::NoArrangements);
        }
        let relevant = terrain_set.set_type.slot_mask();
        let labels = pair_with(&self.entries, tiles).map(|(tile_id, mask)| {
            let mut wang_id = terrain_set.wang_id_for(tile_id).unwrap_or_default();
            for slot in (mask & relevant).iter() {
                wang_id.set(slot, color);
            }
            (tile_id, wang_id)
        });
        Ok(SetWangIdsCommand::from_new_labels(
            terrain_set,
            labels,
            "Paste Terrain Arrangement",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_autotile::{Color, TerrainSetType, WangIndex};
    use uuid::Uuid;

    fn terrain_set(set_type: TerrainSetType) -> TerrainSet {
        let mut set = TerrainSet::new("Ground".to_string(), Uuid::new_v4(), set_type);
        set.add_terrain("Grass".to_string(), Color::GREEN);
        set.add_terrain("Water".to_string(), Color::BLUE);
        set
    }

    #[test]
    fn test_single_entry_pastes_to_every_target() {
        let mut set = terrain_set(TerrainSetType::Mixed);
        let labels = WangId::new([1, 1, 2, 2, 2, 1, 1, 1]);
        set.set_wang_id(0, labels);

        let mut clipboard = TerrainClipboard::new();
        assert_eq!(
            clipboard.paste(&set, &[1]).err(),
            Some(ClipboardError::NoTerrains)
        );
        clipboard.copy(&set, &[0]);
        let command = clipboard.paste(&set, &[1, 2, 3]).unwrap();
        let pasted: Vec<(u32, WangId)> = command.changes.iter().map(|&(t, _, new)| (t, new)).collect();
        assert_eq!(pasted, vec![(1, labels), (2, labels), (3, labels)]);
    }

    #[test]
    fn test_entries_pair_in_order() {
        let mut set = terrain_set(TerrainSetType::Mixed);
        set.set_wang_id(0, WangId::filled(1));
        set.set_wang_id(1, WangId::filled(2));

        let mut clipboard = TerrainClipboard::new();
        clipboard.copy(&set, &[0, 1]);
        let command = clipboard.paste(&set, &[5, 6, 7]).unwrap();
        let targets: Vec<u32> = command.changes.iter().map(|&(t, _, _)| t).collect();
        assert_eq!(targets, vec![5, 6]);
        assert_eq!(command.changes[1].2, WangId::filled(2));
    }

    #[test]
    fn test_arrangement_paste_uses_selected_color() {
        let mut set = terrain_set(TerrainSetType::Corner);
        // grass on the top corners
        set.set_wang_id(0, WangId::new([0, 1, 0, 2, 0, 2, 0, 1]));
        set.set_wang_id(1, WangId::new([0, 2, 0, 2, 0, 2, 0, 2]));

        let mut clipboard = ArrangementClipboard::new();
        assert_eq!(
            clipboard.paste(&set, 2, &[1]).err(),
            Some(ClipboardError::NoArrangements)
        );
        clipboard.copy(&set, 1, &[0]).unwrap();
        let command = clipboard.paste(&set, 1, &[1]).unwrap();
        assert_eq!(
            command.changes,
            vec![(
                1,
                WangId::new([0, 2, 0, 2, 0, 2, 0, 2]),
                WangId::new([0, 1, 0, 2, 0, 2, 0, 1])
            )]
        );
    }

    #[test]
    fn test_arrangement_paste_skips_irrelevant_slots() {
        let mut source = terrain_set(TerrainSetType::Mixed);
        source.set_wang_id(0, WangId::new([1, 1, 0, 0, 0, 0, 0, 1]));
        let mut clipboard = ArrangementClipboard::new();
        clipboard.copy(&source, 1, &[0]).unwrap();

        // pasting into an Edge set writes only the Top edge
        let target = terrain_set(TerrainSetType::Edge);
        let command = clipboard.paste(&target, 2, &[3]).unwrap();
        let mut expected = WangId::EMPTY;
        expected.set(WangIndex::Top, 2);
        assert_eq!(command.changes, vec![(3, WangId::EMPTY, expected)]);
    }

    #[test]
    fn test_arrangement_copy_reports_missing_color() {
        let mut set = terrain_set(TerrainSetType::Mixed);
        set.set_wang_id(0, WangId::filled(1));
        let mut clipboard = ArrangementClipboard::new();
        assert_eq!(
            clipboard.copy(&set, 2, &[0]),
            Err(ClipboardError::NoLabelsCopied("Water".to_string()))
        );
        assert!(!clipboard.is_empty());
    }
}
