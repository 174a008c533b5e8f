//! Constraints derived from already-placed neighbors
//!
//! A cell's Top label must equal the Bottom label of the cell above it, and
//! the two corners next to that edge mirror the neighbor's corners the same
//! way. Neighbor labels are always read with the neighbor's own flips
//! applied before the shared slots are extracted.

use serde::{Deserialize, Serialize};
use tilemap_core::{FlipFlags, MapView, Rect};

use crate::terrain::TerrainSet;
use crate::transform;
use crate::wang_id::{SlotMask, WangId, WangIndex};

/// One of the four sides of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub fn from_edge(index: WangIndex) -> Option<Self> {
        match index {
            WangIndex::Top => Some(Self::Top),
            WangIndex::Right => Some(Self::Right),
            WangIndex::Bottom => Some(Self::Bottom),
            WangIndex::Left => Some(Self::Left),
            _ => None,
        }
    }

    pub const fn edge(self) -> WangIndex {
        match self {
            Self::Top => WangIndex::Top,
            Self::Right => WangIndex::Right,
            Self::Bottom => WangIndex::Bottom,
            Self::Left => WangIndex::Left,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    pub const fn offset(self) -> (i32, i32) {
        self.edge().offset()
    }

    /// The edge and the two corners touching it
    pub fn slots(self) -> [WangIndex; 3] {
        let edge = self.edge();
        [edge.prev(), edge, edge.next()]
    }

    pub fn mask(self) -> SlotMask {
        self.slots().into_iter().collect()
    }

    /// Reflection that carries a neighbor's facing slots onto ours
    const fn mirror(self) -> FlipFlags {
        match self {
            Self::Top | Self::Bottom => FlipFlags::VERTICAL,
            Self::Left | Self::Right => FlipFlags::HORIZONTAL,
        }
    }
}

/// Whether border cells look at the tiles around a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Surroundings {
    /// Outward slots copy the facing labels of existing neighbors (0 if none)
    #[default]
    Match,
    /// Outward slots are 0, as if the shape stood alone
    Ignore,
}

/// Labels of the tile at (x, y) as drawn, read through `terrain_set`.
///
/// `None` for empty cells. Tiles without labels in the set read as all 0.
pub fn neighbor_wang_id<V: MapView + ?Sized>(
    view: &V,
    terrain_set: &TerrainSet,
    x: i32,
    y: i32,
) -> Option<WangId> {
    let cell = view.cell_at(x, y)?;
    let labels = terrain_set.wang_id(cell.tile).unwrap_or_default();
    Some(transform::apply(labels, cell.flags))
}

/// Labels a neighbor on `side` of a cell imposes on that cell.
///
/// Only the three slots of `side` are set in the returned mask.
pub fn derive_edge_constraint(neighbor: &WangId, side: Side) -> (WangId, SlotMask) {
    let mask = side.mask();
    let mirrored = transform::apply(*neighbor, side.mirror());
    (mirrored.masked(mask), mask)
}

/// Target labels for cell (x, y) of a filled rectangle.
///
/// Every slot starts as `color`. Each side of the cell that faces out of
/// `rect` then takes the neighbor's facing labels (or 0), Top and Bottom
/// first, so a corner slot shared by two outward sides follows the
/// vertical neighbor.
pub fn derive_target_wang_id<V: MapView + ?Sized>(
    view: &V,
    terrain_set: &TerrainSet,
    rect: Rect,
    x: i32,
    y: i32,
    color: u32,
    surroundings: Surroundings,
) -> WangId {
    let mut target = WangId::filled(color);
    let mut claimed = SlotMask::EMPTY;

    for side in [Side::Top, Side::Bottom, Side::Left, Side::Right] {
        let (dx, dy) = side.offset();
        let (nx, ny) = (x + dx, y + dy);
        if rect.contains(nx, ny) {
            continue;
        }

        let neighbor = match surroundings {
            Surroundings::Match => neighbor_wang_id(view, terrain_set, nx, ny),
            Surroundings::Ignore => None,
        };
        let (facing, mask) = match neighbor {
            Some(labels) => derive_edge_constraint(&labels, side),
            None => (WangId::EMPTY, side.mask()),
        };

        for slot in (mask & !claimed).iter() {
            target.set(slot, facing.get(slot));
        }
        claimed = claimed | mask;
    }

    target
}

/// Labels implied by all eight surrounding cells, with the slots they determine.
///
/// Edges come from the side neighbors. A corner comes from the diagonal
/// neighbor, falling back to the side neighbors next to it when the
/// diagonal cell is empty. Empty cells contribute nothing.
pub fn surrounding_wang_id<V: MapView + ?Sized>(
    view: &V,
    terrain_set: &TerrainSet,
    x: i32,
    y: i32,
) -> (WangId, SlotMask) {
    let mut neighbors: [Option<WangId>; 8] = [None; 8];
    for index in WangIndex::ALL {
        let (dx, dy) = index.offset();
        neighbors[index.index()] = neighbor_wang_id(view, terrain_set, x + dx, y + dy);
    }

    let mut result = WangId::EMPTY;
    let mut known = SlotMask::EMPTY;

    for edge in WangIndex::EDGES {
        if let Some(labels) = neighbors[edge.index()] {
            result.set(edge, labels.get(edge.opposite()));
            known.insert(edge);
        }
    }

    for corner in WangIndex::CORNERS {
        // The diagonal neighbor touches us with its opposite corner; the side
        // neighbors before and after it touch us with the corner beside theirs.
        let candidates = [
            (corner, corner.opposite()),
            (corner.prev(), corner.next().next()),
            (corner.next(), corner.prev().prev()),
        ];
        for (neighbor, slot) in candidates {
            if let Some(labels) = neighbors[neighbor.index()] {
                result.set(corner, labels.get(slot));
                known.insert(corner);
                break;
            }
        }
    }

    (result, known)
}
