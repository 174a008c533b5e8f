//! Tile matching against partial Wang constraints

use rand::Rng;
use tilemap_core::{Cell, FlipFlags, TileRef};

use crate::candidates::CandidateIndex;
use crate::transform;
use crate::wang_id::{SlotMask, WangId};

/// Transforms tried when matching; only the identity until the tileset
/// declares which flips are allowed
pub const DEFAULT_TRANSFORMS: &[FlipFlags] = &[FlipFlags::NONE];

/// Desired labels for one cell.
///
/// Positions outside `mask` are "don't care". A masked 0 means "no terrain"
/// and must match a 0 label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellConstraint {
    pub desired: WangId,
    pub mask: SlotMask,
}

impl CellConstraint {
    pub const UNCONSTRAINED: Self = Self {
        desired: WangId::EMPTY,
        mask: SlotMask::EMPTY,
    };

    pub fn new(desired: WangId, mask: SlotMask) -> Self {
        Self { desired, mask }
    }

    /// Constrain every position to the given labels
    pub fn exact(desired: WangId) -> Self {
        Self {
            desired,
            mask: SlotMask::ALL,
        }
    }

    /// Whether a tile showing `wang_id` satisfies the constrained positions in `compared`
    pub fn accepts(&self, wang_id: &WangId, compared: SlotMask) -> bool {
        wang_id.matches(&self.desired, self.mask & compared)
    }
}

/// A tile (with flips) that satisfies a constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMatch {
    pub tile: TileRef,
    pub flags: FlipFlags,
    pub probability: f32,
}

impl TileMatch {
    pub fn cell(&self) -> Cell {
        Cell::with_flags(self.tile, self.flags)
    }
}

/// All (tile, flags) pairs whose transformed labels equal the constraint on
/// every position of `constraint.mask` that the index's effective type compares.
///
/// An empty result means no tile fits; callers leave the cell unpainted.
pub fn match_tiles(
    constraint: &CellConstraint,
    index: &CandidateIndex,
    transforms: &[FlipFlags],
) -> Vec<TileMatch> {
    let compared = index.comparison_mask();
    let mut matches = Vec::new();

    for candidate in index.iter() {
        for &flags in transforms {
            let labels = transform::apply(candidate.wang_id, flags);
            if constraint.accepts(&labels, compared) {
                matches.push(TileMatch {
                    tile: candidate.tile,
                    flags,
                    probability: candidate.probability,
                });
            }
        }
    }

    matches
}

/// Pick one match, weighted by tile probability.
///
/// When every match has zero probability the pick is uniform.
///
/// # Panics
///
/// Panics if `matches` is empty; callers check for an empty match set first.
pub fn random_from<R: Rng + ?Sized>(matches: &[TileMatch], rng: &mut R) -> TileMatch {
    assert!(!matches.is_empty(), "random_from called with no matches");

    let total: f32 = matches
        .iter()
        .map(|m| m.probability)
        .filter(|&p| p > 0.0)
        .sum();

    if total > 0.0 {
        let roll = rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        for m in matches.iter().filter(|m| m.probability > 0.0) {
            cumulative += m.probability;
            if roll < cumulative {
                return *m;
            }
        }
    }

    // All probabilities zero, or float rounding left the roll past the last sum
    matches[rng.gen_range(0..matches.len())]
}
