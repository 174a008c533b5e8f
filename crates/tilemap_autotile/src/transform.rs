//! Flip-induced permutations of Wang IDs
//!
//! A flipped tile shows its labels in different positions. The anti-diagonal
//! flip is applied first, then horizontal, then vertical, which is the order
//! a renderer applies them to the tile image.

use tilemap_core::FlipFlags;

use crate::wang_id::{WangId, WangIndex};

/// Slot pairs swapped by each flip
const ANTI_DIAGONAL_SWAPS: [(WangIndex, WangIndex); 3] = [
    (WangIndex::Top, WangIndex::Left),
    (WangIndex::Right, WangIndex::Bottom),
    (WangIndex::TopRight, WangIndex::BottomLeft),
];

const HORIZONTAL_SWAPS: [(WangIndex, WangIndex); 3] = [
    (WangIndex::Right, WangIndex::Left),
    (WangIndex::TopLeft, WangIndex::TopRight),
    (WangIndex::BottomLeft, WangIndex::BottomRight),
];

const VERTICAL_SWAPS: [(WangIndex, WangIndex); 3] = [
    (WangIndex::Top, WangIndex::Bottom),
    (WangIndex::TopLeft, WangIndex::BottomLeft),
    (WangIndex::TopRight, WangIndex::BottomRight),
];

fn swap_all(wang_id: &mut WangId, swaps: &[(WangIndex, WangIndex)]) {
    for &(a, b) in swaps {
        wang_id.colors.swap(a.index(), b.index());
    }
}

/// Labels of a tile as they appear once drawn with `flags`
pub fn apply(wang_id: WangId, flags: FlipFlags) -> WangId {
    let mut result = wang_id;
    if flags.flipped_anti_diagonally() {
        swap_all(&mut result, &ANTI_DIAGONAL_SWAPS);
    }
    if flags.flipped_horizontally() {
        swap_all(&mut result, &HORIZONTAL_SWAPS);
    }
    if flags.flipped_vertically() {
        swap_all(&mut result, &VERTICAL_SWAPS);
    }
    result
}

/// Flags that undo `flags`.
///
/// Every combination is its own inverse except the two quarter turns:
/// anti-diagonal plus horizontal rotates one way, anti-diagonal plus vertical
/// the other.
pub fn inverse(flags: FlipFlags) -> FlipFlags {
    let quarter_turn = flags.flipped_anti_diagonally()
        && flags.flipped_horizontally() != flags.flipped_vertically();
    if quarter_turn {
        flags ^ (FlipFlags::HORIZONTAL | FlipFlags::VERTICAL)
    } else {
        flags
    }
}

/// Whether `flags` is a pure reflection (its own inverse)
pub fn is_involution(flags: FlipFlags) -> bool {
    inverse(flags) == flags
}
