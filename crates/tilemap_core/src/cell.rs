//! Tile handles and flip flags stored in layer cells

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign, BitXor, BitXorAssign};
use uuid::Uuid;

/// Opaque identity of a tile: its id within the owning tileset.
///
/// Two handles are the same tile only when both the tileset and the tile id match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileRef {
    pub tileset_id: Uuid,
    pub tile_id: u32,
}

impl TileRef {
    pub const fn new(tileset_id: Uuid, tile_id: u32) -> Self {
        Self {
            tileset_id,
            tile_id,
        }
    }
}

/// Quantized reflections applied to a placed tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlipFlags(u8);

impl FlipFlags {
    pub const NONE: Self = Self(0);
    pub const HORIZONTAL: Self = Self(0b001);
    pub const VERTICAL: Self = Self(0b010);
    pub const ANTI_DIAGONAL: Self = Self(0b100);

    /// Every combination of the three flags, identity first
    pub const ALL: [Self; 8] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
    ];

    /// Build flags from raw bits, dropping anything outside the three known flags
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn flipped_horizontally(self) -> bool {
        self.contains(Self::HORIZONTAL)
    }

    pub fn flipped_vertically(self) -> bool {
        self.contains(Self::VERTICAL)
    }

    pub fn flipped_anti_diagonally(self) -> bool {
        self.contains(Self::ANTI_DIAGONAL)
    }
}

impl BitOr for FlipFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FlipFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for FlipFlags {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for FlipFlags {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

/// Contents of a non-empty layer cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub tile: TileRef,
    #[serde(default, skip_serializing_if = "FlipFlags::is_empty")]
    pub flags: FlipFlags,
}

impl Cell {
    pub fn new(tile: TileRef) -> Self {
        Self {
            tile,
            flags: FlipFlags::NONE,
        }
    }

    pub fn with_flags(tile: TileRef, flags: FlipFlags) -> Self {
        Self { tile, flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_flags_xor_cancels() {
        let flags = FlipFlags::HORIZONTAL | FlipFlags::ANTI_DIAGONAL;
        assert_eq!(flags ^ FlipFlags::HORIZONTAL, FlipFlags::ANTI_DIAGONAL);
        assert_eq!(flags ^ flags, FlipFlags::NONE);
    }

    #[test]
    fn test_flip_flags_truncate_unknown_bits() {
        let flags = FlipFlags::from_bits_truncate(0xFF);
        assert_eq!(flags.bits(), 0b111);
        assert!(flags.flipped_horizontally());
        assert!(flags.flipped_vertically());
        assert!(flags.flipped_anti_diagonally());
    }

    #[test]
    fn test_tile_ref_identity_includes_tileset() {
        let a = TileRef::new(Uuid::new_v4(), 3);
        let b = TileRef::new(Uuid::new_v4(), 3);
        assert_ne!(a, b);
        assert_eq!(a, TileRef::new(a.tileset_id, 3));
    }

    #[test]
    fn test_cell_serializes_without_empty_flags() {
        let cell = Cell::new(TileRef::new(Uuid::nil(), 7));
        let json = serde_json::to_string(&cell).unwrap();
        assert!(!json.contains("flags"));
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);

        let flipped = Cell::with_flags(TileRef::new(Uuid::nil(), 7), FlipFlags::VERTICAL);
        let json = serde_json::to_string(&flipped).unwrap();
        assert!(json.contains("flags"));
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flipped);
    }
}
