//! Wang ID representation
//!
//! Uses Tiled's position indexing:
//! ```text
//!   7|0|1
//!   6|X|2
//!   5|4|3
//! ```
//! - Even indices (0,2,4,6) = Edges (Top, Right, Bottom, Left)
//! - Odd indices (1,3,5,7) = Corners (TopRight, BottomRight, BottomLeft, TopLeft)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

/// One of the 8 label positions of a tile, clockwise from Top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WangIndex {
    Top = 0,
    TopRight = 1,
    Right = 2,
    BottomRight = 3,
    Bottom = 4,
    BottomLeft = 5,
    Left = 6,
    TopLeft = 7,
}

impl WangIndex {
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
        Self::TopLeft,
    ];

    pub const EDGES: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub const CORNERS: [Self; 4] = [
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
        Self::TopLeft,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position on a neighbor that faces us
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 4) % 8]
    }

    /// Next index clockwise
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % 8]
    }

    /// Previous index counter-clockwise
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + 7) % 8]
    }

    pub const fn is_corner(self) -> bool {
        self.index() % 2 == 1
    }

    /// Grid offset of the neighbor in this direction (y grows downwards)
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Top => (0, -1),
            Self::TopRight => (1, -1),
            Self::Right => (1, 0),
            Self::BottomRight => (1, 1),
            Self::Bottom => (0, 1),
            Self::BottomLeft => (-1, 1),
            Self::Left => (-1, 0),
            Self::TopLeft => (-1, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::TopRight => "Top-Right",
            Self::Right => "Right",
            Self::BottomRight => "Bottom-Right",
            Self::Bottom => "Bottom",
            Self::BottomLeft => "Bottom-Left",
            Self::Left => "Left",
            Self::TopLeft => "Top-Left",
        }
    }
}

/// Set of Wang positions taking part in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotMask(u8);

impl SlotMask {
    pub const EMPTY: Self = Self(0);
    /// Top, Right, Bottom, Left
    pub const EDGES: Self = Self(0x55);
    /// TopRight, BottomRight, BottomLeft, TopLeft
    pub const CORNERS: Self = Self(0xAA);
    pub const ALL: Self = Self(0xFF);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn single(index: WangIndex) -> Self {
        Self(1 << index as u8)
    }

    pub const fn contains(self, index: WangIndex) -> bool {
        self.0 & (1 << index as u8) != 0
    }

    pub fn insert(&mut self, index: WangIndex) {
        self.0 |= 1 << index as u8;
    }

    pub fn remove(&mut self, index: WangIndex) {
        self.0 &= !(1 << index as u8);
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Positions in the mask, clockwise from Top
    pub fn iter(self) -> impl Iterator<Item = WangIndex> {
        WangIndex::ALL
            .into_iter()
            .filter(move |&index| self.contains(index))
    }
}

impl BitOr for SlotMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for SlotMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for SlotMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl FromIterator<WangIndex> for SlotMask {
    fn from_iter<I: IntoIterator<Item = WangIndex>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for index in iter {
            mask.insert(index);
        }
        mask
    }
}

/// Terrain colors at all 8 positions of a tile.
///
/// 0 means "no terrain"; positive values are 1-based color indices of a
/// terrain set.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WangId {
    pub colors: [u32; 8],
}

impl WangId {
    pub const EMPTY: Self = WangId { colors: [0; 8] };

    pub const fn new(colors: [u32; 8]) -> Self {
        Self { colors }
    }

    /// Create a WangId with all positions set to one color
    pub const fn filled(color: u32) -> Self {
        WangId { colors: [color; 8] }
    }

    /// Create a WangId with `color` on the masked positions and 0 elsewhere
    pub fn from_mask(color: u32, mask: SlotMask) -> Self {
        let mut wang_id = Self::EMPTY;
        for index in mask.iter() {
            wang_id.set(index, color);
        }
        wang_id
    }

    pub fn get(&self, index: WangIndex) -> u32 {
        self.colors[index.index()]
    }

    pub fn set(&mut self, index: WangIndex, color: u32) {
        self.colors[index.index()] = color;
    }

    pub fn is_empty(&self) -> bool {
        self.colors.iter().all(|&c| c == 0)
    }

    /// Sum of all labels; zero only for an unlabeled tile
    pub fn sum(&self) -> u64 {
        self.colors.iter().map(|&c| u64::from(c)).sum()
    }

    /// Positions holding `color`
    pub fn positions_of(&self, color: u32) -> SlotMask {
        WangIndex::ALL
            .into_iter()
            .filter(|&index| self.get(index) == color)
            .collect()
    }

    /// Whether `color` appears in any of the masked positions
    pub fn has_color_in(&self, color: u32, mask: SlotMask) -> bool {
        mask.iter().any(|index| self.get(index) == color)
    }

    /// Whether every masked position agrees with `other`
    pub fn matches(&self, other: &WangId, mask: SlotMask) -> bool {
        mask.iter().all(|index| self.get(index) == other.get(index))
    }

    /// Copy of this id with the positions outside `mask` cleared
    pub fn masked(&self, mask: SlotMask) -> Self {
        let mut result = Self::EMPTY;
        for index in mask.iter() {
            result.set(index, self.get(index));
        }
        result
    }

    /// Check if all masked positions hold the same nonzero color
    pub fn uniform_color(&self, mask: SlotMask) -> Option<u32> {
        let mut indices = mask.iter();
        let first = self.get(indices.next()?);
        if first == 0 {
            return None;
        }
        indices.all(|i| self.get(i) == first).then_some(first)
    }
}

impl From<[u32; 8]> for WangId {
    fn from(colors: [u32; 8]) -> Self {
        Self { colors }
    }
}

/// Comma-separated form used by Tiled map files, e.g. `0,1,0,1,0,1,0,1`
impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.colors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

/// Error returned when parsing a comma-separated Wang ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWangIdError(String);

impl fmt::Display for ParseWangIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid wang id \"{}\"", self.0)
    }
}

impl std::error::Error for ParseWangIdError {}

impl FromStr for WangId {
    type Err = ParseWangIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut colors = [0u32; 8];
        let mut parts = s.split(',');
        for color in colors.iter_mut() {
            let part = parts.next().ok_or_else(|| ParseWangIdError(s.to_string()))?;
            *color = part
                .trim()
                .parse()
                .map_err(|_| ParseWangIdError(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ParseWangIdError(s.to_string()));
        }
        Ok(Self { colors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_relations() {
        assert_eq!(WangIndex::Top.opposite(), WangIndex::Bottom);
        assert_eq!(WangIndex::TopLeft.opposite(), WangIndex::BottomRight);
        assert_eq!(WangIndex::TopLeft.next(), WangIndex::Top);
        assert_eq!(WangIndex::Top.prev(), WangIndex::TopLeft);
        assert!(WangIndex::BottomLeft.is_corner());
        assert!(!WangIndex::Left.is_corner());
        assert_eq!(WangIndex::from_index(8), None);
    }

    #[test]
    fn test_slot_masks() {
        let edges: Vec<WangIndex> = SlotMask::EDGES.iter().collect();
        assert_eq!(edges, WangIndex::EDGES.to_vec());
        let corners: SlotMask = WangIndex::CORNERS.into_iter().collect();
        assert_eq!(corners, SlotMask::CORNERS);
        assert_eq!(SlotMask::EDGES | SlotMask::CORNERS, SlotMask::ALL);
        assert_eq!(!SlotMask::EDGES, SlotMask::CORNERS);
        assert!((SlotMask::EDGES & SlotMask::CORNERS).is_empty());
    }

    #[test]
    fn test_matches_only_compares_masked_slots() {
        let a = WangId::new([1, 2, 1, 2, 1, 2, 1, 2]);
        let b = WangId::new([1, 0, 1, 0, 1, 0, 1, 0]);
        assert!(a.matches(&b, SlotMask::EDGES));
        assert!(!a.matches(&b, SlotMask::CORNERS));
        assert!(a.matches(&b, SlotMask::EMPTY));
    }

    #[test]
    fn test_uniform_color() {
        assert_eq!(WangId::filled(3).uniform_color(SlotMask::ALL), Some(3));
        assert_eq!(WangId::EMPTY.uniform_color(SlotMask::ALL), None);
        let corners = WangId::from_mask(2, SlotMask::CORNERS);
        assert_eq!(corners.uniform_color(SlotMask::CORNERS), Some(2));
        assert_eq!(corners.uniform_color(SlotMask::ALL), None);
    }

    #[test]
    fn test_parse_and_display() {
        let wang_id: WangId = "0,1,0,1,0,1,0,12".parse().unwrap();
        assert_eq!(wang_id.colors, [0, 1, 0, 1, 0, 1, 0, 12]);
        assert_eq!(wang_id.to_string(), "0,1,0,1,0,1,0,12");
        assert!("1,2,3".parse::<WangId>().is_err());
        assert!("0,0,0,0,0,0,0,0,0".parse::<WangId>().is_err());
        assert!("0,0,0,x,0,0,0,0".parse::<WangId>().is_err());
    }
}
