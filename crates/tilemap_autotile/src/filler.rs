//! Tiled-Style WangFiller Algorithm
//!
//! Fills a set of constrained cells with Wang tiles, keeping the result
//! consistent with the tiles already around them. Hard constraints come from
//! painted edges and from tiles placed earlier in the same fill; labels of
//! existing tiles and surroundings only act as soft preferences.

use rand::Rng;
use std::collections::{HashMap, HashSet};
use tilemap_core::{FlipFlags, MapView};
use tracing::debug;

use crate::candidates::CandidateIndex;
use crate::matcher::{random_from, CellConstraint, TileMatch, DEFAULT_TRANSFORMS};
use crate::preview::{Preview, PreviewOverlay};
use crate::propagate::{neighbor_wang_id, surrounding_wang_id, Side};
use crate::terrain::TerrainSet;
use crate::transform;
use crate::wang_id::{SlotMask, WangId, WangIndex};

/// Fills a region with Wang tiles based on constraints
pub struct WangFiller<'a> {
    terrain_set: &'a TerrainSet,
    /// Every labeled tile of the terrain set
    candidates: &'a CandidateIndex,
    transforms: &'a [FlipFlags],
    /// Constraints per cell of the fill region
    cells: HashMap<(i32, i32), CellConstraint>,
    /// Fill region in the order cells were first constrained
    region: Vec<(i32, i32)>,
    /// Whether tiles outside the region may be replaced to keep edges consistent
    corrections_enabled: bool,
}

impl<'a> WangFiller<'a> {
    pub fn new(terrain_set: &'a TerrainSet, candidates: &'a CandidateIndex) -> Self {
        Self {
            terrain_set,
            candidates,
            transforms: DEFAULT_TRANSFORMS,
            cells: HashMap::new(),
            region: Vec::new(),
            corrections_enabled: false,
        }
    }

    pub fn with_transforms(mut self, transforms: &'a [FlipFlags]) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn set_corrections_enabled(&mut self, enabled: bool) {
        self.corrections_enabled = enabled;
    }

    pub fn region(&self) -> &[(i32, i32)] {
        &self.region
    }

    /// Get or create the constraint of a region cell
    fn cell_mut(&mut self, x: i32, y: i32) -> &mut CellConstraint {
        if !self.cells.contains_key(&(x, y)) {
            self.region.push((x, y));
        }
        self.cells.entry((x, y)).or_default()
    }

    /// Paint `color` on one edge of (x, y) and on the matching edge of the
    /// cell across it
    pub fn set_edge(&mut self, x: i32, y: i32, side: Side, color: u32) {
        let edge = side.edge();
        let cell = self.cell_mut(x, y);
        cell.desired.set(edge, color);
        cell.mask.insert(edge);

        let (dx, dy) = side.offset();
        let opposite = edge.opposite();
        let neighbor = self.cell_mut(x + dx, y + dy);
        neighbor.desired.set(opposite, color);
        neighbor.mask.insert(opposite);
    }

    /// Lowest-penalty tiles satisfying every hard constraint of `info`
    fn best_matches(&self, info: &CellConstraint) -> Vec<TileMatch> {
        let compared = self.candidates.comparison_mask();
        let hard = info.mask & compared;
        let soft = compared & !info.mask;
        let mut best = Vec::new();
        let mut lowest_penalty = usize::MAX;

        for candidate in self.candidates.iter() {
            for &flags in self.transforms {
                let labels = transform::apply(candidate.wang_id, flags);
                if !labels.matches(&info.desired, hard) {
                    continue;
                }

                let penalty = soft
                    .iter()
                    .filter(|&i| labels.get(i) != info.desired.get(i))
                    .count();

                if penalty < lowest_penalty {
                    lowest_penalty = penalty;
                    best.clear();
                }
                if penalty == lowest_penalty {
                    best.push(TileMatch {
                        tile: candidate.tile,
                        flags,
                        probability: candidate.probability,
                    });
                }
            }
        }

        best
    }

    /// Update an adjacent cell's constraints from a tile placed next to it
    fn update_adjacent(info: &mut CellConstraint, placed: &WangId, direction: WangIndex) {
        let opposite = direction.opposite();
        info.desired.set(opposite, placed.get(direction));
        info.mask.insert(opposite);

        // Corners beside a shared edge are only preferences; keeping them
        // soft stops corrections cascading to tiles further away
        if !direction.is_corner() {
            for (theirs, ours) in [
                (opposite.next(), direction.prev()),
                (opposite.prev(), direction.next()),
            ] {
                if !info.mask.contains(theirs) {
                    info.desired.set(theirs, placed.get(ours));
                }
            }
        }
    }

    /// Resolve the region against `view` and return the placements
    pub fn generate<V, R>(mut self, view: &V, rng: &mut R) -> Preview
    where
        V: MapView + ?Sized,
        R: Rng + ?Sized,
    {
        let region = self.region.clone();
        let in_region: HashSet<(i32, i32)> = region.iter().copied().collect();

        // Phase 1: soft preferences from the current tile, then from surroundings
        for &(x, y) in &region {
            let mut preserved = SlotMask::EMPTY;
            let current = neighbor_wang_id(view, self.terrain_set, x, y);
            let (around, known) = surrounding_wang_id(view, self.terrain_set, x, y);
            let cell = self.cell_mut(x, y);

            if let Some(current) = current {
                for i in (!cell.mask).iter() {
                    cell.desired.set(i, current.get(i));
                    preserved.insert(i);
                }
            }
            for i in (known & !cell.mask & !preserved).iter() {
                cell.desired.set(i, around.get(i));
            }
        }

        // Phase 2: resolve tiles in order, constraining the cells around each one
        let mut preview = Preview::new();
        let mut corrections = Vec::new();

        for &(x, y) in &region {
            let info = self.cells.get(&(x, y)).copied().unwrap_or_default();
            let matches = self.best_matches(&info);
            if matches.is_empty() {
                debug!(x, y, "No tile satisfies the painted edges, leaving cell");
                continue;
            }
            let chosen = random_from(&matches, rng);
            preview.set(x, y, chosen.cell());
            let placed = transform::apply(
                self.terrain_set.wang_id(chosen.tile).unwrap_or_default(),
                chosen.flags,
            );

            for direction in WangIndex::ALL {
                let (dx, dy) = direction.offset();
                let (nx, ny) = (x + dx, y + dy);

                if in_region.contains(&(nx, ny)) {
                    if !preview.contains(nx, ny) {
                        if let Some(info) = self.cells.get_mut(&(nx, ny)) {
                            Self::update_adjacent(info, &placed, direction);
                        }
                    }
                    continue;
                }

                // Outside the region only existing tiles take part, and only
                // across an edge
                if !self.corrections_enabled || direction.is_corner() {
                    continue;
                }
                let Some(existing) = neighbor_wang_id(view, self.terrain_set, nx, ny) else {
                    continue;
                };
                let info = self.cells.entry((nx, ny)).or_default();
                Self::update_adjacent(info, &placed, direction);
                let compared = self.candidates.comparison_mask();
                if !info.accepts(&existing, compared) {
                    corrections.push((nx, ny));
                }
            }
        }

        // Phase 3: single-pass corrections, no further propagation
        let mut corrected = HashSet::new();
        for (x, y) in corrections {
            if !corrected.insert((x, y)) {
                continue;
            }
            let info = self.cells.get(&(x, y)).copied().unwrap_or_default();
            let overlay = PreviewOverlay::new(view, &preview);
            let Some(existing) = neighbor_wang_id(&overlay, self.terrain_set, x, y) else {
                continue;
            };
            if info.accepts(&existing, self.candidates.comparison_mask()) {
                continue;
            }
            let mut info = info;
            for i in (!info.mask).iter() {
                info.desired.set(i, existing.get(i));
            }
            let matches = self.best_matches(&info);
            if matches.is_empty() {
                debug!(x, y, "No correction found for neighbor");
                continue;
            }
            let chosen = random_from(&matches, rng);
            preview.set(x, y, chosen.cell());
        }

        preview
    }
}
