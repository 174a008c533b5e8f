//! Turning strokes into tile placements
//!
//! A stroke is one press-drag-release gesture. Rectangle strokes fill the
//! dragged rectangle with a terrain, matching its border to the surroundings.
//! Edge strokes paint terrain along the edges between the visited cells.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tilemap_core::{FlipFlags, MapView, Rect, TileChange, TileLayer, TileRef, Tileset};
use tracing::debug;

use crate::candidates::CandidateIndex;
use crate::filler::WangFiller;
use crate::matcher::{match_tiles, random_from, CellConstraint, DEFAULT_TRANSFORMS};
use crate::preview::{Preview, PreviewOverlay};
use crate::propagate::{derive_target_wang_id, neighbor_wang_id, Side, Surroundings};
use crate::terrain::{TerrainSet, TerrainSetType};
use crate::wang_id::{WangId, WangIndex};

/// The host's current terrain selection, passed with every event
#[derive(Debug, Clone, Copy)]
pub struct TerrainSelection<'a> {
    pub terrain_set: &'a TerrainSet,
    pub tileset: &'a Tileset,
    pub color: u32,
    /// Tiles carrying `color`, built for this selection
    pub candidates: &'a CandidateIndex,
}

impl TerrainSelection<'_> {
    /// Whether the selected color can be painted on edges
    pub fn has_edges(&self) -> bool {
        self.terrain_set.effective_type_for_color(self.color) != TerrainSetType::Corner
    }
}

/// Painting options shared by all stroke kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeOptions {
    pub surroundings: Surroundings,
    /// Let edge strokes replace neighbors whose edges stop agreeing
    pub corrections: bool,
    /// Flips tried when matching tiles
    pub transforms: Vec<FlipFlags>,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            surroundings: Surroundings::Match,
            corrections: true,
            transforms: DEFAULT_TRANSFORMS.to_vec(),
        }
    }
}

/// Cells of a 4-connected line from `start` to `end`, both included.
///
/// Consecutive cells always share an edge.
pub fn line_points(start: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = start;
    let (x1, y1) = end;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut points = Vec::with_capacity((dx - dy + 1) as usize);

    loop {
        points.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        let step_x = if x == x1 {
            false
        } else if y == y1 {
            true
        } else {
            e2 - dy > dx - e2
        };
        if step_x {
            err += dy;
            x += sx;
        } else {
            err += dx;
            y += sy;
        }
    }

    points
}

/// Edge of a tile under a pointer, from the position within the tile.
///
/// The diagonals split the tile into four triangles, one per edge.
pub fn edge_at(local_x: f32, local_y: f32) -> Side {
    if local_x < local_y {
        if 1.0 - local_x < local_y {
            Side::Bottom
        } else {
            Side::Left
        }
    } else if 1.0 - local_x < local_y {
        Side::Right
    } else {
        Side::Top
    }
}

/// Edge of `to` that faces `from` when moving straight between them
pub fn edge_between(from: (i32, i32), to: (i32, i32)) -> Option<Side> {
    use std::cmp::Ordering::*;
    match (to.0.cmp(&from.0), to.1.cmp(&from.1)) {
        (Greater, _) => Some(Side::Left),
        (Less, _) => Some(Side::Right),
        (Equal, Greater) => Some(Side::Top),
        (Equal, Less) => Some(Side::Bottom),
        (Equal, Equal) => None,
    }
}

/// Label position picked by a sampling click at a position within a tile.
///
/// Corner sets use quadrants, Edge sets the diagonal triangles, Mixed sets a
/// 3x3 grid whose centre has no label.
pub fn sample_index(set_type: TerrainSetType, local_x: f32, local_y: f32) -> Option<WangIndex> {
    match set_type {
        TerrainSetType::Corner => Some(match (local_x < 0.5, local_y < 0.5) {
            (true, true) => WangIndex::TopLeft,
            (true, false) => WangIndex::BottomLeft,
            (false, true) => WangIndex::TopRight,
            (false, false) => WangIndex::BottomRight,
        }),
        TerrainSetType::Edge => Some(edge_at(local_x, local_y).edge()),
        TerrainSetType::Mixed => {
            let third = |v: f32| {
                if v < 1.0 / 3.0 {
                    0
                } else if v < 2.0 / 3.0 {
                    1
                } else {
                    2
                }
            };
            match (third(local_x), third(local_y)) {
                (0, 0) => Some(WangIndex::TopLeft),
                (0, 1) => Some(WangIndex::Left),
                (0, _) => Some(WangIndex::BottomLeft),
                (1, 0) => Some(WangIndex::Top),
                (1, 1) => None,
                (1, _) => Some(WangIndex::Bottom),
                (_, 0) => Some(WangIndex::TopRight),
                (_, 1) => Some(WangIndex::Right),
                (_, _) => Some(WangIndex::BottomRight),
            }
        }
    }
}

/// Edges to paint along a path: each cell takes the edge towards the next one
pub fn line_edges(points: &[(i32, i32)]) -> Vec<((i32, i32), Side)> {
    points
        .windows(2)
        .filter_map(|pair| {
            let (current, next) = (pair[0], pair[1]);
            // the edge of `current` facing `next` is the opposite of `next`'s edge facing `current`
            edge_between(current, next).map(|side| (current, side.opposite()))
        })
        .collect()
}

/// Target labels for every cell of `rect`, in row order
pub fn rectangle_targets<V: MapView + ?Sized>(
    view: &V,
    terrain_set: &TerrainSet,
    rect: Rect,
    color: u32,
    surroundings: Surroundings,
) -> Vec<((i32, i32), WangId)> {
    rect.cells()
        .map(|(x, y)| {
            let target =
                derive_target_wang_id(view, terrain_set, rect, x, y, color, surroundings);
            ((x, y), target)
        })
        .collect()
}

/// Fill `rect` with the selected terrain.
///
/// Cells without a matching tile are left out of the preview.
pub fn paint_rectangle<V, R>(
    view: &V,
    selection: &TerrainSelection<'_>,
    rect: Rect,
    options: &StrokeOptions,
    rng: &mut R,
) -> Preview
where
    V: MapView + ?Sized,
    R: Rng + ?Sized,
{
    let mut preview = Preview::new();
    if rect.is_empty() {
        return preview;
    }

    for ((x, y), target) in rectangle_targets(
        view,
        selection.terrain_set,
        rect,
        selection.color,
        options.surroundings,
    ) {
        let matches = match_tiles(
            &CellConstraint::exact(target),
            selection.candidates,
            &options.transforms,
        );
        if matches.is_empty() {
            debug!(x, y, wang_id = %target, "No tile matches, leaving cell empty");
            continue;
        }
        preview.set(x, y, random_from(&matches, rng).cell());
    }

    preview
}

/// Paint the selected color on the given cell edges
pub fn paint_edges<V, R>(
    view: &V,
    selection: &TerrainSelection<'_>,
    edges: &[((i32, i32), Side)],
    options: &StrokeOptions,
    rng: &mut R,
) -> Preview
where
    V: MapView + ?Sized,
    R: Rng + ?Sized,
{
    if edges.is_empty() {
        return Preview::new();
    }
    let candidates = CandidateIndex::all_labeled(selection.terrain_set, selection.tileset);
    let mut filler =
        WangFiller::new(selection.terrain_set, &candidates).with_transforms(&options.transforms);
    filler.set_corrections_enabled(options.corrections);
    for &((x, y), side) in edges {
        filler.set_edge(x, y, side, selection.color);
    }
    filler.generate(view, rng)
}

/// A complete, non-interactive stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeShape {
    Rectangle(Rect),
    /// A single edge of one cell
    Edge { cell: (i32, i32), side: Side },
    /// Edges along a 4-connected line between two cells
    EdgeLine { from: (i32, i32), to: (i32, i32) },
}

/// Paint a stroke straight into `layer` and return the changes
pub fn paint_stroke<R: Rng + ?Sized>(
    layer: &mut TileLayer,
    selection: &TerrainSelection<'_>,
    shape: StrokeShape,
    options: &StrokeOptions,
    rng: &mut R,
) -> Vec<TileChange> {
    let preview = match shape {
        StrokeShape::Rectangle(rect) => paint_rectangle(&*layer, selection, rect, options, rng),
        StrokeShape::Edge { cell, side } => {
            paint_edges(&*layer, selection, &[(cell, side)], options, rng)
        }
        StrokeShape::EdgeLine { from, to } => {
            let edges = line_edges(&line_points(from, to));
            paint_edges(&*layer, selection, &edges, options, rng)
        }
    };
    preview.commit(layer)
}

/// Which tool gesture the engine implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeKind {
    /// Press, drag a rectangle, release
    Rectangle,
    /// Free-draw along tile edges with a hover preview
    EdgeLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer location: the tile under it and the position within that tile in [0, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub tile: (i32, i32),
    pub local: (f32, f32),
}

impl PointerPosition {
    pub fn new(tile: (i32, i32), local: (f32, f32)) -> Self {
        Self { tile, local }
    }

    /// Position from pixel coordinates on a map with the given tile size
    pub fn from_pixels(x: f32, y: f32, tile_width: u32, tile_height: u32) -> Self {
        let fx = x / tile_width.max(1) as f32;
        let fy = y / tile_height.max(1) as f32;
        Self {
            tile: (fx.floor() as i32, fy.floor() as i32),
            local: (fx - fx.floor(), fy - fy.floor()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    Idle,
    /// Showing what a click would paint (edge strokes only)
    Previewing { tile: (i32, i32), edge: Side },
    Dragging {
        start: (i32, i32),
        current: (i32, i32),
        edge: Option<Side>,
    },
}

/// What an event did
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeResponse {
    Ignored,
    PreviewChanged,
    /// A sampling click picked a color for the current terrain set
    SampledColor(u32),
    /// A sampling click picked a tile
    SampledTile(TileRef),
    /// The stroke ended; the preview should be written as one edit
    Commit(Preview),
}

/// Interactive stroke state machine with its own preview and random source
pub struct StrokeEngine {
    kind: StrokeKind,
    state: StrokeState,
    options: StrokeOptions,
    /// Placements already made by the current edge stroke
    stroke: Preview,
    /// What the user currently sees
    preview: Preview,
    rng: SmallRng,
}

impl StrokeEngine {
    pub fn new(kind: StrokeKind, options: StrokeOptions) -> Self {
        Self::with_rng(kind, options, SmallRng::from_entropy())
    }

    pub fn with_seed(kind: StrokeKind, options: StrokeOptions, seed: u64) -> Self {
        Self::with_rng(kind, options, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(kind: StrokeKind, options: StrokeOptions, rng: SmallRng) -> Self {
        Self {
            kind,
            state: StrokeState::Idle,
            options,
            stroke: Preview::new(),
            preview: Preview::new(),
            rng,
        }
    }

    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn options(&self) -> &StrokeOptions {
        &self.options
    }

    /// The dragged rectangle of an active rectangle stroke
    pub fn rectangle(&self) -> Option<Rect> {
        match (self.kind, self.state) {
            (StrokeKind::Rectangle, StrokeState::Dragging { start, current, .. }) => {
                Some(Rect::from_corners(start, current))
            }
            _ => None,
        }
    }

    /// Drop any preview and return to idle
    pub fn cancel(&mut self) {
        self.state = StrokeState::Idle;
        self.stroke.clear();
        self.preview.clear();
    }

    /// Switch surroundings matching and rebuild the preview
    pub fn set_ignore_surroundings<V: MapView + ?Sized>(
        &mut self,
        ignore: bool,
        view: &V,
        selection: Option<&TerrainSelection<'_>>,
    ) -> StrokeResponse {
        self.options.surroundings = if ignore {
            Surroundings::Ignore
        } else {
            Surroundings::Match
        };
        match (self.kind, selection) {
            (StrokeKind::Rectangle, Some(selection)) => self.refresh_rectangle(view, selection),
            _ => StrokeResponse::Ignored,
        }
    }

    pub fn pointer_down<V: MapView + ?Sized>(
        &mut self,
        button: PointerButton,
        position: PointerPosition,
        view: &V,
        selection: Option<&TerrainSelection<'_>>,
    ) -> StrokeResponse {
        match button {
            PointerButton::Secondary => self.sample(position, view, selection),
            PointerButton::Primary => {
                let Some(selection) = selection else {
                    return StrokeResponse::Ignored;
                };
                match self.kind {
                    StrokeKind::Rectangle => {
                        self.state = StrokeState::Dragging {
                            start: position.tile,
                            current: position.tile,
                            edge: None,
                        };
                        self.refresh_rectangle(view, selection)
                    }
                    StrokeKind::EdgeLine => {
                        // the hovered edge becomes the start of the stroke
                        let edge = match self.state {
                            StrokeState::Previewing { tile, edge } if tile == position.tile => edge,
                            _ => edge_at(position.local.0, position.local.1),
                        };
                        self.stroke = std::mem::take(&mut self.preview);
                        self.state = StrokeState::Dragging {
                            start: position.tile,
                            current: position.tile,
                            edge: Some(edge),
                        };
                        self.show_edge(position.tile, edge, view, selection);
                        StrokeResponse::PreviewChanged
                    }
                }
            }
        }
    }

    pub fn pointer_moved<V: MapView + ?Sized>(
        &mut self,
        position: PointerPosition,
        view: &V,
        selection: Option<&TerrainSelection<'_>>,
    ) -> StrokeResponse {
        let Some(selection) = selection else {
            return StrokeResponse::Ignored;
        };

        match (self.kind, self.state) {
            (StrokeKind::Rectangle, StrokeState::Dragging { start, current, .. }) => {
                if current == position.tile {
                    return StrokeResponse::Ignored;
                }
                self.state = StrokeState::Dragging {
                    start,
                    current: position.tile,
                    edge: None,
                };
                self.refresh_rectangle(view, selection)
            }
            (StrokeKind::Rectangle, _) => StrokeResponse::Ignored,
            (StrokeKind::EdgeLine, StrokeState::Dragging { start, current, edge }) => {
                // moving straight into another tile picks the edge facing the last one
                let straight = position.tile.0 == current.0 || position.tile.1 == current.1;
                let new_edge = if straight {
                    edge_between(current, position.tile).or(edge)
                } else {
                    None
                }
                .unwrap_or_else(|| edge_at(position.local.0, position.local.1));

                if Some(new_edge) == edge && position.tile == current {
                    return StrokeResponse::Ignored;
                }

                let overlay = PreviewOverlay::new(view, &self.stroke);
                let edges = line_edges(&line_points(current, position.tile));
                let segment = paint_edges(&overlay, selection, &edges, &self.options, &mut self.rng);
                self.stroke.merge(segment);

                self.state = StrokeState::Dragging {
                    start,
                    current: position.tile,
                    edge: Some(new_edge),
                };
                self.show_edge(position.tile, new_edge, view, selection);
                StrokeResponse::PreviewChanged
            }
            (StrokeKind::EdgeLine, _) => {
                let edge = edge_at(position.local.0, position.local.1);
                if self.state == (StrokeState::Previewing { tile: position.tile, edge }) {
                    return StrokeResponse::Ignored;
                }
                self.state = StrokeState::Previewing {
                    tile: position.tile,
                    edge,
                };
                self.show_edge(position.tile, edge, view, selection);
                StrokeResponse::PreviewChanged
            }
        }
    }

    pub fn pointer_up(&mut self, button: PointerButton) -> StrokeResponse {
        if button != PointerButton::Primary {
            return StrokeResponse::Ignored;
        }
        let StrokeState::Dragging { .. } = self.state else {
            return StrokeResponse::Ignored;
        };
        self.state = StrokeState::Idle;
        self.stroke.clear();
        StrokeResponse::Commit(std::mem::take(&mut self.preview))
    }

    /// Right-click sampling; never changes the map
    fn sample<V: MapView + ?Sized>(
        &mut self,
        position: PointerPosition,
        view: &V,
        selection: Option<&TerrainSelection<'_>>,
    ) -> StrokeResponse {
        let (x, y) = position.tile;
        let Some(cell) = view.cell_at(x, y) else {
            return StrokeResponse::Ignored;
        };
        match self.kind {
            StrokeKind::Rectangle => StrokeResponse::SampledTile(cell.tile),
            StrokeKind::EdgeLine => {
                let Some(selection) = selection else {
                    return StrokeResponse::Ignored;
                };
                let set = selection.terrain_set;
                let Some(index) = sample_index(set.set_type, position.local.0, position.local.1)
                else {
                    return StrokeResponse::Ignored;
                };
                match neighbor_wang_id(view, set, x, y) {
                    Some(labels) if set.wang_id(cell.tile).is_some() => {
                        StrokeResponse::SampledColor(labels.get(index))
                    }
                    _ => StrokeResponse::Ignored,
                }
            }
        }
    }

    /// Recompute the rectangle preview from scratch
    fn refresh_rectangle<V: MapView + ?Sized>(
        &mut self,
        view: &V,
        selection: &TerrainSelection<'_>,
    ) -> StrokeResponse {
        let Some(rect) = self.rectangle() else {
            return StrokeResponse::Ignored;
        };
        self.preview = paint_rectangle(view, selection, rect, &self.options, &mut self.rng);
        StrokeResponse::PreviewChanged
    }

    /// Preview = stroke so far plus the edge under the pointer
    fn show_edge<V: MapView + ?Sized>(
        &mut self,
        tile: (i32, i32),
        edge: Side,
        view: &V,
        selection: &TerrainSelection<'_>,
    ) {
        let mut preview = self.stroke.clone();
        if selection.has_edges() {
            let overlay = PreviewOverlay::new(view, &self.stroke);
            let hover = paint_edges(&overlay, selection, &[(tile, edge)], &self.options, &mut self.rng);
            preview.merge(hover);
        }
        self.preview = preview;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidateIndex;
    use crate::terrain::Color;
    use crate::wang_id::SlotMask;
    use tilemap_core::{Cell, TileLayer};

    /// Mixed set where tile 0 is all color 5 and tile 1 is all 0 (void),
    /// the rest of the 16 tiles carry no labels
    fn full_and_void() -> (Tileset, TerrainSet) {
        let tileset = Tileset::with_grid("Tiles".to_string(), "tiles.png".to_string(), 16, 16, 4, 4);
        let mut set = TerrainSet::new("Ground".to_string(), tileset.id, TerrainSetType::Mixed);
        for i in 1..=5 {
            set.add_terrain(format!("Terrain {i}"), Color::WHITE);
        }
        set.set_wang_id(0, WangId::filled(5));
        (tileset, set)
    }

    /// Mixed set with the full 3x3 blob of partial tiles for color 5
    fn blob_set() -> (Tileset, TerrainSet) {
        let (tileset, mut set) = full_and_void();
        let patterns: [[u32; 8]; 8] = [
            [0, 0, 5, 5, 5, 0, 0, 0],
            [0, 0, 5, 5, 5, 5, 5, 0],
            [0, 0, 0, 0, 5, 5, 5, 0],
            [5, 5, 5, 5, 5, 0, 0, 0],
            [5, 0, 0, 0, 5, 5, 5, 5],
            [5, 5, 5, 0, 0, 0, 0, 0],
            [5, 5, 5, 0, 0, 0, 5, 5],
            [5, 0, 0, 0, 0, 0, 5, 5],
        ];
        for (i, pattern) in patterns.into_iter().enumerate() {
            set.set_wang_id(i as u32 + 1, WangId::new(pattern));
        }
        (tileset, set)
    }

    fn tile_id(preview: &Preview, x: i32, y: i32) -> Option<u32> {
        preview.get(x, y).map(|c| c.tile.tile_id)
    }

    #[test]
    fn test_line_points_are_four_connected() {
        for end in [(5, 2), (-3, 4), (0, -6), (2, 2), (-4, -1)] {
            let points = line_points((0, 0), end);
            assert_eq!(points.first(), Some(&(0, 0)));
            assert_eq!(points.last(), Some(&end));
            assert_eq!(points.len() as i32, end.0.abs() + end.1.abs() + 1);
            for pair in points.windows(2) {
                let step = (pair[1].0 - pair[0].0).abs() + (pair[1].1 - pair[0].1).abs();
                assert_eq!(step, 1);
            }
        }
        assert_eq!(line_points((3, 3), (3, 3)), vec![(3, 3)]);
    }

    #[test]
    fn test_edge_at_triangles() {
        assert_eq!(edge_at(0.5, 0.1), Side::Top);
        assert_eq!(edge_at(0.9, 0.5), Side::Right);
        assert_eq!(edge_at(0.5, 0.9), Side::Bottom);
        assert_eq!(edge_at(0.1, 0.5), Side::Left);
    }

    #[test]
    fn test_edge_between_and_line_edges() {
        assert_eq!(edge_between((0, 0), (1, 0)), Some(Side::Left));
        assert_eq!(edge_between((0, 0), (0, -1)), Some(Side::Bottom));
        assert_eq!(edge_between((0, 0), (0, 0)), None);

        let edges = line_edges(&[(0, 0), (1, 0), (1, 1)]);
        assert_eq!(edges, vec![((0, 0), Side::Right), ((1, 0), Side::Bottom)]);
    }

    #[test]
    fn test_sample_index_zones() {
        assert_eq!(sample_index(TerrainSetType::Corner, 0.2, 0.7), Some(WangIndex::BottomLeft));
        assert_eq!(sample_index(TerrainSetType::Edge, 0.9, 0.5), Some(WangIndex::Right));
        assert_eq!(sample_index(TerrainSetType::Mixed, 0.5, 0.5), None);
        assert_eq!(sample_index(TerrainSetType::Mixed, 0.9, 0.1), Some(WangIndex::TopRight));
        assert_eq!(sample_index(TerrainSetType::Mixed, 0.5, 0.9), Some(WangIndex::Bottom));
    }

    #[test]
    fn test_pointer_position_from_pixels() {
        let position = PointerPosition::from_pixels(40.0, 8.0, 16, 16);
        assert_eq!(position.tile, (2, 0));
        assert_eq!(position.local, (0.5, 0.5));
    }

    #[test]
    fn test_rectangle_with_only_full_and_void_tiles_paints_centre() {
        let (tileset, mut set) = full_and_void();
        set.set_wang_id(1, WangId::EMPTY);
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 5,
            candidates: &candidates,
        };
        let options = StrokeOptions {
            surroundings: Surroundings::Ignore,
            ..StrokeOptions::default()
        };
        let layer = TileLayer::new(5, 5);
        let mut rng = SmallRng::seed_from_u64(0);

        let preview = paint_rectangle(&layer, &selection, Rect::new(1, 1, 3, 3), &options, &mut rng);
        assert_eq!(preview.len(), 1);
        assert_eq!(tile_id(&preview, 2, 2), Some(0));
    }

    #[test]
    fn test_rectangle_with_blob_tiles_paints_every_cell() {
        let (tileset, set) = blob_set();
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 5,
            candidates: &candidates,
        };
        let options = StrokeOptions {
            surroundings: Surroundings::Ignore,
            ..StrokeOptions::default()
        };
        let layer = TileLayer::new(5, 5);
        let mut rng = SmallRng::seed_from_u64(0);

        let preview = paint_rectangle(&layer, &selection, Rect::new(1, 1, 3, 3), &options, &mut rng);
        let grid: Vec<Option<u32>> = Rect::new(1, 1, 3, 3)
            .cells()
            .map(|(x, y)| tile_id(&preview, x, y))
            .collect();
        assert_eq!(
            grid,
            vec![
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(0),
                Some(5),
                Some(6),
                Some(7),
                Some(8)
            ]
        );
    }

    #[test]
    fn test_rectangle_border_matches_painted_neighbor() {
        let (tileset, set) = blob_set();
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 5,
            candidates: &candidates,
        };
        let mut layer = TileLayer::new(3, 5);
        let mut rng = SmallRng::seed_from_u64(0);
        let ids = |layer: &TileLayer, y: i32| -> Vec<Option<u32>> {
            (0..3).map(|x| layer.tile_at(x, y).map(|t| t.tile_id)).collect()
        };

        // A: a blob in the top three rows
        paint_stroke(
            &mut layer,
            &selection,
            StrokeShape::Rectangle(Rect::new(0, 0, 3, 3)),
            &StrokeOptions {
                surroundings: Surroundings::Ignore,
                ..StrokeOptions::default()
            },
            &mut rng,
        );
        assert_eq!(ids(&layer, 1), vec![Some(4), Some(0), Some(5)]);

        // B: over A's bottom row and below, matching surroundings
        paint_stroke(
            &mut layer,
            &selection,
            StrokeShape::Rectangle(Rect::new(0, 2, 3, 3)),
            &StrokeOptions::default(),
            &mut rng,
        );
        for x in 0..3 {
            let a = neighbor_wang_id(&layer, &set, x, 1).unwrap();
            let b = neighbor_wang_id(&layer, &set, x, 2).unwrap();
            assert_eq!(b.get(WangIndex::TopLeft), a.get(WangIndex::BottomLeft));
            assert_eq!(b.get(WangIndex::Top), a.get(WangIndex::Bottom));
            assert_eq!(b.get(WangIndex::TopRight), a.get(WangIndex::BottomRight));
            assert_eq!(b.get(WangIndex::Top), 5);
        }
        // B's top row continues A instead of starting a new border
        assert_eq!(ids(&layer, 2), vec![Some(4), Some(0), Some(5)]);
        assert_eq!(ids(&layer, 4), vec![Some(6), Some(7), Some(8)]);
    }

    #[test]
    fn test_rectangle_border_reads_flipped_neighbor() {
        let (tileset, set) = blob_set();
        let mut layer = TileLayer::new(3, 3);
        // tile 6 is [5,5,5,0,0,0,0,0]; flipped vertically it shows 5 on its
        // Bottom and Bottom-Right labels
        layer.set_cell(
            1,
            0,
            Some(Cell::with_flags(tileset.tile_ref(6), FlipFlags::VERTICAL)),
        );
        let target = derive_target_wang_id(
            &layer,
            &set,
            Rect::new(1, 1, 1, 1),
            1,
            1,
            5,
            Surroundings::Match,
        );
        assert_eq!(
            target.masked(SlotMask::from_bits(0b1000_0011)),
            WangId::new([5, 5, 0, 0, 0, 0, 0, 0])
        );
    }

    #[test]
    fn test_engine_rectangle_drag_and_commit() {
        let (tileset, set) = blob_set();
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 5,
            candidates: &candidates,
        };
        let mut layer = TileLayer::new(6, 6);
        let mut engine = StrokeEngine::with_seed(StrokeKind::Rectangle, StrokeOptions::default(), 0);

        let at = |x, y| PointerPosition::new((x, y), (0.5, 0.5));
        assert_eq!(
            engine.pointer_down(PointerButton::Primary, at(1, 1), &layer, Some(&selection)),
            StrokeResponse::PreviewChanged
        );
        engine.pointer_moved(at(2, 2), &layer, Some(&selection));
        engine.pointer_moved(at(3, 3), &layer, Some(&selection));
        assert_eq!(engine.rectangle(), Some(Rect::new(1, 1, 3, 3)));
        assert_eq!(engine.preview().len(), 9);

        // same cell again does not recompute
        assert_eq!(
            engine.pointer_moved(at(3, 3), &layer, Some(&selection)),
            StrokeResponse::Ignored
        );

        let StrokeResponse::Commit(preview) = engine.pointer_up(PointerButton::Primary) else {
            panic!("expected a commit");
        };
        assert_eq!(engine.state(), StrokeState::Idle);
        assert!(engine.preview().is_empty());
        assert_eq!(preview.commit(&mut layer).len(), 9);
        assert_eq!(layer.tile_at(2, 2), Some(tileset.tile_ref(0)));
    }

    #[test]
    fn test_engine_toggle_surroundings_recomputes() {
        let (tileset, set) = blob_set();
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 5,
            candidates: &candidates,
        };
        let mut layer = TileLayer::new(4, 4);
        // full tiles all around the top-left corner of the rectangle
        for (x, y) in [(0, 0), (1, 0), (0, 1)] {
            layer.set_cell(x, y, Some(Cell::new(tileset.tile_ref(0))));
        }
        let mut engine = StrokeEngine::with_seed(StrokeKind::Rectangle, StrokeOptions::default(), 0);
        let at = |x, y| PointerPosition::new((x, y), (0.5, 0.5));

        engine.pointer_down(PointerButton::Primary, at(1, 1), &layer, Some(&selection));
        engine.pointer_moved(at(3, 3), &layer, Some(&selection));
        // the top-left cell continues the terrain around it
        assert_eq!(tile_id(engine.preview(), 1, 1), Some(0));

        engine.set_ignore_surroundings(true, &layer, Some(&selection));
        assert_eq!(tile_id(engine.preview(), 1, 1), Some(1));

        engine.set_ignore_surroundings(false, &layer, Some(&selection));
        assert_eq!(tile_id(engine.preview(), 1, 1), Some(0));
    }

    #[test]
    fn test_engine_without_selection_is_noop() {
        let layer = TileLayer::new(2, 2);
        let mut engine = StrokeEngine::with_seed(StrokeKind::Rectangle, StrokeOptions::default(), 0);
        let at = PointerPosition::new((0, 0), (0.5, 0.5));
        assert_eq!(
            engine.pointer_down(PointerButton::Primary, at, &layer, None),
            StrokeResponse::Ignored
        );
        assert_eq!(engine.pointer_up(PointerButton::Primary), StrokeResponse::Ignored);
    }

    #[test]
    fn test_engine_secondary_click_samples() {
        let (tileset, set) = blob_set();
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 1,
            candidates: &candidates,
        };
        let mut layer = TileLayer::new(2, 2);
        layer.set_cell(0, 0, Some(Cell::new(tileset.tile_ref(1))));

        let mut rect = StrokeEngine::with_seed(StrokeKind::Rectangle, StrokeOptions::default(), 0);
        let at = PointerPosition::new((0, 0), (0.9, 0.5));
        assert_eq!(
            rect.pointer_down(PointerButton::Secondary, at, &layer, Some(&selection)),
            StrokeResponse::SampledTile(tileset.tile_ref(1))
        );

        // tile 1 is [0,0,5,5,5,0,0,0]: right edge is 5
        let mut edge = StrokeEngine::with_seed(StrokeKind::EdgeLine, StrokeOptions::default(), 0);
        assert_eq!(
            edge.pointer_down(PointerButton::Secondary, at, &layer, Some(&selection)),
            StrokeResponse::SampledColor(5)
        );
        // centre of a Mixed tile has no label
        let centre = PointerPosition::new((0, 0), (0.5, 0.5));
        assert_eq!(
            edge.pointer_down(PointerButton::Secondary, centre, &layer, Some(&selection)),
            StrokeResponse::Ignored
        );
        assert!(layer.cell_at(1, 1).is_none());
    }

    /// Edge set: tile id = bitmask of edges with road (Top, Right, Bottom, Left)
    fn road_set() -> (Tileset, TerrainSet) {
        let tileset = Tileset::with_grid("Roads".to_string(), "roads.png".to_string(), 16, 16, 4, 4);
        let mut set = TerrainSet::new("Roads".to_string(), tileset.id, TerrainSetType::Edge);
        set.add_terrain("Road".to_string(), Color::BLACK);
        for id in 1..16u32 {
            let mut wang_id = WangId::EMPTY;
            for (bit, edge) in WangIndex::EDGES.into_iter().enumerate() {
                if id & (1 << bit) != 0 {
                    wang_id.set(edge, 1);
                }
            }
            set.set_wang_id(id, wang_id);
        }
        (tileset, set)
    }

    #[test]
    fn test_engine_edge_line_hover_drag_commit() {
        let (tileset, set) = road_set();
        let candidates = CandidateIndex::build(&set, &tileset, 1);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 1,
            candidates: &candidates,
        };
        let mut layer = TileLayer::new(5, 3);
        let mut engine = StrokeEngine::with_seed(StrokeKind::EdgeLine, StrokeOptions::default(), 0);

        // hover near the right edge of (0, 1)
        let hover = PointerPosition::new((0, 1), (0.9, 0.5));
        assert_eq!(
            engine.pointer_moved(hover, &layer, Some(&selection)),
            StrokeResponse::PreviewChanged
        );
        assert!(matches!(engine.state(), StrokeState::Previewing { edge: Side::Right, .. }));
        assert_eq!(tile_id(engine.preview(), 0, 1), Some(0b0010));

        engine.pointer_down(PointerButton::Primary, hover, &layer, Some(&selection));
        engine.pointer_moved(PointerPosition::new((3, 1), (0.5, 0.5)), &layer, Some(&selection));
        let StrokeResponse::Commit(preview) = engine.pointer_up(PointerButton::Primary) else {
            panic!("expected a commit");
        };
        preview.commit(&mut layer);

        assert_eq!(layer.tile_at(0, 1).map(|t| t.tile_id), Some(0b0010));
        assert_eq!(layer.tile_at(1, 1).map(|t| t.tile_id), Some(0b1010));
        assert_eq!(layer.tile_at(2, 1).map(|t| t.tile_id), Some(0b1010));
        // the last cell shows its left edge
        assert_eq!(layer.tile_at(3, 1).map(|t| t.tile_id).map(|id| id & 0b1000), Some(0b1000));
    }

    #[test]
    fn test_engine_edge_line_needs_edge_labels() {
        let (tileset, mut set) = blob_set();
        set.set_type = TerrainSetType::Corner;
        let candidates = CandidateIndex::build(&set, &tileset, 5);
        let selection = TerrainSelection {
            terrain_set: &set,
            tileset: &tileset,
            color: 5,
            candidates: &candidates,
        };
        assert!(!selection.has_edges());
        let layer = TileLayer::new(3, 3);
        let mut engine = StrokeEngine::with_seed(StrokeKind::EdgeLine, StrokeOptions::default(), 0);
        engine.pointer_moved(PointerPosition::new((1, 1), (0.5, 0.1)), &layer, Some(&selection));
        assert!(engine.preview().is_empty());
    }
}
