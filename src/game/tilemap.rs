//! Tilemap / collision grid
//!
//! A sparse grid of tiles keyed by cell, plus a list of off-grid tiles
//! positioned by pixel. The map is built once from level data and is
//! immutable afterwards, except for `extract` which harvests spawner
//! markers exactly once at load. Queries with out-of-range or malformed
//! positions return "no match" rather than failing the frame.

use macroquad::prelude::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Cell size in pixels.
pub const TILE_SIZE: i32 = 16;

/// The semantic kinds a tile can have. Solidity is a function of kind
/// alone; variants only select artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Default,
    Grass,
    Pillar,
    Platform,
    Decor,
    Rope,
    Spawner,
}

impl TileKind {
    /// Does this kind participate in collision?
    pub fn physics(self) -> bool {
        matches!(
            self,
            TileKind::Default | TileKind::Grass | TileKind::Pillar | TileKind::Platform
        )
    }
}

/// One placed tile. On-grid tiles store their position in cell units;
/// off-grid tiles (and everything returned by `extract`) use pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: (i32, i32),
}

/// Cell offsets covering the 3x3 neighborhood of a query position.
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (0, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

/// The sparse tile grid. At most one grid-aligned tile per cell.
pub struct Tilemap {
    tile_size: i32,
    tiles: std::collections::HashMap<(i32, i32), Tile>,
    offgrid: Vec<Tile>,
}

impl Tilemap {
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size,
            tiles: std::collections::HashMap::new(),
            offgrid: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Place a grid tile, replacing any tile already in that cell.
    pub fn place(&mut self, tile: Tile) {
        self.tiles.insert((tile.pos.0, tile.pos.1), tile);
    }

    /// Add an off-grid tile (pixel-positioned).
    pub fn place_offgrid(&mut self, tile: Tile) {
        self.offgrid.push(tile);
    }

    /// Grid cell containing a world position.
    fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.tile_size as f32).floor() as i32,
            (pos.y / self.tile_size as f32).floor() as i32,
        )
    }

    /// Tiles in the 3x3 cell neighborhood around a world position.
    pub fn tiles_around(&self, pos: Vec2) -> Vec<Tile> {
        let cell = self.cell_of(pos);
        let mut found = Vec::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            if let Some(tile) = self.tiles.get(&(cell.0 + dx, cell.1 + dy)) {
                found.push(*tile);
            }
        }
        found
    }

    /// Bounding rects of the solid tiles around a world position, for
    /// swept collision tests.
    pub fn physics_rects_around(&self, pos: Vec2) -> Vec<Rect> {
        self.tiles_around(pos)
            .into_iter()
            .filter(|tile| tile.kind.physics())
            .map(|tile| self.tile_rect(&tile))
            .collect()
    }

    fn tile_rect(&self, tile: &Tile) -> Rect {
        let ts = self.tile_size as f32;
        Rect::new(tile.pos.0 as f32 * ts, tile.pos.1 as f32 * ts, ts, ts)
    }

    /// Is this world point inside a solid tile?
    pub fn solid_check(&self, pos: Vec2) -> bool {
        self.tiles
            .get(&self.cell_of(pos))
            .map(|tile| tile.kind.physics())
            .unwrap_or(false)
    }

    /// The tile of a given semantic kind at a world point, regardless of
    /// solidity. Used for rope detection.
    pub fn entity_check(&self, pos: Vec2, kind: TileKind) -> Option<Tile> {
        self.tiles
            .get(&self.cell_of(pos))
            .filter(|tile| tile.kind == kind)
            .copied()
    }

    /// Harvest tiles matching any of the given (kind, variant) pairs,
    /// removing them from the map unless `keep` is set. Grid positions
    /// are converted to pixels in the result, so spawn points come out
    /// in world coordinates either way. Runs once at level load.
    pub fn extract(&mut self, pairs: &[(TileKind, u8)], keep: bool) -> Vec<Tile> {
        let matches_pair =
            |tile: &Tile| pairs.iter().any(|p| p.0 == tile.kind && p.1 == tile.variant);
        let mut matches = Vec::new();

        let mut i = 0;
        while i < self.offgrid.len() {
            if matches_pair(&self.offgrid[i]) {
                if keep {
                    matches.push(self.offgrid[i]);
                    i += 1;
                } else {
                    matches.push(self.offgrid.remove(i));
                }
            } else {
                i += 1;
            }
        }

        let cells: Vec<(i32, i32)> = self
            .tiles
            .iter()
            .filter(|(_, tile)| matches_pair(tile))
            .map(|(cell, _)| *cell)
            .collect();
        for cell in cells {
            let mut tile = if keep {
                self.tiles[&cell]
            } else {
                match self.tiles.remove(&cell) {
                    Some(t) => t,
                    None => continue,
                }
            };
            tile.pos = (tile.pos.0 * self.tile_size, tile.pos.1 * self.tile_size);
            matches.push(tile);
        }

        matches
    }

    /// Grid tiles whose cells intersect a pixel-space viewport, in
    /// row-major order. The renderer walks only the visible cells.
    pub fn visible_tiles(&self, scroll: Vec2, view: Vec2) -> Vec<Tile> {
        let ts = self.tile_size as f32;
        let x0 = (scroll.x / ts).floor() as i32;
        let x1 = ((scroll.x + view.x) / ts).floor() as i32;
        let y0 = (scroll.y / ts).floor() as i32;
        let y1 = ((scroll.y + view.y) / ts).floor() as i32;

        let mut visible = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(tile) = self.tiles.get(&(x, y)) {
                    visible.push(*tile);
                }
            }
        }
        visible
    }

    /// Off-grid tiles, rendered behind the grid.
    pub fn offgrid_tiles(&self) -> &[Tile] {
        &self.offgrid
    }

    /// Pixel position of a tile's cell column (used to snap the player
    /// onto a rope).
    pub fn tile_center_x(&self, tile: &Tile) -> f32 {
        tile.pos.0 as f32 * self.tile_size as f32 + self.tile_size as f32 / 2.0
    }

    pub fn grid_tile_count(&self) -> usize {
        self.tiles.len()
    }
}

// Convenience for tests and headless callers.
pub fn grid_tile(kind: TileKind, variant: u8, x: i32, y: i32) -> Tile {
    Tile { kind, variant, pos: (x, y) }
}
