//! Level loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable level files.
//! Supports both compressed (brotli) and uncompressed RON files.
//! - Reading: Auto-detects format by checking for valid RON start
//! - Writing: Always uses brotli compression

use std::fs;
use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::tilemap::{Tile, TileKind, Tilemap, TILE_SIZE};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of tiles (grid plus off-grid) in a level
    pub const MAX_TILES: usize = 65_536;
    /// Maximum absolute grid/pixel coordinate
    pub const MAX_COORD: i32 = 1_000_000;
    /// Allowed tile sizes
    pub const MIN_TILE_SIZE: i32 = 4;
    pub const MAX_TILE_SIZE: i32 = 64;
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

/// The serialized form of a level: grid tiles in cell units, off-grid
/// tiles in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub tile_size: i32,
    pub tiles: Vec<Tile>,
    pub offgrid: Vec<Tile>,
}

impl LevelData {
    /// Build the runtime tilemap. Duplicate cells keep the last tile.
    pub fn build_tilemap(&self) -> Tilemap {
        let mut map = Tilemap::new(self.tile_size);
        for tile in &self.tiles {
            map.place(*tile);
        }
        for tile in &self.offgrid {
            map.place_offgrid(*tile);
        }
        map
    }
}

fn validate_tile(tile: &Tile, context: &str) -> Result<(), String> {
    if tile.pos.0.abs() > limits::MAX_COORD || tile.pos.1.abs() > limits::MAX_COORD {
        return Err(format!(
            "{}: tile position ({}, {}) out of range",
            context, tile.pos.0, tile.pos.1
        ));
    }
    Ok(())
}

/// Validate a parsed level before use
pub fn validate_level(data: &LevelData) -> Result<(), LevelError> {
    if data.tile_size < limits::MIN_TILE_SIZE || data.tile_size > limits::MAX_TILE_SIZE {
        return Err(LevelError::ValidationError(format!(
            "tile_size {} outside {}..{}",
            data.tile_size,
            limits::MIN_TILE_SIZE,
            limits::MAX_TILE_SIZE
        )));
    }
    if data.tiles.len() + data.offgrid.len() > limits::MAX_TILES {
        return Err(LevelError::ValidationError(format!(
            "too many tiles ({} > {})",
            data.tiles.len() + data.offgrid.len(),
            limits::MAX_TILES
        )));
    }
    for tile in &data.tiles {
        validate_tile(tile, "grid").map_err(LevelError::ValidationError)?;
    }
    for tile in &data.offgrid {
        validate_tile(tile, "offgrid").map_err(LevelError::ValidationError)?;
    }
    Ok(())
}

/// Parse and validate a level from RON text
pub fn load_level_from_str(contents: &str) -> Result<LevelData, LevelError> {
    let data: LevelData = ron::from_str(contents)?;
    validate_level(&data)?;
    Ok(data)
}

/// Load a level file, auto-detecting brotli compression.
/// RON files start with '(' or whitespace; anything else is brotli.
pub fn load_level(path: &Path) -> Result<LevelData, LevelError> {
    let bytes = fs::read(path)?;

    let is_plain_ron = bytes
        .first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false);

    let contents = if is_plain_ron {
        String::from_utf8(bytes).map_err(|e| {
            LevelError::ValidationError(format!("invalid UTF-8 in level file: {}", e))
        })?
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(&bytes), &mut decompressed)?;
        String::from_utf8(decompressed).map_err(|e| {
            LevelError::ValidationError(format!("invalid UTF-8 after decompression: {}", e))
        })?
    };

    load_level_from_str(&contents)
}

/// Save a level, brotli-compressed
pub fn save_level(path: &Path, data: &LevelData) -> Result<(), LevelError> {
    let ron_text = ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())?;

    // Quality 6, window 22 - good balance of speed/ratio
    let mut compressed = Vec::new();
    brotli::BrotliCompress(
        &mut Cursor::new(ron_text.as_bytes()),
        &mut compressed,
        &brotli::enc::BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        },
    )?;

    fs::write(path, compressed)?;
    Ok(())
}

/// A small built-in level used when no level file is present: a ground
/// strip with a pillar, a rope, one enemy and the player start.
pub fn sample_level() -> LevelData {
    let mut tiles = Vec::new();
    for x in -4..36 {
        tiles.push(Tile { kind: TileKind::Grass, variant: 0, pos: (x, 10) });
        tiles.push(Tile { kind: TileKind::Default, variant: 0, pos: (x, 11) });
    }
    for y in 6..10 {
        tiles.push(Tile { kind: TileKind::Pillar, variant: 0, pos: (14, y) });
    }
    for y in 4..10 {
        tiles.push(Tile { kind: TileKind::Rope, variant: 0, pos: (20, y) });
    }
    tiles.push(Tile { kind: TileKind::Platform, variant: 0, pos: (19, 4) });
    tiles.push(Tile { kind: TileKind::Spawner, variant: 0, pos: (2, 9) });
    tiles.push(Tile { kind: TileKind::Spawner, variant: 1, pos: (28, 9) });

    let offgrid = vec![Tile { kind: TileKind::Decor, variant: 0, pos: (120, 130) }];

    LevelData { tile_size: TILE_SIZE, tiles, offgrid }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_brotli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.ron");

        let data = sample_level();
        save_level(&path, &data).unwrap();

        // On disk it is compressed binary, not RON text
        let raw = fs::read(&path).unwrap();
        assert_ne!(raw.first(), Some(&b'('));

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded.tile_size, data.tile_size);
        assert_eq!(loaded.tiles, data.tiles);
        assert_eq!(loaded.offgrid, data.offgrid);
    }

    #[test]
    fn test_plain_ron_is_auto_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.ron");

        let data = sample_level();
        let text = ron::ser::to_string_pretty(&data, ron::ser::PrettyConfig::default()).unwrap();
        fs::write(&path, text).unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded.tiles.len(), data.tiles.len());
    }

    #[test]
    fn test_validation_rejects_bad_tile_size() {
        let mut data = sample_level();
        data.tile_size = 0;
        assert!(matches!(
            validate_level(&data),
            Err(LevelError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_far_tiles() {
        let mut data = sample_level();
        data.tiles.push(Tile {
            kind: TileKind::Grass,
            variant: 0,
            pos: (limits::MAX_COORD + 1, 0),
        });
        assert!(validate_level(&data).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_level(Path::new("/nonexistent/level.ron")).unwrap_err();
        assert!(matches!(err, LevelError::IoError(_)));
    }

    #[test]
    fn test_build_tilemap_places_everything() {
        let data = sample_level();
        let map = data.build_tilemap();
        assert_eq!(
            map.grid_tile_count(),
            data.tiles.len(),
            "sample level has no duplicate cells"
        );
        assert_eq!(map.offgrid_tiles().len(), 1);
    }
}
