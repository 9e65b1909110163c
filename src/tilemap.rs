//! Tile grid loading and classification
//!
//! A map is a rectangular layout of integer tile ids, one row per line,
//! cells separated by whitespace or commas. Lines starting with `#` are
//! comments. Out-of-bounds lookups read as empty so characters can fall in
//! from above the level and drop out of pits below it.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::Vec2;

/// Empty tile
pub const TILE_EMPTY: u16 = 0;
/// Plain solid wall
pub const TILE_WALL: u16 = 1;
/// First and last bouncy wall variants
pub const TILE_BOUNCY_FIRST: u16 = 2;
pub const TILE_BOUNCY_LAST: u16 = 8;
/// Solid tile with no ground friction
pub const TILE_ICE: u16 = 20;
/// Invisible wall that only blocks the player-controlled body
pub const TILE_PLAYER_WALL: u16 = 21;
/// Largest id accepted by the loader
pub const MAX_TILE_ID: u16 = 255;

/// Default cell size in pixels
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Built-in map layouts, indexed by map slot
const BUILTIN_MAPS: [(&str, &str); 3] = [
    ("Warehouse", include_str!("../assets/maps/warehouse.txt")),
    ("Rooftops", include_str!("../assets/maps/rooftops.txt")),
    ("Arcade", include_str!("../assets/maps/arcade.txt")),
];

/// How a tile id behaves for collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileClass {
    Empty,
    Wall,
    BouncyWall,
    /// Solid, but standing on it applies no ground friction
    Ice,
    /// Solid for the player-controlled body only
    PlayerOnly,
}

impl TileClass {
    pub fn of(id: u16) -> Self {
        match id {
            TILE_EMPTY => TileClass::Empty,
            TILE_BOUNCY_FIRST..=TILE_BOUNCY_LAST => TileClass::BouncyWall,
            TILE_ICE => TileClass::Ice,
            TILE_PLAYER_WALL => TileClass::PlayerOnly,
            _ => TileClass::Wall,
        }
    }
}

/// Fatal problems with level data
#[derive(Debug)]
pub enum LevelError {
    Io { path: PathBuf, source: std::io::Error },
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
    BadCell { row: usize, col: usize, text: String },
    TileIdOutOfRange { row: usize, col: usize, id: u32 },
    BadCellSize { width: f32, height: f32 },
    UnknownMap { index: usize },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read map {}: {}", path.display(), source),
            Self::Empty => write!(f, "map has no tile rows"),
            Self::RaggedRow { row, expected, found } => write!(
                f,
                "map row {} has {} cells, expected {}",
                row, found, expected
            ),
            Self::BadCell { row, col, text } => {
                write!(f, "map cell ({}, {}) is not a tile id: {:?}", col, row, text)
            }
            Self::TileIdOutOfRange { row, col, id } => write!(
                f,
                "map cell ({}, {}) has tile id {} (max {})",
                col, row, id, MAX_TILE_ID
            ),
            Self::BadCellSize { width, height } => {
                write!(f, "cell size must be positive, got {}x{}", width, height)
            }
            Self::UnknownMap { index } => {
                write!(f, "no built-in map {} (have {})", index, BUILTIN_MAPS.len())
            }
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Rectangular tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    cell_width: f32,
    cell_height: f32,
    cols: usize,
    rows: usize,
    tiles: Vec<u16>,
}

impl TileMap {
    /// Build a grid from rows of tile ids
    pub fn from_rows(rows: Vec<Vec<u16>>, cell_width: f32, cell_height: f32) -> Result<Self, LevelError> {
        if !(cell_width > 0.0 && cell_height > 0.0) {
            return Err(LevelError::BadCellSize {
                width: cell_width,
                height: cell_height,
            });
        }
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if cols == 0 {
            return Err(LevelError::Empty);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LevelError::RaggedRow {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
        }
        let row_count = rows.len();
        Ok(Self {
            cell_width,
            cell_height,
            cols,
            rows: row_count,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    /// Parse a text layout
    pub fn parse(text: &str, cell_width: f32, cell_height: f32) -> Result<Self, LevelError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row_index = rows.len();
            let mut row = Vec::new();
            for (col, cell) in line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .enumerate()
            {
                let id: u32 = cell.parse().map_err(|_| LevelError::BadCell {
                    row: row_index,
                    col,
                    text: cell.to_string(),
                })?;
                if id > MAX_TILE_ID as u32 {
                    return Err(LevelError::TileIdOutOfRange {
                        row: row_index,
                        col,
                        id,
                    });
                }
                row.push(id as u16);
            }
            rows.push(row);
        }
        Self::from_rows(rows, cell_width, cell_height)
    }

    /// Load a layout from disk
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::parse(&text, DEFAULT_CELL_SIZE, DEFAULT_CELL_SIZE)?;
        log::info!("Loaded map {} ({}x{})", path.display(), map.cols, map.rows);
        Ok(map)
    }

    /// One of the three built-in maps
    pub fn builtin(index: usize) -> Result<Self, LevelError> {
        let (name, text) = BUILTIN_MAPS
            .get(index)
            .ok_or(LevelError::UnknownMap { index })?;
        let map = Self::parse(text, DEFAULT_CELL_SIZE, DEFAULT_CELL_SIZE)?;
        log::info!("Loaded built-in map {} '{}'", index, name);
        Ok(map)
    }

    pub fn builtin_name(index: usize) -> Option<&'static str> {
        BUILTIN_MAPS.get(index).map(|(name, _)| *name)
    }

    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    #[inline]
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Level size in pixels
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Tile id at a cell (0 outside the grid)
    pub fn tile_at(&self, col: i32, row: i32) -> u16 {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return TILE_EMPTY;
        }
        self.tiles[row as usize * self.cols + col as usize]
    }

    /// Tile id under a pixel position
    pub fn tile_at_point(&self, point: Vec2) -> u16 {
        let col = (point.x / self.cell_width).floor() as i32;
        let row = (point.y / self.cell_height).floor() as i32;
        self.tile_at(col, row)
    }

    /// Where a new session drops the player in
    pub fn player_spawn(&self) -> Vec2 {
        let size = self.pixel_size();
        Vec2::new(size.x * 0.5, size.y * 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let map = TileMap::parse("# comment\n1 0 1\n1,2,21\n", 16.0, 16.0).unwrap();
        assert_eq!(map.cols(), 3);
        assert_eq!(map.rows(), 2);
        assert_eq!(map.tile_at(1, 1), 2);
        assert_eq!(map.tile_at(2, 1), TILE_PLAYER_WALL);
        assert_eq!(map.tile_at_point(Vec2::new(20.0, 20.0)), 2);
        assert_eq!(map.pixel_size(), Vec2::new(48.0, 32.0));
    }

    #[test]
    fn test_out_of_bounds_is_empty() {
        let map = TileMap::parse("1 1\n1 1\n", 16.0, 16.0).unwrap();
        assert_eq!(map.tile_at(-1, 0), TILE_EMPTY);
        assert_eq!(map.tile_at(0, 2), TILE_EMPTY);
        assert_eq!(map.tile_at_point(Vec2::new(-0.5, 4.0)), TILE_EMPTY);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = TileMap::parse("1 1 1\n1 1\n", 16.0, 16.0).unwrap_err();
        assert!(matches!(
            err,
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_bad_cells_rejected() {
        assert!(matches!(
            TileMap::parse("1 x\n", 16.0, 16.0),
            Err(LevelError::BadCell { col: 1, .. })
        ));
        assert!(matches!(
            TileMap::parse("1 900\n", 16.0, 16.0),
            Err(LevelError::TileIdOutOfRange { id: 900, .. })
        ));
        assert!(matches!(TileMap::parse("# only\n\n", 16.0, 16.0), Err(LevelError::Empty)));
        assert!(matches!(
            TileMap::parse("1\n", 0.0, 16.0),
            Err(LevelError::BadCellSize { .. })
        ));
    }

    #[test]
    fn test_tile_classes() {
        assert_eq!(TileClass::of(0), TileClass::Empty);
        assert_eq!(TileClass::of(1), TileClass::Wall);
        assert_eq!(TileClass::of(2), TileClass::BouncyWall);
        assert_eq!(TileClass::of(8), TileClass::BouncyWall);
        assert_eq!(TileClass::of(9), TileClass::Wall);
        assert_eq!(TileClass::of(20), TileClass::Ice);
        assert_eq!(TileClass::of(21), TileClass::PlayerOnly);
    }

    #[test]
    fn test_builtin_maps_load() {
        for index in 0..crate::consts::MAP_COUNT {
            let map = TileMap::builtin(index).unwrap();
            assert_eq!(map.cols(), 30);
            assert_eq!(map.rows(), 17);
            // Bottom-left corner is always floor
            assert_ne!(map.tile_at(0, 16), TILE_EMPTY);
        }
        assert!(matches!(TileMap::builtin(3), Err(LevelError::UnknownMap { index: 3 })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TileMap::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
        assert!(err.to_string().contains("not/here.txt"));
    }
}
