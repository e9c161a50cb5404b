//! Tile map: a rectangular grid of single characters with a fixed tile pixel
//! size.
//!
//! The alphabet is open: `g` is solid ground, `b` is a collectible, `.` is
//! empty, and any other character passes through untouched (collision rules
//! treat it as non-solid). Reads outside the grid return the empty sentinel
//! and writes outside the grid are dropped, so probe code never needs a
//! bounds check of its own.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Sentinel returned for any read outside the grid.
pub const EMPTY_TILE: char = '.';
/// Solid ground, honored by every collision probe.
pub const GROUND_TILE: char = 'g';
/// Collectible tile; awards points and converts to [`EMPTY_TILE`] on pickup.
pub const PICKUP_TILE: char = 'b';

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("map has no rows")]
    Empty,
    #[error("map row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("tile size must be positive, got {width}x{height}")]
    BadTileSize { width: i32, height: i32 },
}

/// Rectangular character grid addressed as `(x, y)` in tile coordinates with
/// `(0, 0)` at the top-left.
#[derive(Debug, Clone)]
pub struct TileMap {
    rows: Vec<Vec<char>>,
    tile_width: i32,
    tile_height: i32,
}

impl TileMap {
    /// Parse a map from text: one line per row, one character per column,
    /// all rows the same length. Accepts `\n` and `\r\n` line endings.
    pub fn parse(text: &str, tile_width: i32, tile_height: i32) -> Result<Self, MapError> {
        if tile_width <= 0 || tile_height <= 0 {
            return Err(MapError::BadTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        let rows: Vec<Vec<char>> = text.lines().map(|line| line.chars().collect()).collect();
        let expected = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(MapError::Empty),
        };
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(MapError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }

        Ok(Self {
            rows,
            tile_width,
            tile_height,
        })
    }

    /// Read and parse a map file.
    pub fn load(path: &Path, tile_width: i32, tile_height: i32) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, tile_width, tile_height)
    }

    /// Character at tile `(x, y)`, or [`EMPTY_TILE`] when out of range.
    /// Total: never fails, for any coordinates.
    pub fn tile(&self, x: i32, y: i32) -> char {
        if x < 0 || y < 0 {
            return EMPTY_TILE;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(EMPTY_TILE)
    }

    /// Overwrite the tile at `(x, y)`. Out-of-range writes are no-ops.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: char) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(cell) = self
            .rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = tile;
        }
    }

    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Width in tiles.
    pub fn width(&self) -> i32 {
        self.rows[0].len() as i32
    }

    /// Height in tiles.
    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// World width in pixels.
    pub fn pixel_width(&self) -> i32 {
        self.width() * self.tile_width
    }

    /// World height in pixels.
    pub fn pixel_height(&self) -> i32 {
        self.height() * self.tile_height
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}
