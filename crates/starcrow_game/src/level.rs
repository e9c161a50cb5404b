//! Level progression: two maps, a score gate between them, and the enemy
//! respawn line used when a map loads.

use starcrow_core::TileMap;

/// Points needed to leave a map. The gate is strict: exactly this score
/// does not advance.
pub const ADVANCE_SCORE: u32 = 1000;

/// Row enemies respawn on when a new map loads, in pixels.
pub const ENEMY_RESPAWN_Y: f32 = 40.0;

/// Where the map run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    Map1,
    Map2,
    Terminated,
}

/// Both campaign maps, parsed once at startup. Transitions hand out clones
/// of the pristine grids; collected pickups never leak between runs.
#[derive(Debug, Clone)]
pub struct LevelSet {
    first: TileMap,
    second: TileMap,
}

impl LevelSet {
    pub fn new(first: TileMap, second: TileMap) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> TileMap {
        self.first.clone()
    }

    pub fn second(&self) -> TileMap {
        self.second.clone()
    }
}

/// Respawn column for the enemy at `index`: 80, 280, 480, ...
pub fn enemy_respawn_x(index: usize) -> f32 {
    80.0 + 200.0 * index as f32
}
