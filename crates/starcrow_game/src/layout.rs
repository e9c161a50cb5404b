//! World layout document: which clip set and maps to load, where the player
//! and enemies start, which background and sounds the world uses.
//!
//! The layout is the single authored entry point; everything else (tile
//! grids, animation clips) hangs off paths listed here.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutFile {
    pub version: String,
    pub layout_id: String,
    /// Clip set document path, relative to the working directory.
    pub animations: String,
    /// Exactly two tile map paths; the campaign runs them in order.
    pub maps: Vec<String>,
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,
    #[serde(default = "default_background")]
    pub background: String,
    pub player: PlayerSpawn,
    #[serde(default)]
    pub enemies: Vec<SpawnPoint>,
    #[serde(default)]
    pub ships: Vec<ShipSpawn>,
    #[serde(default)]
    pub planet: Option<SpawnPoint>,
    #[serde(default)]
    pub sounds: Sounds,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlayerSpawn {
    pub start: [f32; 2],
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ShipSpawn {
    pub x: f32,
    pub y: f32,
    /// Drift speed in px/ms; ships cross the backdrop leftward by default.
    #[serde(default = "default_ship_vx")]
    pub vx: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Sounds {
    #[serde(default = "default_theme_sound")]
    pub theme: String,
    #[serde(default = "default_attack_sound")]
    pub attack: String,
}

impl Default for Sounds {
    fn default() -> Self {
        Self {
            theme: default_theme_sound(),
            attack: default_attack_sound(),
        }
    }
}

pub fn load_layout_from_path(layout_path: &Path) -> Result<LayoutFile, String> {
    let raw = fs::read_to_string(layout_path)
        .map_err(|e| format!("Failed to read layout file {}: {e}", layout_path.display()))?;
    let layout: LayoutFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse layout JSON {}: {e}", layout_path.display()))?;
    validate_layout(&layout)?;
    Ok(layout)
}

fn validate_layout(layout: &LayoutFile) -> Result<(), String> {
    if layout.version != "0.1" {
        return Err(format!(
            "Layout validation failed: unsupported version '{}'",
            layout.version
        ));
    }
    if layout.layout_id.is_empty() {
        return Err("Layout validation failed: layout_id is empty".to_string());
    }
    if layout.animations.is_empty() {
        return Err("Layout validation failed: animations path is empty".to_string());
    }
    if layout.maps.len() != 2 {
        return Err(format!(
            "Layout validation failed: expected exactly 2 maps, found {}",
            layout.maps.len()
        ));
    }
    if layout.maps.iter().any(|m| m.is_empty()) {
        return Err("Layout validation failed: map path is empty".to_string());
    }
    if layout.tile_size <= 0 {
        return Err(format!(
            "Layout validation failed: tile_size must be positive, got {}",
            layout.tile_size
        ));
    }
    if layout.background.is_empty() {
        return Err("Layout validation failed: background path is empty".to_string());
    }
    if layout.enemies.is_empty() {
        log::warn!(
            "Layout '{}' spawns no enemies. This is allowed but often accidental.",
            layout.layout_id
        );
    }
    Ok(())
}

const fn default_tile_size() -> i32 {
    32
}

fn default_background() -> String {
    "images/background.png".to_string()
}

const fn default_ship_vx() -> f32 {
    -0.02
}

fn default_theme_sound() -> String {
    "sounds/theme.wav".to_string()
}

fn default_attack_sound() -> String {
    "sounds/caw.wav".to_string()
}
