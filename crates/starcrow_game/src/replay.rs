//! Scripted input for headless runs. A replay lists per-tick key states;
//! the driver turns consecutive states into press/release events so the
//! world sees the same edges a windowing host would deliver.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use starcrow_core::{Key, MouseBtn};

use crate::world::World;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    pub frames: Vec<ReplayFrame>,
}

/// Desired key state for one tick. `attack` on a rising edge becomes a
/// mouse click.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub attack: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayScript {
    /// One entry per tick, with `repeat` counts unrolled.
    pub fn expanded(&self) -> Vec<ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(*frame);
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplayScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplayScript) -> Result<(), String> {
    if replay.step_ms == 0 {
        return Err("Replay validation failed: step_ms must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_step_ms() -> u64 {
    16
}

const fn default_repeat() -> u32 {
    1
}

/// Feeds replay frames to a world as input edges.
#[derive(Debug, Default)]
pub struct ReplayDriver {
    prev: ReplayFrame,
}

impl ReplayDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver the edges between the previous frame and this one, before
    /// the world ticks.
    pub fn feed(&mut self, world: &mut World, frame: &ReplayFrame) {
        Self::key_edge(world, Key::Left, self.prev.left, frame.left);
        Self::key_edge(world, Key::Right, self.prev.right, frame.right);
        Self::key_edge(world, Key::Up, self.prev.jump, frame.jump);
        Self::key_edge(world, Key::Down, self.prev.down, frame.down);
        if frame.attack && !self.prev.attack {
            world.mouse_click(MouseBtn::Left);
        }
        self.prev = *frame;
    }

    fn key_edge(world: &mut World, key: Key, was_down: bool, is_down: bool) {
        if is_down && !was_down {
            world.key_down(key);
        }
        if was_down && !is_down {
            world.key_up(key);
        }
    }
}
