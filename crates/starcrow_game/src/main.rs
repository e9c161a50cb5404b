//! Starcrow -- side-scrolling platformer simulation core and headless runner.
//!
//! Architecture: the binary is a replay host. Each tick it:
//!
//!   1. feeds the next scripted frame to the world as input edges
//!   2. calls `World::update` with the script's fixed step
//!   3. drains audio cues to the debug log
//!
//! A windowed host would drive the same `World` surface: deliver real key
//! and mouse events, call `update` with the measured delta, then pull
//! `scene()` and draw it. Nothing in the simulation knows which host it has.

mod audio;
mod collision;
mod enemy;
mod entity;
mod layout;
mod level;
mod player;
mod replay;
mod scene;
mod world;

use std::path::Path;

use replay::{load_replay_from_path, ReplayDriver};
use world::World;

const LAYOUT_PATH: &str = "assets/layout.json";
const DEFAULT_REPLAY_PATH: &str = "assets/replays/demo.json";
/// Ticks between progress lines in the debug log.
const LOG_EVERY_TICKS: usize = 120;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starcrow simulation core starting...");

    let replay_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_REPLAY_PATH.to_string());

    let mut world =
        World::from_layout(Path::new(LAYOUT_PATH)).unwrap_or_else(|err| panic!("{err}"));
    let script =
        load_replay_from_path(Path::new(&replay_path)).unwrap_or_else(|err| panic!("{err}"));
    let frames = script.expanded();
    log::info!(
        "Replaying {} ({} ticks at {} ms)",
        replay_path,
        frames.len(),
        script.step_ms
    );

    let mut driver = ReplayDriver::new();
    for (tick, frame) in frames.iter().enumerate() {
        if !world.running() {
            break;
        }
        driver.feed(&mut world, frame);
        world.update(script.step_ms);

        for cue in world.drain_audio() {
            log::debug!("audio: {cue}");
        }
        if (tick + 1) % LOG_EVERY_TICKS == 0 {
            log::debug!(
                "tick {}: player {} score {}",
                tick + 1,
                world.player_pos(),
                world.score()
            );
        }
    }

    log::info!(
        "Run complete: {:?}, score {}, total {}",
        world.phase(),
        world.score(),
        world.total()
    );
}
