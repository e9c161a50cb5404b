//! Collision rules: player vs tiles, melee attack vs enemies, body contact,
//! and collectible pickup.
//!
//! Every tile test is a **probe**: take the player's foot anchor in
//! fractional tile coordinates `(x/TW, (y+h)/TH)`, add a fixed fractional
//! offset, truncate toward zero, and read one tile. The tile map answers the
//! empty sentinel outside the grid, so probes are total and need no bounds
//! checks. The probe offsets and the whole-pixel truncation of the reach
//! points are tuned feel, not derivation: the head bump pushes *down*
//! (`y += 2`), and the attack reach (20 px) exceeds the body-contact insets,
//! which is what lets melee outrange danger.

use glam::{vec2, Vec2};
use starcrow_core::{ClipSet, InputState, TileMap, EMPTY_TILE, GROUND_TILE, PICKUP_TILE};

use crate::entity::Entity;
use crate::player::{self, Facing, PlayerClips, PlayerState, PlayerTuning};

pub const POINTS_PER_PICKUP: u32 = 100;
pub const POINTS_PER_KILL: u32 = 100;

/// Melee reach beyond the player frame, in pixels.
const ATTACK_REACH: f32 = 20.0;
/// Body-contact insets from the frame edges, in pixels.
const BODY_INSET_RIGHT: f32 = 20.0;
const BODY_INSET_LEFT: f32 = 10.0;

/// Foot anchor in fractional tile coordinates.
pub(crate) fn foot_anchor(entity: &Entity, size: Vec2, map: &TileMap) -> Vec2 {
    vec2(
        entity.pos.x / map.tile_width() as f32,
        (entity.pos.y + size.y) / map.tile_height() as f32,
    )
}

/// Read the tile at `foot + (dx, dy)`, truncating toward zero.
pub(crate) fn probe(map: &TileMap, foot: Vec2, dx: f32, dy: f32) -> char {
    map.tile((foot.x + dx) as i32, (foot.y + dy) as i32)
}

/// Player vs terrain. Landing resets the jump counter and runs deceleration;
/// wall probes zero the opposing velocity; the head probe zeroes `vy` and
/// pushes the player down two pixels.
pub fn resolve_tile_collision(
    player: &mut Entity,
    state: &PlayerState,
    input: &InputState,
    clips: &PlayerClips,
    tuning: &PlayerTuning,
    map: &TileMap,
    clip_set: &ClipSet,
    now_ms: u64,
) {
    let size = player.size(clip_set, now_ms);
    let foot = foot_anchor(player, size, map);

    if probe(map, foot, 0.6, 0.0) == GROUND_TILE && player.vel.y > 0.0 {
        player.vel.y = 0.0;
        player.reset_jumps(tuning.max_jumps);
        player::decelerate(player, state, input, clips, tuning, now_ms);
    }
    if probe(map, foot, 1.0, -0.75) == GROUND_TILE && player.vel.x > 0.0 {
        player.vel.x = 0.0;
    }
    if probe(map, foot, 0.0, -0.75) == GROUND_TILE && player.vel.x < 0.0 {
        player.vel.x = 0.0;
    }
    if probe(map, foot, 0.5, -1.5) == GROUND_TILE {
        player.vel.y = 0.0;
        player.pos.y += 2.0;
    }
}

/// Keep the player inside the world: clamp to the map's pixel extents.
/// Resting on the world floor counts as ground contact for jumps.
pub fn clamp_to_map(
    player: &mut Entity,
    map: &TileMap,
    clip_set: &ClipSet,
    now_ms: u64,
    max_jumps: u32,
) {
    let size = player.size(clip_set, now_ms);
    let floor = map.pixel_height() as f32;
    if player.pos.y + size.y > floor {
        player.pos.y = floor - size.y;
        player.reset_jumps(max_jumps);
    }
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
    }
    let right_limit = map.pixel_width() as f32 - size.x;
    if player.pos.x > right_limit {
        player.pos.x = right_limit;
    }
}

/// Melee sweep: a reach point 20 px beyond the leading frame edge, tested
/// strictly inside each active enemy's rectangle. Only the side matching the
/// current facing kills. The vertical test uses the player's top edge alone.
/// Returns points scored.
pub fn attack_sweep(
    player: &Entity,
    facing: Facing,
    enemies: &mut [Entity],
    clip_set: &ClipSet,
    now_ms: u64,
) -> u32 {
    let size = player.size(clip_set, now_ms);
    let reach_right = (player.pos.x + size.x + ATTACK_REACH).trunc();
    let reach_left = (player.pos.x - ATTACK_REACH).trunc();

    let mut points = 0;
    for enemy in enemies.iter_mut() {
        if !enemy.active {
            continue;
        }
        let en_size = enemy.size(clip_set, now_ms);
        let within_y = player.pos.y > enemy.pos.y && player.pos.y < enemy.pos.y + en_size.y;

        if reach_right > enemy.pos.x && reach_right < enemy.pos.x + en_size.x && within_y {
            if facing == Facing::Right {
                enemy.hide();
                enemy.active = false;
                points += POINTS_PER_KILL;
            }
        } else if reach_left > enemy.pos.x && reach_left < enemy.pos.x + en_size.x && within_y {
            if facing == Facing::Left {
                enemy.hide();
                enemy.active = false;
                points += POINTS_PER_KILL;
            }
        }
    }
    points
}

/// Touching an active enemy sends the player back to the respawn point with
/// zero velocity. The enemy is unharmed and the score untouched. Returns
/// whether contact happened.
pub fn body_contact(
    player: &mut Entity,
    enemy: &Entity,
    clip_set: &ClipSet,
    now_ms: u64,
    respawn: Vec2,
) -> bool {
    if !enemy.active {
        return false;
    }
    let size = player.size(clip_set, now_ms);
    let en_size = enemy.size(clip_set, now_ms);
    let body_right = (player.pos.x + size.x).trunc() - BODY_INSET_RIGHT;
    let body_left = player.pos.x.trunc() + BODY_INSET_LEFT;
    let within_y = player.pos.y > enemy.pos.y && player.pos.y < enemy.pos.y + en_size.y;

    let hit = (body_right > enemy.pos.x && body_right < enemy.pos.x + en_size.x && within_y)
        || (body_left > enemy.pos.x && body_left < enemy.pos.x + en_size.x && within_y);
    if hit {
        player.pos = respawn;
        player.vel = Vec2::ZERO;
    }
    hit
}

/// Convert any `b` tile under one of the four pickup probes into empty
/// ground and award points for each. Returns points scored this tick.
pub fn collect_pickups(
    player: &Entity,
    map: &mut TileMap,
    clip_set: &ClipSet,
    now_ms: u64,
) -> u32 {
    let size = player.size(clip_set, now_ms);
    let foot = foot_anchor(player, size, map);

    let mut points = 0;
    for (dx, dy) in [(0.5, 0.0), (0.5, -1.0), (1.0, -0.5), (0.0, -0.5)] {
        let tx = (foot.x + dx) as i32;
        let ty = (foot.y + dy) as i32;
        if map.tile(tx, ty) == PICKUP_TILE {
            map.set_tile(tx, ty, EMPTY_TILE);
            points += POINTS_PER_PICKUP;
        }
    }
    points
}
