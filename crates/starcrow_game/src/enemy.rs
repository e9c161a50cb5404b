//! Enemy patrol: walk until a wall probe hits, then turn around.
//!
//! Enemies use the same foot-anchor probes as the player but react by
//! reversing instead of stopping, so a patrol platform needs a raised tile
//! at each end. Gravity and kinematics are applied by the world loop in the
//! same order as for the player.

use starcrow_core::{ClipId, ClipSet, TileMap, GROUND_TILE};

use crate::collision::{foot_anchor, probe};
use crate::entity::Entity;
use crate::player::require;

/// Horizontal patrol speed, pixels per millisecond.
pub const PATROL_SPEED: f32 = 0.05;

const CLIP_ENEMY_WALK_RIGHT: &str = "enemy_walk_right";
const CLIP_ENEMY_WALK_LEFT: &str = "enemy_walk_left";

#[derive(Debug, Clone, Copy)]
pub struct EnemyClips {
    pub walk_right: ClipId,
    /// Left-facing frames when the clip set ships them. The stock art has
    /// none, so the right-facing loop plays in both directions.
    pub walk_left: Option<ClipId>,
}

impl EnemyClips {
    pub fn resolve(clips: &ClipSet) -> Result<Self, String> {
        Ok(Self {
            walk_right: require(clips, CLIP_ENEMY_WALK_RIGHT)?,
            walk_left: clips.id(CLIP_ENEMY_WALK_LEFT),
        })
    }
}

/// Land on the floor probe, reverse on either wall probe.
pub fn patrol(enemy: &mut Entity, map: &TileMap, clip_set: &ClipSet, now_ms: u64) {
    let size = enemy.size(clip_set, now_ms);
    let foot = foot_anchor(enemy, size, map);

    if probe(map, foot, 0.6, 0.0) == GROUND_TILE && enemy.vel.y > 0.0 {
        enemy.vel.y = 0.0;
    }
    if probe(map, foot, 1.0, -0.75) == GROUND_TILE && enemy.vel.x > 0.0 {
        enemy.vel.x = -PATROL_SPEED;
    }
    if probe(map, foot, 0.0, -0.5) == GROUND_TILE && enemy.vel.x < 0.0 {
        enemy.vel.x = PATROL_SPEED;
    }
}

/// Pick the walk clip for the current direction, falling back to the
/// right-facing loop when no left clip exists.
pub fn select_walk_clip(enemy: &mut Entity, clips: &EnemyClips, now_ms: u64) {
    let clip = if enemy.vel.x < 0.0 {
        clips.walk_left.unwrap_or(clips.walk_right)
    } else {
        clips.walk_right
    };
    enemy.set_clip(clip, now_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use glam::vec2;
    use starcrow_core::Clip;

    fn clip_set() -> ClipSet {
        let mut set = ClipSet::new();
        let mut clip = Clip::new();
        clip.push_frame("enemy_walk_right", 64, 64, 1000);
        set.insert("enemy_walk_right", clip);
        set
    }

    fn enemy_at(set: &ClipSet, x: f32, y: f32) -> Entity {
        let clip = set.id("enemy_walk_right").unwrap();
        let mut enemy = Entity::new(EntityKind::Enemy, clip, vec2(x, y), 0);
        enemy.vel.x = PATROL_SPEED;
        enemy
    }

    #[test]
    fn test_resolve_requires_right_clip() {
        let set = ClipSet::new();
        let err = EnemyClips::resolve(&set).unwrap_err();
        assert!(err.contains("enemy_walk_right"));
    }

    #[test]
    fn test_resolve_left_clip_is_optional() {
        let clips = EnemyClips::resolve(&clip_set()).unwrap();
        assert!(clips.walk_left.is_none());
    }

    #[test]
    fn test_floor_probe_stops_fall() {
        let set = clip_set();
        let map = TileMap::parse("....\n....\n.g..", 32, 32).unwrap();
        let mut enemy = enemy_at(&set, 32.0, 0.0);
        enemy.vel.y = 0.2;

        patrol(&mut enemy, &map, &set, 0);

        assert_eq!(enemy.vel.y, 0.0);
    }

    #[test]
    fn test_right_wall_reverses_patrol() {
        let set = clip_set();
        let map = TileMap::parse("....\n..g.\n....", 32, 32).unwrap();
        let mut enemy = enemy_at(&set, 32.0, 0.0);

        patrol(&mut enemy, &map, &set, 0);

        assert_eq!(enemy.vel.x, -PATROL_SPEED);
    }

    #[test]
    fn test_left_wall_reverses_patrol() {
        let set = clip_set();
        let map = TileMap::parse("....\n.g..\n....", 32, 32).unwrap();
        let mut enemy = enemy_at(&set, 32.0, 0.0);
        enemy.vel.x = -PATROL_SPEED;

        patrol(&mut enemy, &map, &set, 0);

        assert_eq!(enemy.vel.x, PATROL_SPEED);
    }

    #[test]
    fn test_open_ground_keeps_heading() {
        let set = clip_set();
        let map = TileMap::parse("....\n....\n....", 32, 32).unwrap();
        let mut enemy = enemy_at(&set, 32.0, 0.0);

        patrol(&mut enemy, &map, &set, 0);

        assert_eq!(enemy.vel.x, PATROL_SPEED);
    }

    #[test]
    fn test_walk_clip_falls_back_to_right_frames() {
        let set = clip_set();
        let clips = EnemyClips::resolve(&set).unwrap();
        let mut enemy = enemy_at(&set, 32.0, 0.0);
        enemy.vel.x = -PATROL_SPEED;

        select_walk_clip(&mut enemy, &clips, 0);

        assert_eq!(enemy.playback.clip(), clips.walk_right);
    }

    #[test]
    fn test_walk_clip_uses_left_frames_when_present() {
        let mut set = clip_set();
        let mut clip = Clip::new();
        clip.push_frame("enemy_walk_left", 64, 64, 1000);
        set.insert("enemy_walk_left", clip);
        let clips = EnemyClips::resolve(&set).unwrap();

        let mut enemy = enemy_at(&set, 32.0, 0.0);
        enemy.vel.x = -PATROL_SPEED;
        select_walk_clip(&mut enemy, &clips, 0);
        assert_eq!(enemy.playback.clip(), clips.walk_left.unwrap());

        enemy.vel.x = PATROL_SPEED;
        select_walk_clip(&mut enemy, &clips, 0);
        assert_eq!(enemy.playback.clip(), clips.walk_right);
    }
}
