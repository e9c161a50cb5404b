//! Entities: every moving or drawn thing in the world, as one plain struct
//! with a kind tag. Behavior lives in free functions (player.rs, enemy.rs,
//! collision.rs) that borrow entities for the duration of a call.

use glam::Vec2;
use starcrow_core::{ClipId, ClipSet, Playback};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy,
    /// Background ship, drifting behind the action. Never collides.
    Ship,
    /// Static scenery (the planet). Never moves, never collides.
    Decoration,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    /// World position in pixels, top-left of the current frame.
    pub pos: Vec2,
    /// Velocity in pixels per millisecond.
    pub vel: Vec2,
    pub playback: Playback,
    pub visible: bool,
    /// Inactive entities are skipped by every collision check.
    pub active: bool,
    /// Camera offset applied at draw time only.
    pub draw_offset: Vec2,
    pub jumps_remaining: u32,
    pub jump_ready: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, clip: ClipId, pos: Vec2, now_ms: u64) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            playback: Playback::new(clip, now_ms),
            visible: true,
            active: true,
            draw_offset: Vec2::ZERO,
            jumps_remaining: 0,
            jump_ready: true,
        }
    }

    /// Size of the current animation frame in pixels.
    pub fn size(&self, clips: &ClipSet, now_ms: u64) -> Vec2 {
        let clip = clips.clip(self.playback.clip());
        self.playback
            .current_frame(clip, now_ms)
            .map(|frame| frame.size())
            .unwrap_or_default()
    }

    pub fn set_clip(&mut self, clip: ClipId, now_ms: u64) {
        self.playback.set_clip(clip, now_ms);
    }

    pub fn set_anim_speed(&mut self, speed: f32) {
        self.playback.set_speed(speed);
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Integrate position one tick: `pos += vel * dt`.
    pub fn integrate(&mut self, elapsed_ms: u64) {
        self.pos += self.vel * elapsed_ms as f32;
    }

    /// Constant downward acceleration, applied as `vy += g * dt * 4`.
    pub fn apply_gravity(&mut self, gravity: f32, elapsed_ms: u64) {
        self.vel.y += gravity * elapsed_ms as f32 * 4.0;
    }

    /// Spend one jump. Saturates at zero so stray release edges cannot push
    /// the count negative.
    pub fn use_jump(&mut self) {
        self.jumps_remaining = self.jumps_remaining.saturating_sub(1);
    }

    pub fn reset_jumps(&mut self, max_jumps: u32) {
        self.jumps_remaining = max_jumps;
    }
}
