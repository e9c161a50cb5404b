//! Player controller: turns latched input into velocity, facing, and clip
//! selection, and runs the melee attack window.
//!
//! Ordering inside a tick matters and is fixed: jump bookkeeping, then the
//! horizontal branch (RIGHT evaluated before LEFT, so RIGHT wins when both
//! are held), then the down thrust, then deceleration. The conductor calls
//! `steer` right after gravity and `run_attack` right after `steer`.

use starcrow_core::{ClipId, ClipSet, InputState, Key};

use crate::collision;
use crate::entity::Entity;

const CLIP_IDLE_RIGHT: &str = "player_idle_right";
const CLIP_IDLE_LEFT: &str = "player_idle_left";
const CLIP_MOVE_RIGHT: &str = "player_move_right";
const CLIP_MOVE_LEFT: &str = "player_move_left";
const CLIP_FLY_RIGHT: &str = "player_fly_right";
const CLIP_FLY_LEFT: &str = "player_fly_left";
const CLIP_ATTACK_RIGHT: &str = "player_attack_right";
const CLIP_ATTACK_LEFT: &str = "player_attack_left";

/// Movement constants. The gravity figure is applied as `vy += g * dt * 4`;
/// speeds are pixels per millisecond.
#[derive(Debug, Clone)]
pub struct PlayerTuning {
    pub gravity: f32,
    pub walk_speed: f32,
    /// Horizontal speed once a direction key has been held past
    /// `flight_hold_ms`.
    pub flight_speed: f32,
    pub down_thrust: f32,
    pub jump_impulse: f32,
    /// Per-tick speed bleed once no direction is held.
    pub decel_step: f32,
    /// At or below this magnitude the player snaps to a stop.
    pub stop_threshold: f32,
    pub flight_hold_ms: u64,
    pub attack_window_ms: u64,
    pub max_jumps: u32,
    /// Playback speed multiplier while moving, jumping, or diving.
    pub action_anim_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            gravity: 1.0e-4,
            walk_speed: 0.15,
            flight_speed: 0.3,
            down_thrust: 0.15,
            jump_impulse: -0.2,
            decel_step: 0.0025,
            stop_threshold: 0.03,
            flight_hold_ms: 2000,
            attack_window_ms: 300,
            max_jumps: 2,
            action_anim_speed: 1.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub facing: Facing,
    pub attacking: bool,
    pub attack_started_at: u64,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            facing: Facing::Right,
            attacking: false,
            attack_started_at: 0,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved clip handles for every player animation.
#[derive(Debug, Clone, Copy)]
pub struct PlayerClips {
    pub idle_right: ClipId,
    pub idle_left: ClipId,
    pub move_right: ClipId,
    pub move_left: ClipId,
    pub fly_right: ClipId,
    pub fly_left: ClipId,
    pub attack_right: ClipId,
    pub attack_left: ClipId,
}

impl PlayerClips {
    /// Look up every player clip by its standard name. A missing clip is an
    /// init-time error.
    pub fn resolve(clips: &ClipSet) -> Result<Self, String> {
        Ok(Self {
            idle_right: require(clips, CLIP_IDLE_RIGHT)?,
            idle_left: require(clips, CLIP_IDLE_LEFT)?,
            move_right: require(clips, CLIP_MOVE_RIGHT)?,
            move_left: require(clips, CLIP_MOVE_LEFT)?,
            fly_right: require(clips, CLIP_FLY_RIGHT)?,
            fly_left: require(clips, CLIP_FLY_LEFT)?,
            attack_right: require(clips, CLIP_ATTACK_RIGHT)?,
            attack_left: require(clips, CLIP_ATTACK_LEFT)?,
        })
    }

    pub fn idle_for(&self, facing: Facing) -> ClipId {
        match facing {
            Facing::Right => self.idle_right,
            Facing::Left => self.idle_left,
        }
    }

    fn attack_for(&self, facing: Facing) -> ClipId {
        match facing {
            Facing::Right => self.attack_right,
            Facing::Left => self.attack_left,
        }
    }
}

pub(crate) fn require(clips: &ClipSet, name: &str) -> Result<ClipId, String> {
    clips
        .id(name)
        .ok_or_else(|| format!("Missing animation clip '{name}'"))
}

fn any_direction_held(input: &InputState) -> bool {
    input.is_held(Key::Up)
        || input.is_held(Key::Right)
        || input.is_held(Key::Left)
        || input.is_held(Key::Down)
}

/// Jump, horizontal movement (with charged flight), down thrust, and
/// deceleration, in that order.
pub fn steer(
    player: &mut Entity,
    state: &mut PlayerState,
    input: &InputState,
    clips: &PlayerClips,
    tuning: &PlayerTuning,
    now_ms: u64,
) {
    // Release bookkeeping runs before the press check so a release and
    // re-press arriving in the same tick still spends and re-arms the jump.
    if input.was_released(Key::Up) {
        player.use_jump();
        player.jump_ready = true;
    }
    if input.is_held(Key::Up) && player.jumps_remaining > 0 && player.jump_ready {
        player.set_anim_speed(tuning.action_anim_speed);
        player.vel.y = tuning.jump_impulse;
        player.jump_ready = false;
    }

    if input.is_held(Key::Right) {
        state.facing = Facing::Right;
        player.set_anim_speed(tuning.action_anim_speed);
        let flying = input.hold_ms(Key::Right, now_ms).unwrap_or(0) >= tuning.flight_hold_ms;
        if !state.attacking {
            let clip = if flying { clips.fly_right } else { clips.move_right };
            player.set_clip(clip, now_ms);
        }
        player.vel.x = if flying {
            tuning.flight_speed
        } else {
            tuning.walk_speed
        };
    } else if input.is_held(Key::Left) {
        state.facing = Facing::Left;
        player.set_anim_speed(tuning.action_anim_speed);
        let flying = input.hold_ms(Key::Left, now_ms).unwrap_or(0) >= tuning.flight_hold_ms;
        if !state.attacking {
            let clip = if flying { clips.fly_left } else { clips.move_left };
            player.set_clip(clip, now_ms);
        }
        player.vel.x = if flying {
            -tuning.flight_speed
        } else {
            -tuning.walk_speed
        };
    }

    if input.is_held(Key::Down) {
        player.set_anim_speed(tuning.action_anim_speed);
        player.vel.y = tuning.down_thrust;
    }

    decelerate(player, state, input, clips, tuning, now_ms);
}

/// Bleed horizontal speed once no key is held and no attack is running:
/// large magnitudes shrink by one step, small ones snap to zero and swap in
/// the idle clip. Also called on landing.
pub fn decelerate(
    player: &mut Entity,
    state: &PlayerState,
    input: &InputState,
    clips: &PlayerClips,
    tuning: &PlayerTuning,
    now_ms: u64,
) {
    if player.vel.x != 0.0 && !any_direction_held(input) && !state.attacking {
        if player.vel.x > tuning.stop_threshold {
            player.set_clip(clips.move_right, now_ms);
            player.vel.x -= tuning.decel_step;
        } else if player.vel.x < -tuning.stop_threshold {
            player.set_clip(clips.move_left, now_ms);
            player.vel.x += tuning.decel_step;
        } else if player.vel.x < 0.0 {
            player.set_clip(clips.idle_left, now_ms);
            player.vel.x = 0.0;
        } else {
            player.set_clip(clips.idle_right, now_ms);
            player.vel.x = 0.0;
        }
    }

    if player.vel.x == 0.0 && !state.attacking {
        player.set_clip(clips.idle_for(state.facing), now_ms);
    }
}

/// While the attack window is open: show the attack clip for the current
/// facing, sweep the melee hitbox over the enemies, and close the window
/// after `attack_window_ms`. Returns points scored this tick.
pub fn run_attack(
    player: &mut Entity,
    state: &mut PlayerState,
    input: &InputState,
    clips: &PlayerClips,
    tuning: &PlayerTuning,
    enemies: &mut [Entity],
    clip_set: &ClipSet,
    now_ms: u64,
) -> u32 {
    if !state.attacking {
        return 0;
    }

    player.set_clip(clips.attack_for(state.facing), now_ms);
    let points = collision::attack_sweep(player, state.facing, enemies, clip_set, now_ms);

    if now_ms.saturating_sub(state.attack_started_at) > tuning.attack_window_ms {
        state.attacking = false;
        if !any_direction_held(input) {
            player.set_clip(clips.idle_for(state.facing), now_ms);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use glam::vec2;
    use starcrow_core::Clip;

    const EPS: f32 = 1e-4;

    fn clip_fixture() -> (ClipSet, PlayerClips) {
        let mut set = ClipSet::new();
        for name in [
            CLIP_IDLE_RIGHT,
            CLIP_IDLE_LEFT,
            CLIP_MOVE_RIGHT,
            CLIP_MOVE_LEFT,
            CLIP_FLY_RIGHT,
            CLIP_FLY_LEFT,
            CLIP_ATTACK_RIGHT,
            CLIP_ATTACK_LEFT,
        ] {
            let mut clip = Clip::new();
            clip.push_frame(name, 64, 64, 1000);
            set.insert(name, clip);
        }
        let player_clips = PlayerClips::resolve(&set).unwrap();
        (set, player_clips)
    }

    fn test_player(clips: &PlayerClips) -> (Entity, PlayerState) {
        let player = Entity::new(EntityKind::Player, clips.idle_right, vec2(64.0, 48.0), 0);
        (player, PlayerState::new())
    }

    #[test]
    fn test_resolve_fails_on_missing_clip() {
        let mut set = ClipSet::new();
        let mut clip = Clip::new();
        clip.push_frame("x.png", 64, 64, 1000);
        set.insert(CLIP_IDLE_RIGHT, clip);
        let err = PlayerClips::resolve(&set).unwrap_err();
        assert!(err.contains("Missing animation clip"));
    }

    #[test]
    fn test_walk_right_sets_velocity_facing_and_clip() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        state.facing = Facing::Left;
        let mut input = InputState::new();
        input.key_down(Key::Right, 0);

        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 100);

        assert!((player.vel.x - 0.15).abs() < EPS);
        assert_eq!(state.facing, Facing::Right);
        assert_eq!(player.playback.clip(), clips.move_right);
        assert!((player.playback.speed() - 1.8).abs() < EPS);
    }

    #[test]
    fn test_walk_left_is_negative() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        let mut input = InputState::new();
        input.key_down(Key::Left, 0);

        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 100);

        assert!((player.vel.x + 0.15).abs() < EPS);
        assert_eq!(state.facing, Facing::Left);
        assert_eq!(player.playback.clip(), clips.move_left);
    }

    #[test]
    fn test_right_wins_when_both_directions_held() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        let mut input = InputState::new();
        input.key_down(Key::Left, 0);
        input.key_down(Key::Right, 0);

        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 50);

        assert!(player.vel.x > 0.0);
        assert_eq!(state.facing, Facing::Right);
    }

    #[test]
    fn test_flight_kicks_in_at_exactly_2000ms() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        let tuning = PlayerTuning::default();
        let mut input = InputState::new();
        input.key_down(Key::Right, 0);

        steer(&mut player, &mut state, &input, &clips, &tuning, 1999);
        assert!((player.vel.x - 0.15).abs() < EPS);
        assert_eq!(player.playback.clip(), clips.move_right);

        steer(&mut player, &mut state, &input, &clips, &tuning, 2000);
        assert!((player.vel.x - 0.3).abs() < EPS);
        assert_eq!(player.playback.clip(), clips.fly_right);
    }

    #[test]
    fn test_down_thrust_overwrites_vertical_velocity() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        player.vel.y = -0.2;
        let mut input = InputState::new();
        input.key_down(Key::Down, 0);

        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 10);

        assert!((player.vel.y - 0.15).abs() < EPS);
    }

    #[test]
    fn test_jump_impulse_consumes_ready_flag() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        player.reset_jumps(2);
        let mut input = InputState::new();
        input.key_down(Key::Up, 0);

        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 10);
        assert!((player.vel.y + 0.2).abs() < EPS);
        assert!(!player.jump_ready);

        // Still holding: no second impulse.
        player.vel.y = 0.0;
        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 20);
        assert!(player.vel.y.abs() < EPS);
    }

    #[test]
    fn test_release_spends_jump_and_rearms() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        player.reset_jumps(2);
        let mut input = InputState::new();
        input.key_down(Key::Up, 0);
        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 10);

        input.key_up(Key::Up);
        steer(&mut player, &mut state, &input, &clips, &PlayerTuning::default(), 20);
        assert_eq!(player.jumps_remaining, 1);
        assert!(player.jump_ready);
    }

    #[test]
    fn test_double_jump_ceiling() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        let tuning = PlayerTuning::default();
        player.reset_jumps(tuning.max_jumps);
        let mut input = InputState::new();

        // First press.
        input.key_down(Key::Up, 0);
        steer(&mut player, &mut state, &input, &clips, &tuning, 10);
        assert!((player.vel.y + 0.2).abs() < EPS);

        // Release, then second press.
        input.key_up(Key::Up);
        steer(&mut player, &mut state, &input, &clips, &tuning, 20);
        input.end_frame();
        player.vel.y = 0.0;
        input.key_down(Key::Up, 30);
        steer(&mut player, &mut state, &input, &clips, &tuning, 30);
        assert!((player.vel.y + 0.2).abs() < EPS);

        // Release, then a third press before landing: no impulse left.
        input.key_up(Key::Up);
        steer(&mut player, &mut state, &input, &clips, &tuning, 40);
        input.end_frame();
        player.vel.y = 0.0;
        input.key_down(Key::Up, 50);
        steer(&mut player, &mut state, &input, &clips, &tuning, 50);
        assert!(player.vel.y.abs() < EPS);
        assert_eq!(player.jumps_remaining, 0);
    }

    #[test]
    fn test_decel_bleeds_speed_step_by_step() {
        let (_, clips) = clip_fixture();
        let (mut player, state) = test_player(&clips);
        player.vel.x = 0.1;
        let input = InputState::new();

        decelerate(&mut player, &state, &input, &clips, &PlayerTuning::default(), 0);

        assert!((player.vel.x - 0.0975).abs() < EPS);
        assert_eq!(player.playback.clip(), clips.move_right);
    }

    #[test]
    fn test_decel_snaps_at_threshold() {
        let (_, clips) = clip_fixture();
        let tuning = PlayerTuning::default();
        let input = InputState::new();

        let (mut player, state) = test_player(&clips);
        player.vel.x = 0.03;
        decelerate(&mut player, &state, &input, &clips, &tuning, 0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.playback.clip(), clips.idle_right);

        let (mut player, mut state) = test_player(&clips);
        state.facing = Facing::Left;
        player.vel.x = -0.02;
        decelerate(&mut player, &state, &input, &clips, &tuning, 0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.playback.clip(), clips.idle_left);
    }

    #[test]
    fn test_no_decel_while_direction_held() {
        let (_, clips) = clip_fixture();
        let (mut player, state) = test_player(&clips);
        player.vel.x = 0.1;
        let mut input = InputState::new();
        input.key_down(Key::Down, 0);

        decelerate(&mut player, &state, &input, &clips, &PlayerTuning::default(), 0);

        assert!((player.vel.x - 0.1).abs() < EPS);
    }

    #[test]
    fn test_no_decel_while_attacking() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        player.vel.x = 0.1;
        state.attacking = true;
        let input = InputState::new();

        decelerate(&mut player, &state, &input, &clips, &PlayerTuning::default(), 0);

        assert!((player.vel.x - 0.1).abs() < EPS);
        // The attack clip owns the sprite; decel must not swap it.
        assert_eq!(player.playback.clip(), clips.idle_right);
    }

    #[test]
    fn test_idle_clip_follows_facing_when_stopped() {
        let (_, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        state.facing = Facing::Left;
        let input = InputState::new();

        decelerate(&mut player, &state, &input, &clips, &PlayerTuning::default(), 0);

        assert_eq!(player.playback.clip(), clips.idle_left);
    }

    #[test]
    fn test_attack_window_closes_after_300ms() {
        let (set, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        let tuning = PlayerTuning::default();
        let input = InputState::new();
        state.attacking = true;
        state.attack_started_at = 0;
        let mut enemies: Vec<Entity> = Vec::new();

        run_attack(&mut player, &mut state, &input, &clips, &tuning, &mut enemies, &set, 300);
        assert!(state.attacking);
        assert_eq!(player.playback.clip(), clips.attack_right);

        run_attack(&mut player, &mut state, &input, &clips, &tuning, &mut enemies, &set, 301);
        assert!(!state.attacking);
        assert_eq!(player.playback.clip(), clips.idle_right);
    }

    #[test]
    fn test_steer_keeps_attack_clip_while_moving() {
        let (set, clips) = clip_fixture();
        let (mut player, mut state) = test_player(&clips);
        let tuning = PlayerTuning::default();
        let mut input = InputState::new();
        input.key_down(Key::Right, 0);
        state.attacking = true;
        state.attack_started_at = 0;
        let mut enemies: Vec<Entity> = Vec::new();

        steer(&mut player, &mut state, &input, &clips, &tuning, 100);
        run_attack(&mut player, &mut state, &input, &clips, &tuning, &mut enemies, &set, 100);

        // Movement still applies, but the clip is the attack animation.
        assert!((player.vel.x - 0.15).abs() < EPS);
        assert_eq!(player.playback.clip(), clips.attack_right);
    }
}
