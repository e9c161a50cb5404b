//! The world: every entity, the live map, score, camera, and the fixed-order
//! tick that moves them all.
//!
//! One `update` call runs the whole frame in a strict sequence:
//!
//! 1. player gravity, then the per-tick animation speed reset
//! 2. steering (movement keys, deceleration) and the attack window
//! 3. player vs tile probes
//! 4. clamp to the map extents
//! 5. collectible pickup
//! 6. camera follow, pushed to every entity's draw offset
//! 7. background ships drift
//! 8. enemies: gravity, patrol, walk clip, body contact, move
//! 9. player kinematics
//! 10. HUD total catches up with the live score
//! 11. level transition check
//!
//! The order is observable. Deceleration runs before the attack window so an
//! attack keeps its clip; the HUD total is copied before the transition check
//! so the winning score stays on screen for the tick that loads the next map;
//! the clamp runs before kinematics so a fast player can overshoot the edge
//! for exactly one frame.

use glam::{vec2, Vec2};
use std::path::Path;

use starcrow_core::{
    animation, ClipSet, InputState, Key, MouseBtn, SimClock, TileMap,
};

use crate::audio::AudioQueue;
use crate::collision;
use crate::enemy::{self, EnemyClips};
use crate::entity::{Entity, EntityKind};
use crate::layout::{load_layout_from_path, LayoutFile, Sounds};
use crate::level::{self, LevelPhase, LevelSet};
use crate::player::{self, PlayerClips, PlayerState, PlayerTuning};
use crate::scene::{self, Drawable, Hud, Scene, Viewport};

const CLIP_SHIP: &str = "ship";
const CLIP_PLANET: &str = "planet";

/// Parsed assets a world is built from: the clip set and both campaign maps.
pub struct GameAssets {
    pub clips: ClipSet,
    pub maps: (TileMap, TileMap),
}

impl GameAssets {
    /// Load everything the layout references. Any failure is fatal to init.
    pub fn load(layout: &LayoutFile) -> Result<Self, String> {
        let clips = animation::load_clip_set(Path::new(&layout.animations))?;
        let first = TileMap::load(
            Path::new(&layout.maps[0]),
            layout.tile_size,
            layout.tile_size,
        )
        .map_err(|e| format!("Failed to load map '{}': {e}", layout.maps[0]))?;
        let second = TileMap::load(
            Path::new(&layout.maps[1]),
            layout.tile_size,
            layout.tile_size,
        )
        .map_err(|e| format!("Failed to load map '{}': {e}", layout.maps[1]))?;
        Ok(Self {
            clips,
            maps: (first, second),
        })
    }
}

pub struct World {
    clock: SimClock,
    input: InputState,
    running: bool,

    clips: ClipSet,
    player_clips: PlayerClips,
    enemy_clips: EnemyClips,

    map: TileMap,
    levels: LevelSet,
    phase: LevelPhase,

    player: Entity,
    pstate: PlayerState,
    enemies: Vec<Entity>,
    ships: Vec<Entity>,
    planet: Option<Entity>,
    background: String,

    tuning: PlayerTuning,
    start_pos: Vec2,
    score: u32,
    total: u32,
    camera: Vec2,
    viewport: Viewport,

    audio: AudioQueue,
    sounds: Sounds,
}

impl World {
    /// Load the layout document and everything it references, then build
    /// the world with the default viewport.
    pub fn from_layout(layout_path: &Path) -> Result<Self, String> {
        let layout = load_layout_from_path(layout_path)?;
        let assets = GameAssets::load(&layout)?;
        Self::new(assets, &layout, Viewport::default())
    }

    pub fn new(
        assets: GameAssets,
        layout: &LayoutFile,
        viewport: Viewport,
    ) -> Result<Self, String> {
        let clips = assets.clips;
        let player_clips = PlayerClips::resolve(&clips)?;
        let enemy_clips = EnemyClips::resolve(&clips)?;

        let clock = SimClock::new();
        let now = clock.now_ms();
        let tuning = PlayerTuning::default();

        let levels = LevelSet::new(assets.maps.0, assets.maps.1);
        let map = levels.first();
        log::info!(
            "Loaded map 1: {}x{} tiles ({}x{} px)",
            map.width(),
            map.height(),
            map.pixel_width(),
            map.pixel_height()
        );
        log::debug!("Map grid:\n{map}");

        let start_pos = Vec2::from(layout.player.start);
        let mut player_ent =
            Entity::new(EntityKind::Player, player_clips.idle_right, start_pos, now);
        player_ent.reset_jumps(tuning.max_jumps);

        let enemies = layout
            .enemies
            .iter()
            .map(|spawn| {
                let mut en = Entity::new(
                    EntityKind::Enemy,
                    enemy_clips.walk_right,
                    vec2(spawn.x, spawn.y),
                    now,
                );
                en.vel.x = enemy::PATROL_SPEED;
                en
            })
            .collect();

        let ship_clip = player::require(&clips, CLIP_SHIP)?;
        let ships = layout
            .ships
            .iter()
            .map(|spawn| {
                let mut ship =
                    Entity::new(EntityKind::Ship, ship_clip, vec2(spawn.x, spawn.y), now);
                ship.vel.x = spawn.vx;
                ship
            })
            .collect();

        let planet = match &layout.planet {
            Some(spawn) => {
                let clip = player::require(&clips, CLIP_PLANET)?;
                Some(Entity::new(
                    EntityKind::Decoration,
                    clip,
                    vec2(spawn.x, spawn.y),
                    now,
                ))
            }
            None => None,
        };

        let mut audio = AudioQueue::new();
        audio.play(&layout.sounds.theme);

        Ok(Self {
            clock,
            input: InputState::new(),
            running: true,
            clips,
            player_clips,
            enemy_clips,
            map,
            levels,
            phase: LevelPhase::Map1,
            player: player_ent,
            pstate: PlayerState::new(),
            enemies,
            ships,
            planet,
            background: layout.background.clone(),
            tuning,
            start_pos,
            score: 0,
            total: 0,
            camera: Vec2::ZERO,
            viewport,
            audio,
            sounds: layout.sounds.clone(),
        })
    }

    /// A key went down. Escape stops the run; everything else lands in the
    /// input state with the current clock for hold timing.
    pub fn key_down(&mut self, key: Key) {
        if key == Key::Escape {
            log::info!("Escape pressed; stopping");
            self.stop();
            return;
        }
        let now = self.clock.now_ms();
        self.input.key_down(key, now);
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Escape {
            self.stop();
            return;
        }
        self.input.key_up(key);
    }

    /// Left click: play the attack cue and open the attack window unless one
    /// is already open. The cue plays on every click regardless.
    pub fn mouse_click(&mut self, button: MouseBtn) {
        if button != MouseBtn::Left {
            return;
        }
        self.audio.play(&self.sounds.attack);
        if !self.pstate.attacking {
            self.pstate.attacking = true;
            self.pstate.attack_started_at = self.clock.now_ms();
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// One simulation tick. Does nothing once the world has stopped.
    pub fn update(&mut self, elapsed_ms: u64) {
        if !self.running {
            return;
        }
        let elapsed = self.clock.advance(elapsed_ms);
        let now = self.clock.now_ms();

        self.player.apply_gravity(self.tuning.gravity, elapsed);
        self.player.set_anim_speed(1.0);

        player::steer(
            &mut self.player,
            &mut self.pstate,
            &self.input,
            &self.player_clips,
            &self.tuning,
            now,
        );
        self.score += player::run_attack(
            &mut self.player,
            &mut self.pstate,
            &self.input,
            &self.player_clips,
            &self.tuning,
            &mut self.enemies,
            &self.clips,
            now,
        );

        collision::resolve_tile_collision(
            &mut self.player,
            &self.pstate,
            &self.input,
            &self.player_clips,
            &self.tuning,
            &self.map,
            &self.clips,
            now,
        );
        collision::clamp_to_map(
            &mut self.player,
            &self.map,
            &self.clips,
            now,
            self.tuning.max_jumps,
        );
        self.score += collision::collect_pickups(&self.player, &mut self.map, &self.clips, now);

        self.camera = scene::camera_offset(self.player.pos, self.viewport);
        self.player.draw_offset = self.camera;
        for entity in self
            .enemies
            .iter_mut()
            .chain(self.ships.iter_mut())
            .chain(self.planet.iter_mut())
        {
            entity.draw_offset = self.camera;
        }

        for ship in &mut self.ships {
            ship.integrate(elapsed);
        }

        for i in 0..self.enemies.len() {
            self.enemies[i].apply_gravity(self.tuning.gravity, elapsed);
            enemy::patrol(&mut self.enemies[i], &self.map, &self.clips, now);
            enemy::select_walk_clip(&mut self.enemies[i], &self.enemy_clips, now);
            if collision::body_contact(
                &mut self.player,
                &self.enemies[i],
                &self.clips,
                now,
                self.start_pos,
            ) {
                log::debug!("Body contact; player respawned at {}", self.start_pos);
            }
            self.enemies[i].integrate(elapsed);
        }

        self.player.integrate(elapsed);

        self.total = self.score;

        self.check_level_transition();

        self.input.end_frame();
    }

    /// Advance past a map once the live score clears the gate. Map 2 ends
    /// the run instead.
    fn check_level_transition(&mut self) {
        match self.phase {
            LevelPhase::Map1 if self.score > level::ADVANCE_SCORE => {
                self.map = self.levels.second();
                self.phase = LevelPhase::Map2;
                self.score = 0;
                self.player.pos = self.start_pos;
                self.player.vel = Vec2::ZERO;
                for (i, en) in self.enemies.iter_mut().enumerate() {
                    en.pos = vec2(level::enemy_respawn_x(i), level::ENEMY_RESPAWN_Y);
                }
                log::info!("Score {} clears map 1; loading map 2", self.total);
            }
            LevelPhase::Map2 if self.score > level::ADVANCE_SCORE => {
                self.phase = LevelPhase::Terminated;
                self.running = false;
                log::info!("Score {} clears map 2; campaign complete", self.total);
            }
            _ => {}
        }
    }

    /// Build the draw list for this frame: ships, enemies, planet, player,
    /// back to front. Hidden entities are skipped; the map and HUD ride along.
    pub fn scene(&self) -> Scene<'_> {
        let now = self.clock.now_ms();
        let mut sprites = Vec::new();
        for entity in self
            .ships
            .iter()
            .chain(self.enemies.iter())
            .chain(self.planet.iter())
            .chain(std::iter::once(&self.player))
        {
            if !entity.visible {
                continue;
            }
            let clip = self.clips.clip(entity.playback.clip());
            if let Some(frame) = entity.playback.current_frame(clip, now) {
                sprites.push(Drawable {
                    image: frame.image.clone(),
                    rect: frame.rect,
                    pos: entity.pos + entity.draw_offset,
                });
            }
        }
        Scene {
            camera: self.camera,
            background: &self.background,
            sprites,
            map: &self.map,
            hud: Hud::score(self.total, self.viewport),
        }
    }

    pub fn drain_audio(&mut self) -> Vec<String> {
        self.audio.drain()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player.pos
    }

    pub fn player_vel(&self) -> Vec2 {
        self.player.vel
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }
}

#[cfg(test)]
pub(crate) fn test_world() -> World {
    use crate::layout::{PlayerSpawn, ShipSpawn, SpawnPoint};
    use starcrow_core::Clip;

    const MAP1: &str = "\
....................\n\
....................\n\
....................\n\
....................\n\
....................\n\
....................\n\
.....b..............\n\
gggggggggggggggggggg";
    const MAP2: &str = "\
....................\n\
....................\n\
....................\n\
....................\n\
....................\n\
....................\n\
....................\n\
gggggggggggggggggggg";

    let mut clips = ClipSet::new();
    for name in [
        "player_idle_right",
        "player_idle_left",
        "player_move_right",
        "player_move_left",
        "player_fly_right",
        "player_fly_left",
        "player_attack_right",
        "player_attack_left",
        "enemy_walk_right",
        "ship",
        "planet",
    ] {
        let mut clip = Clip::new();
        clip.push_frame(name, 64, 64, 1000);
        clips.insert(name, clip);
    }

    let layout = LayoutFile {
        version: "0.1".to_string(),
        layout_id: "test_world".to_string(),
        animations: "unused".to_string(),
        maps: vec!["unused1".to_string(), "unused2".to_string()],
        tile_size: 32,
        background: "images/background.png".to_string(),
        player: PlayerSpawn { start: [64.0, 48.0] },
        enemies: vec![
            SpawnPoint { x: 300.0, y: 40.0 },
            SpawnPoint { x: 420.0, y: 40.0 },
            SpawnPoint { x: 540.0, y: 40.0 },
        ],
        ships: vec![ShipSpawn {
            x: 600.0,
            y: 30.0,
            vx: -0.02,
        }],
        planet: Some(SpawnPoint { x: 500.0, y: 100.0 }),
        sounds: Sounds::default(),
    };

    let map1 = TileMap::parse(MAP1, 32, 32).unwrap();
    let map2 = TileMap::parse(MAP2, 32, 32).unwrap();
    World::new(
        GameAssets {
            clips,
            maps: (map1, map2),
        },
        &layout,
        Viewport::default(),
    )
    .unwrap()
}
