//! Render pull interface: camera math, draw list, HUD.
//!
//! The world owns all state; a renderer host calls [`crate::world::World::scene`]
//! once per frame and draws what it gets. Nothing here touches a GPU, which
//! keeps the simulation testable headless.

use glam::{vec2, Vec2};
use starcrow_core::{FrameRect, TileMap};

/// Host window dimensions. Camera and HUD placement derive from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1900,
            height: 900,
        }
    }
}

/// How far ahead of the player the view sits, in pixels.
pub const CAMERA_X_LEAD: f32 = 175.0;
/// Vertical anchor constant in the camera formula.
const CAMERA_Y_BASE: f32 = 600.0;

/// World-to-screen offset that keeps the player framed:
/// `(-px + 175, -py + (viewport_height - 600))`.
pub fn camera_offset(player_pos: Vec2, viewport: Viewport) -> Vec2 {
    vec2(
        -player_pos.x + CAMERA_X_LEAD,
        -player_pos.y + (viewport.height as f32 - CAMERA_Y_BASE),
    )
}

/// One sprite ready to draw: image handle, source rect, screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub image: String,
    pub rect: FrameRect,
    pub pos: Vec2,
}

pub const HUD_COLOR: [u8; 3] = [255, 165, 0];
const HUD_POINT_SIZE: f32 = 18.0;
const HUD_RIGHT_MARGIN: f32 = 180.0;
const HUD_TOP: f32 = 50.0;

/// Score readout pinned to the top-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub text: String,
    pub pos: Vec2,
    pub color: [u8; 3],
    pub point_size: f32,
    pub bold: bool,
}

impl Hud {
    pub fn score(total: u32, viewport: Viewport) -> Self {
        Self {
            text: format!("Score: {total}"),
            pos: vec2(viewport.width as f32 - HUD_RIGHT_MARGIN, HUD_TOP),
            color: HUD_COLOR,
            point_size: HUD_POINT_SIZE,
            bold: true,
        }
    }
}

/// Everything a renderer needs for one frame, in draw order: backdrop,
/// then `sprites` back to front, then the tile grid at the camera offset,
/// then the HUD in screen space.
pub struct Scene<'a> {
    pub camera: Vec2,
    pub background: &'a str,
    pub sprites: Vec<Drawable>,
    pub map: &'a TileMap,
    pub hud: Hud,
}
