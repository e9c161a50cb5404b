pub mod animation;
pub mod input;
pub mod tilemap;
pub mod time;

pub use animation::{Clip, ClipId, ClipSet, Frame, FrameRect, Playback};
pub use input::{InputState, Key, MouseBtn};
pub use tilemap::{MapError, TileMap, EMPTY_TILE, GROUND_TILE, PICKUP_TILE};
pub use time::SimClock;
