//! Frame-based sprite animation: immutable clips, a name registry, and
//! per-sprite playback state.
//!
//! Clips are sequences of frames with per-frame durations and always loop.
//! Playback holds the only mutable animation state (start timestamp and a
//! speed multiplier); the current frame is a pure function of the clock, so
//! two runs fed identical timestamps select identical frames.
//!
//! Images are referenced by string handle and sliced by authored pixel
//! rects. The host owns decoding; pixel dimensions in the JSON document are
//! metadata, not measurements.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::{vec2, Vec2};
use serde::Deserialize;

/// Pixel rectangle inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A single animation frame: an image handle, the source rect within it, and
/// how long the frame stays on screen.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: String,
    pub rect: FrameRect,
    pub duration_ms: u64,
}

impl Frame {
    /// Frame extent in world pixels.
    pub fn size(&self) -> Vec2 {
        vec2(self.rect.w as f32, self.rect.h as f32)
    }
}

/// An ordered, looping sequence of frames. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Clip {
    frames: Vec<Frame>,
}

impl Clip {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Append a frame covering an entire image.
    pub fn push_frame(&mut self, image: &str, width: u32, height: u32, duration_ms: u64) {
        self.frames.push(Frame {
            image: image.to_string(),
            rect: FrameRect {
                x: 0,
                y: 0,
                w: width,
                h: height,
            },
            duration_ms,
        });
    }

    /// Slice a sprite sheet row-major into exactly `cols * rows` equal-size
    /// frames, each shown for `per_frame_ms`.
    pub fn from_sheet(
        image: &str,
        sheet_w: u32,
        sheet_h: u32,
        cols: u32,
        rows: u32,
        per_frame_ms: u64,
    ) -> Result<Self, String> {
        if cols == 0 || rows == 0 {
            return Err(format!("sheet '{image}' has zero cols or rows"));
        }
        if per_frame_ms == 0 {
            return Err(format!("sheet '{image}' has zero frame duration"));
        }
        if sheet_w % cols != 0 || sheet_h % rows != 0 {
            return Err(format!(
                "sheet '{image}' is {sheet_w}x{sheet_h}, which does not divide into {cols}x{rows} frames"
            ));
        }

        let frame_w = sheet_w / cols;
        let frame_h = sheet_h / rows;
        let mut frames = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                frames.push(Frame {
                    image: image.to_string(),
                    rect: FrameRect {
                        x: col * frame_w,
                        y: row * frame_h,
                        w: frame_w,
                        h: frame_h,
                    },
                    duration_ms: per_frame_ms,
                });
            }
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Duration of one full cycle in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms).sum()
    }
}

/// Copyable handle into a [`ClipSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(usize);

/// Registry resolving clip names to ids. Ids are assigned in sorted name
/// order on load, so the same document always yields the same handles.
#[derive(Debug, Clone, Default)]
pub struct ClipSet {
    clips: Vec<Clip>,
    names: HashMap<String, ClipId>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip under `name`. Re-inserting a name replaces the clip
    /// but keeps its id.
    pub fn insert(&mut self, name: &str, clip: Clip) -> ClipId {
        if let Some(&id) = self.names.get(name) {
            self.clips[id.0] = clip;
            return id;
        }
        let id = ClipId(self.clips.len());
        self.clips.push(clip);
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<ClipId> {
        self.names.get(name).copied()
    }

    pub fn clip(&self, id: ClipId) -> &Clip {
        &self.clips[id.0]
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Playback state for one sprite: which clip, when it started, how fast.
///
/// The speed multiplier is retroactive: the frame query scales the whole
/// elapsed interval, not just time after the speed change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    clip: ClipId,
    started_at_ms: u64,
    speed: f32,
}

impl Playback {
    pub fn new(clip: ClipId, now_ms: u64) -> Self {
        Self {
            clip,
            started_at_ms: now_ms,
            speed: 1.0,
        }
    }

    pub fn clip(&self) -> ClipId {
        self.clip
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Switch to `clip`, restarting playback from `now_ms`. Setting the clip
    /// that is already playing is a no-op, so steering code may re-select the
    /// current clip every tick without resetting it.
    pub fn set_clip(&mut self, clip: ClipId, now_ms: u64) {
        if self.clip == clip {
            return;
        }
        self.clip = clip;
        self.started_at_ms = now_ms;
    }

    pub fn restart(&mut self, now_ms: u64) {
        self.started_at_ms = now_ms;
    }

    /// Playback rate multiplier, clamped to be non-negative.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Index of the frame showing at `now_ms`. Pure and total: an empty clip
    /// answers 0, a clock before the start timestamp answers 0.
    pub fn frame_index(&self, clip: &Clip, now_ms: u64) -> usize {
        if clip.len() <= 1 {
            return 0;
        }
        let total = clip.total_duration_ms();
        if total == 0 {
            return 0;
        }

        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        let scaled = (elapsed as f64 * self.speed as f64) as u64;
        let mut t = scaled % total;
        for (index, frame) in clip.frames.iter().enumerate() {
            if t < frame.duration_ms {
                return index;
            }
            t -= frame.duration_ms;
        }
        clip.len() - 1
    }

    /// Frame showing at `now_ms`, or `None` for an empty clip.
    pub fn current_frame<'a>(&self, clip: &'a Clip, now_ms: u64) -> Option<&'a Frame> {
        clip.frame(self.frame_index(clip, now_ms))
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct ClipSetJson {
    version: String,
    set_id: String,
    clips: HashMap<String, ClipJson>,
}

#[derive(Debug, Deserialize)]
struct ClipJson {
    #[serde(default)]
    sheet: Option<SheetJson>,
    #[serde(default)]
    frames: Vec<FrameJson>,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Debug, Deserialize)]
struct SheetJson {
    image: String,
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    image: String,
    width: u32,
    height: u32,
    duration_ms: u64,
}

fn default_frame_ms() -> u64 {
    1000
}

/// Load a clip-set document from disk.
pub fn load_clip_set(path: &Path) -> Result<ClipSet, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read clip set {}: {e}", path.display()))?;
    let json: ClipSetJson = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse clip set {}: {e}", path.display()))?;
    validate_clip_set(&json)?;

    let mut names: Vec<&String> = json.clips.keys().collect();
    names.sort();

    let mut set = ClipSet::new();
    for name in names {
        let clip_json = &json.clips[name];
        let clip = match &clip_json.sheet {
            Some(sheet) => Clip::from_sheet(
                &sheet.image,
                sheet.width,
                sheet.height,
                sheet.cols,
                sheet.rows,
                clip_json.frame_ms,
            )
            .map_err(|e| format!("Clip set validation failed: clip '{name}': {e}"))?,
            None => {
                let mut clip = Clip::new();
                for frame in &clip_json.frames {
                    clip.push_frame(&frame.image, frame.width, frame.height, frame.duration_ms);
                }
                clip
            }
        };
        set.insert(name, clip);
    }
    Ok(set)
}

fn validate_clip_set(json: &ClipSetJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Clip set validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.set_id.is_empty() {
        return Err("Clip set validation failed: set_id is empty".to_string());
    }
    for (name, clip) in &json.clips {
        match (&clip.sheet, clip.frames.is_empty()) {
            (Some(_), false) => {
                return Err(format!(
                    "Clip set validation failed: clip '{name}' has both 'sheet' and 'frames'"
                ));
            }
            (None, true) => {
                return Err(format!(
                    "Clip set validation failed: clip '{name}' must provide either 'sheet' or 'frames'"
                ));
            }
            _ => {}
        }
        if let Some(sheet) = &clip.sheet {
            if sheet.image.is_empty() {
                return Err(format!(
                    "Clip set validation failed: clip '{name}' has an empty sheet image"
                ));
            }
        }
        for (i, frame) in clip.frames.iter().enumerate() {
            if frame.image.is_empty() {
                return Err(format!(
                    "Clip set validation failed: clip '{name}' frame {i} has empty image"
                ));
            }
            if frame.duration_ms == 0 {
                return Err(format!(
                    "Clip set validation failed: clip '{name}' frame {i} has zero duration"
                ));
            }
            if frame.width == 0 || frame.height == 0 {
                return Err(format!(
                    "Clip set validation failed: clip '{name}' frame {i} has zero size"
                ));
            }
        }
    }
    Ok(())
}
