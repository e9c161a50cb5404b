//! Pull-style input latching consumed by the simulation tick.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every tick the key is
//!   physically down. Movement intent reads this.
//!
//! - **Hold timers:** each press records when the key went down, so the
//!   controller can ask "held for how long?" (the charged-flight threshold).
//!   OS auto-repeat delivers extra key-down events for a held key; the latch
//!   guard keeps the first timestamp.
//!
//! - **Edge-triggered (released):** true only during the tick after the
//!   transition. `end_frame()` clears edges once the tick has consumed them;
//!   the conductor calls it at the tail of `update`.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug)]
pub struct InputState {
    held: HashSet<Key>,
    hold_started: HashMap<Key, u64>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            hold_started: HashMap::new(),
            just_released: HashSet::new(),
        }
    }

    /// Latch a key. Repeated key-down events for an already-held key keep
    /// the original hold timestamp (HashSet::insert returns false).
    pub fn key_down(&mut self, key: Key, now_ms: u64) {
        if self.held.insert(key) {
            self.hold_started.insert(key, now_ms);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.hold_started.remove(&key);
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Milliseconds the key has been held as of `now_ms`, or `None` when the
    /// key is up.
    pub fn hold_ms(&self, key: Key, now_ms: u64) -> Option<u64> {
        self.hold_started
            .get(&key)
            .map(|&start| now_ms.saturating_sub(start))
    }

    pub fn was_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
