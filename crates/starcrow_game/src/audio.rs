//! Fire-and-forget sound cues. The world pushes handles, the host drains
//! them once per frame and plays whatever backend it has. Headless runs
//! never drain, so the queue is bounded and drops the oldest cue.

use std::collections::VecDeque;

const QUEUE_CAP: usize = 32;

#[derive(Debug, Default)]
pub struct AudioQueue {
    queue: VecDeque<String>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, handle: &str) {
        if self.queue.len() == QUEUE_CAP {
            self.queue.pop_front();
            log::trace!("Audio queue full; dropping oldest cue");
        }
        self.queue.push_back(handle.to_string());
    }

    pub fn drain(&mut self) -> Vec<String> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
