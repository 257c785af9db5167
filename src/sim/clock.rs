//! Sequence clock
//!
//! Replaces the wall-clock timestamp deltas of a browser host with an
//! explicit accumulator advanced only by injected `dt`, so the whole
//! sequence is reproducible without real time passing.

use serde::{Deserialize, Serialize};

/// Elapsed-time accumulator for one playback of the sequence
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnimationClock {
    running: bool,
    elapsed: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from zero
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = 0.0;
    }

    /// Advance by one frame. No-op while stopped.
    pub fn advance(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Return to the idle state
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Seconds since trigger (0 while idle)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
