use serde::{Deserialize, Serialize};

/// Fixed timestep accumulator.
/// Ensures the simulation steps at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Whole-second countdown for the current shot.
///
/// The countdown only moves on `tick`. `advance` turns simulation time into
/// the number of ticks that are due, so the same clock works under a 1 Hz
/// host timer and under frame-driven updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotClock {
    duration: u32,
    remaining: u32,
    #[serde(skip)]
    carry: f32,
}

impl ShotClock {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            carry: 0.0,
        }
    }

    /// Seconds left for the current shot.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Restart the countdown from the full duration. Partial seconds are dropped.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.carry = 0.0;
    }

    /// Count down one second. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Accumulate elapsed time and return how many whole-second ticks are due.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.carry += dt.max(0.0);
        let ticks = self.carry.floor();
        self.carry -= ticks;
        ticks as u32
    }
}

impl Default for ShotClock {
    fn default() -> Self {
        Self::new(60)
    }
}
