//! Discrete integrator chain: acceleration -> velocity -> position
//!
//! fast axis: ticks, slow axis: acceleration, output: velocity
//! fast axis: ticks, slow axis: velocity, output: position
//!
//! Each velocity advance bumps the rate of the position slope, so position grows
//! with the square of time.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::StepperError;
use crate::slope::LinearSlope;

/// When the position slope picks up a velocity change within a tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepOrder {
    /// step velocity, step position, then apply the velocity change to position
    #[default]
    StepBothThenAccelerate,
    /// step velocity, apply the change, then step position with the new rate
    Interleaved,
}

/// Counters emitted on every tick where one of them changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub tick: u32,
    pub velocity: u32,
    pub position: u64,
}

/// Iterator tracing constant acceleration over a fixed number of ticks
#[derive(Debug, Clone)]
pub struct AccelerationTrace {
    velocity_slope: LinearSlope,
    position_slope: LinearSlope,
    /// +1 when speeding up, -1 when slowing down
    direction: i32,
    order: StepOrder,
    velocity: u32,
    position: u64,
    tick: u32,
    ticks: u32,
}

impl AccelerationTrace {
    /// Velocity changes by `acceleration` steps over `ticks` ticks, a negative value decelerates
    pub fn new(ticks: u32, acceleration: i32) -> Result<Self, StepperError> {
        debug!("tracing {ticks} ticks at acceleration {acceleration}");
        Ok(Self {
            velocity_slope: LinearSlope::new(ticks, acceleration)?,
            position_slope: LinearSlope::new(ticks, 0)?,
            direction: if acceleration < 0 { -1 } else { 1 },
            order: StepOrder::default(),
            velocity: 0,
            position: 0,
            tick: 0,
            ticks,
        })
    }

    /// Start from a non-zero velocity, in position steps per `ticks`
    #[must_use]
    pub fn starting_at(mut self, velocity: u32) -> Self {
        self.velocity = velocity;
        self.position_slope = self.position_slope.with_slow(velocity);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: StepOrder) -> Self {
        self.order = order;
        self
    }

    pub fn velocity(&self) -> u32 {
        self.velocity
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of ticks already traced
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.ticks
    }

    /// Run every remaining tick and return the final (velocity, position)
    pub fn finish(mut self) -> (u32, u64) {
        while self.advance_tick().is_some() {}
        (self.velocity, self.position)
    }

    /// One tick of the chain, returns whether either counter changed
    fn advance_tick(&mut self) -> Option<bool> {
        if self.is_finished() {
            return None;
        }
        let before = (self.velocity, self.position);

        let (velocity_step, velocity_slope) = self.velocity_slope.step();
        self.velocity_slope = velocity_slope;
        if velocity_step {
            self.velocity = self.velocity.saturating_add_signed(self.direction);
            if self.order == StepOrder::Interleaved {
                self.position_slope = self.position_slope.accelerate(self.direction);
            }
        }

        let (position_step, position_slope) = self.position_slope.step();
        self.position_slope = position_slope;
        if position_step {
            self.position += 1;
        }

        if velocity_step && self.order == StepOrder::StepBothThenAccelerate {
            self.position_slope = self.position_slope.accelerate(self.direction);
        }

        self.tick += 1;
        Some(before != (self.velocity, self.position))
    }
}

impl Iterator for AccelerationTrace {
    type Item = TraceRecord;

    fn next(&mut self) -> Option<TraceRecord> {
        loop {
            let tick = self.tick;
            if self.advance_tick()? {
                let record = TraceRecord {
                    tick,
                    velocity: self.velocity,
                    position: self.position,
                };
                trace!("{record:?}");
                return Some(record);
            }
        }
    }
}
