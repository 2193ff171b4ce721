//! Trapezoidal velocity planning on an integer clock
//!
//! Times are counted in clock ticks. Velocities from `velocity_at` are scaled by
//! the clock frequency (steps/s * ticks/s) so the ramp stays in integers.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::StepperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapezoidProfile {
    /// cruise velocity in steps/s, possibly reduced from the requested one
    vmax: u64,
    /// acceleration in steps/s^2
    acc: u64,
    /// move distance in steps
    dx: u64,
    /// clock frequency in ticks/s
    clock: u64,
    /// ticks to ramp up to vmax
    ts: u64,
    /// tick when the ramp down starts
    td: u64,
    /// tick when the move ends
    te: u64,
}

/// Integer square root, rounded down
fn floor_sqrt(n: u64) -> u64 {
    // f64 loses precision above 2^53, correct the estimate both ways
    let mut root = libm::sqrt(n as f64) as u64;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|sq| sq <= n) {
        root += 1;
    }
    root
}

impl TrapezoidProfile {
    /// Plan a move of `dx` steps at up to `vmax` steps/s with `acc` steps/s^2
    ///
    /// Short moves can't reach vmax before they have to brake, so vmax is lowered
    /// to sqrt(dx * acc). Very small moves (dx * acc <= 2) keep the requested vmax
    /// rather than crawling.
    pub fn plan(vmax: u64, acc: u64, dx: u64, clock: u64) -> Result<Self, StepperError> {
        if vmax == 0 {
            return Err(StepperError::ZeroVelocity);
        }
        if acc == 0 {
            return Err(StepperError::ZeroAcceleration);
        }
        if clock == 0 {
            return Err(StepperError::ZeroClock);
        }

        let reach = dx
            .checked_mul(acc)
            .ok_or(StepperError::Overflow { quantity: "dx * acc" })?;
        let short_move = vmax.checked_mul(vmax).map_or(true, |vmax_sq| reach < vmax_sq);
        let vmax = if reach > 2 && short_move {
            let reduced = floor_sqrt(reach);
            debug!("vmax {vmax} unreachable over {dx} steps, reduced to {reduced}");
            reduced
        } else {
            vmax
        };

        let td = dx
            .checked_mul(clock)
            .ok_or(StepperError::Overflow { quantity: "dx * clock" })?
            / vmax;
        let ts = vmax
            .checked_mul(clock)
            .ok_or(StepperError::Overflow { quantity: "vmax * clock" })?
            / acc;
        let te = td
            .checked_add(ts)
            .ok_or(StepperError::Overflow { quantity: "end tick" })?;

        debug!("planned dx {dx}: ts {ts} td {td} te {te}");
        Ok(Self {
            vmax,
            acc,
            dx,
            clock,
            ts,
            td,
            te,
        })
    }

    pub fn vmax(&self) -> u64 {
        self.vmax
    }

    pub fn acc(&self) -> u64 {
        self.acc
    }

    pub fn dx(&self) -> u64 {
        self.dx
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn ramp_ticks(&self) -> u64 {
        self.ts
    }

    pub fn brake_tick(&self) -> u64 {
        self.td
    }

    pub fn end_tick(&self) -> u64 {
        self.te
    }

    pub fn seconds(&self, tick: u64) -> f64 {
        tick as f64 / self.clock as f64
    }

    /// velocity in steps/s * ticks/s
    pub fn velocity_at(&self, tick: u64) -> u64 {
        if tick > self.te {
            return 0;
        }
        let ramp_up = self.acc.saturating_mul(tick.min(self.ts));
        if tick > self.td {
            ramp_up.saturating_sub(self.acc.saturating_mul(tick - self.td))
        } else {
            ramp_up
        }
    }

    pub fn steps_per_second(&self, tick: u64) -> f64 {
        self.velocity_at(tick) as f64 / self.clock as f64
    }

    /// Analytic position in steps, holding at dx once the move has ended
    pub fn position_at(&self, tick: u64) -> f64 {
        let t = self.seconds(tick.min(self.te));
        let ts = self.seconds(self.ts);
        let acc = self.acc as f64;

        let ramp_up = t.min(ts);
        let cruise = (t - ts).max(0.0);
        let ramp_down = (t - self.seconds(self.td)).max(0.0);

        acc * ramp_up * ramp_up / 2.0 + cruise * self.vmax as f64
            - acc * ramp_down * ramp_down / 2.0
    }

    /// Sample the move every `stride` ticks, a zero stride samples every tick
    pub fn samples(&self, stride: u64) -> ProfileSamples {
        ProfileSamples {
            profile: *self,
            stride: stride.max(1),
            tick: 0,
            prev_tick: 0,
            prev_velocity: 0,
            accumulated: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    pub tick: u64,
    pub seconds: f64,
    /// steps/s
    pub velocity: f64,
    /// analytic position in steps
    pub position: f64,
    /// velocity integrated with the trapezoid rule, rounded to whole steps
    pub accumulated: i64,
}

#[derive(Debug, Clone)]
pub struct ProfileSamples {
    profile: TrapezoidProfile,
    stride: u64,
    tick: u64,
    prev_tick: u64,
    prev_velocity: u64,
    accumulated: f64,
}

impl Iterator for ProfileSamples {
    type Item = ProfileSample;

    fn next(&mut self) -> Option<ProfileSample> {
        let profile = &self.profile;
        let tick = self.tick;
        if tick >= profile.te {
            return None;
        }

        let velocity = profile.velocity_at(tick);
        let mean = (velocity as f64 + self.prev_velocity as f64) / 2.0;
        self.accumulated += mean * profile.seconds(tick - self.prev_tick) / profile.clock as f64;

        let sample = ProfileSample {
            tick,
            seconds: profile.seconds(tick),
            velocity: velocity as f64 / profile.clock as f64,
            position: profile.position_at(tick),
            accumulated: (self.accumulated + 0.5) as i64,
        };

        self.prev_velocity = velocity;
        self.prev_tick = tick;
        self.tick = tick.saturating_add(self.stride);
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> TrapezoidProfile {
        TrapezoidProfile::plan(12800, 320, 35_000, 20_000_000).unwrap()
    }

    #[test]
    fn reference_plan_reduces_vmax() {
        let profile = reference();
        assert_eq!(profile.vmax(), 3346);
        assert_eq!(profile.ramp_ticks(), 209_125_000);
        assert_eq!(profile.brake_tick(), 209_205_020);
        assert_eq!(profile.end_tick(), 418_330_020);
    }

    #[test]
    fn reachable_vmax_kept() {
        let profile = TrapezoidProfile::plan(100, 1000, 1000, 1000).unwrap();
        assert_eq!(profile.vmax(), 100);
        assert_eq!(profile.ramp_ticks(), 100);
        assert_eq!(profile.brake_tick(), 10_000);
        assert_eq!(profile.end_tick(), 10_100);
    }

    #[test]
    fn velocity_shape() {
        let profile = reference();
        assert_eq!(profile.velocity_at(0), 0);
        assert_eq!(profile.steps_per_second(profile.ramp_ticks()), 3346.0);
        assert_eq!(
            profile.velocity_at(profile.brake_tick()),
            profile.velocity_at(profile.ramp_ticks())
        );
        assert_eq!(profile.velocity_at(profile.end_tick() + 1), 0);
    }

    #[test]
    fn position_reaches_distance() {
        let profile = reference();
        assert_eq!(profile.position_at(0), 0.0);
        assert!((profile.position_at(profile.end_tick()) - 35_000.0).abs() < 1.0);
        assert_eq!(
            profile.position_at(profile.end_tick()),
            profile.position_at(profile.end_tick() * 2)
        );
    }

    #[test]
    fn samples_integrate_to_distance() {
        let profile = TrapezoidProfile::plan(100, 1000, 1000, 1000).unwrap();
        let mut count = 0;
        let mut last = None;
        for sample in profile.samples(10) {
            count += 1;
            last = Some(sample);
        }
        let last = last.unwrap();
        assert_eq!(count, 1010);
        assert_eq!(last.tick, 10_090);
        assert_eq!(last.accumulated, 1000);
        assert!((last.position - 999.95).abs() < 1e-9);
        assert_eq!(last.velocity, 10.0);
    }

    #[test]
    fn zero_stride_samples_every_tick() {
        let profile = TrapezoidProfile::plan(100, 1000, 1000, 1000).unwrap();
        assert_eq!(profile.samples(0).count(), 10_100);
    }

    #[test]
    fn floor_sqrt_exact_for_large_moves() {
        assert_eq!(floor_sqrt(0), 0);
        assert_eq!(floor_sqrt(15), 3);
        assert_eq!(floor_sqrt(16), 4);
        let root = u64::from(u32::MAX);
        assert_eq!(floor_sqrt(root * root), root);
        assert_eq!(floor_sqrt(root * root - 1), root - 1);
        assert_eq!(floor_sqrt(u64::MAX), root);

        let profile = TrapezoidProfile::plan(u64::MAX, 1, root * root - 1, 1).unwrap();
        assert_eq!(profile.vmax(), root - 1);
    }

    #[test]
    fn refuses_degenerate_inputs() {
        assert_eq!(
            TrapezoidProfile::plan(0, 1, 1, 1),
            Err(StepperError::ZeroVelocity)
        );
        assert_eq!(
            TrapezoidProfile::plan(1, 0, 1, 1),
            Err(StepperError::ZeroAcceleration)
        );
        assert_eq!(
            TrapezoidProfile::plan(1, 1, 1, 0),
            Err(StepperError::ZeroClock)
        );
        assert!(matches!(
            TrapezoidProfile::plan(u64::MAX, 1, u64::MAX, 2),
            Err(StepperError::Overflow { .. })
        ));
    }
}
