use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::StepperError;

/// Bresenham slope tracking a slow axis against a fast (controlling) one
///
/// Every call to `step` moves the fast axis by one and reports whether the slow
/// axis should advance too. Over `fast` steps the slow axis advances exactly
/// `slow` times, with the advances spread as evenly as integer maths allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearSlope {
    /// length of the fast-moving axis
    fast: NonZeroU32,
    /// length of the slow-moving axis
    slow: u32,
    /// accumulated error for the slow axis, kept in [0, fast] once stepping
    error: i64,
}

impl LinearSlope {
    /// Seed the error at the midpoint so rounding happens halfway through each advance.
    /// The sign of `slow` is dropped, only the distance matters.
    pub fn new(fast: u32, slow: i32) -> Result<Self, StepperError> {
        let fast = NonZeroU32::new(fast).ok_or(StepperError::ZeroFastAxis)?;
        Ok(Self {
            fast,
            slow: slow.unsigned_abs(),
            error: i64::from(fast.get() / 2),
        })
    }

    pub fn fast(&self) -> u32 {
        self.fast.get()
    }

    pub fn slow(&self) -> u32 {
        self.slow
    }

    pub fn error(&self) -> i64 {
        self.error
    }

    /// Step the fast axis once, returning whether the slow axis advances and the new slope
    #[must_use]
    pub fn step(self) -> (bool, Self) {
        // no travel on the slow axis, even when the midpoint seed rounds to zero
        if self.slow == 0 {
            return (false, self);
        }

        let error = self.error - i64::from(self.slow);
        if error > 0 {
            return (false, Self { error, ..self });
        }
        (
            true,
            Self {
                error: error + i64::from(self.fast.get()),
                ..self
            },
        )
    }

    /// Change the slow axis rate without touching the accumulated error
    ///
    /// The rate saturates at zero, so a large negative `dx` brings the slow axis to rest.
    #[must_use]
    pub fn accelerate(self, dx: i32) -> Self {
        if dx == 0 {
            return self;
        }
        let slow = (i64::from(self.slow) + i64::from(dx)).clamp(0, i64::from(u32::MAX));
        Self {
            slow: slow as u32,
            ..self
        }
    }

    /// Replace the slow axis rate, keeping the accumulated error
    #[must_use]
    pub fn with_slow(self, slow: u32) -> Self {
        Self { slow, ..self }
    }

    /// Endless sequence of advance flags starting from this slope
    pub fn flags(self) -> SlopeFlags {
        SlopeFlags { slope: self }
    }
}

/// Iterator over the advance flags of a slope, see `LinearSlope::flags`
#[derive(Debug, Clone)]
pub struct SlopeFlags {
    slope: LinearSlope,
}

impl SlopeFlags {
    pub fn slope(&self) -> LinearSlope {
        self.slope
    }
}

impl Iterator for SlopeFlags {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let (advance, slope) = self.slope.step();
        self.slope = slope;
        Some(advance)
    }
}
