/*!
Integer motion maths for stepper control

Bresenham-style slope tracing lets one axis advance in proportion to a faster
one without any division or floating point in the loop. Chaining two slopes,
where the advance of the first feeds the rate of the second, integrates a
constant acceleration into velocity and then position.
*/
#![no_std]

#[cfg(test)]
extern crate std;

pub mod error;
pub mod slope;
pub mod trace;
pub mod trapezoid;

pub use error::StepperError;
pub use slope::{LinearSlope, SlopeFlags};
pub use trace::{AccelerationTrace, StepOrder, TraceRecord};
pub use trapezoid::{ProfileSample, TrapezoidProfile};
