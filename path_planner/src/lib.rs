/*!
Exponential velocity path planning

Splits a polyline of waypoints into straight segments, times each one at the
velocity limit and overlaps their settling tails. Available in f32 and f64.
*/

pub mod error;
pub mod preset;

pub use error::PlanError;
pub use preset::Preset;

pub mod f32 {
    pub type Float = f32;

    use uom::si::f32::{Acceleration, Frequency, Jerk, Length, Time, Velocity};

    pub mod vector_ops {
        use super::*;
        include!("vector_ops.rs");
    }

    include!("planner.rs");
}

pub mod f64 {
    pub type Float = f64;

    use uom::si::f64::{Acceleration, Frequency, Jerk, Length, Time, Velocity};

    pub mod vector_ops {
        use super::*;
        include!("vector_ops.rs");
    }

    include!("planner.rs");
}
