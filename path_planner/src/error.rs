use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("need at least two waypoints, got {count}")]
    TooFewWaypoints { count: usize },

    #[error("waypoint axes differ in length: x {x}, y {y}, z {z}")]
    AxisLengthMismatch { x: usize, y: usize, z: usize },

    #[error("waypoint {index} coincides with the next one, segment has zero length")]
    CoincidentWaypoints { index: usize },

    #[error("elementwise operation on vectors of length {left} and {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("overlap must be within [0, 1], got {0}")]
    InvalidOverlap(f64),

    #[error("{name} must be positive and finite, got {value}")]
    InvalidLimit { name: &'static str, value: f64 },

    #[error("unknown preset '{0}', expected square, hexagon, figure-eight or ten-squares")]
    UnknownPreset(String),
}
