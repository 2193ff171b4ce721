use log::debug;
use serde::{Deserialize, Serialize};
use uom::si::{
    acceleration::meter_per_second_squared, frequency::hertz, jerk::meter_per_second_cubed,
    length::meter, time::second, velocity::meter_per_second,
};

use crate::error::PlanError;
use crate::preset::Preset;
use vector_ops::{
    add_pairwise, add_scalar, cumsum, diff, div_pairwise, div_scalar, sqrt_each, square,
};

// Shape constants of the exponential velocity profile: peak acceleration is
// 1.1754 * alpha * vmax and peak jerk is 2.1524 * alpha^2 * vmax.
const ACCELERATION_SHAPE: Float = 1.1754;
const JERK_SHAPE: Float = 2.1524;
/// alpha * ts for 99.99% of the move to be done
const SETTLING_FACTOR: Float = 2.09616;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionLimits {
    pub max_velocity: Velocity,
    pub max_acceleration: Acceleration,
    pub max_jerk: Jerk,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_velocity: Velocity::new::<meter_per_second>(1.0),
            max_acceleration: Acceleration::new::<meter_per_second_squared>(8.0),
            max_jerk: Jerk::new::<meter_per_second_cubed>(200.0),
        }
    }
}

fn check_limit(name: &'static str, value: Float) -> Result<(), PlanError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::InvalidLimit {
            name,
            value: f64::from(value),
        })
    }
}

impl MotionLimits {
    pub fn new(
        max_velocity: Velocity,
        max_acceleration: Acceleration,
        max_jerk: Jerk,
    ) -> Result<Self, PlanError> {
        check_limit("max velocity", max_velocity.get::<meter_per_second>())?;
        check_limit(
            "max acceleration",
            max_acceleration.get::<meter_per_second_squared>(),
        )?;
        check_limit("max jerk", max_jerk.get::<meter_per_second_cubed>())?;
        Ok(Self {
            max_velocity,
            max_acceleration,
            max_jerk,
        })
    }

    /// Fastest exponential rate that keeps both acceleration and jerk in bounds
    pub fn alpha_max(&self) -> Frequency {
        let vmax = self.max_velocity.get::<meter_per_second>();
        let amax = self.max_acceleration.get::<meter_per_second_squared>();
        let jmax = self.max_jerk.get::<meter_per_second_cubed>();

        let by_acceleration = amax / (ACCELERATION_SHAPE * vmax);
        let by_jerk = (jmax / (JERK_SHAPE * vmax)).sqrt();
        Frequency::new::<hertz>(by_acceleration.min(by_jerk))
    }

    /// Time for a full speed exponential move to settle at its target
    pub fn settling_time(&self) -> Time {
        Time::new::<second>(SETTLING_FACTOR / self.alpha_max().get::<hertz>())
    }
}

/// Waypoint coordinates per axis, in meters
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WaypointAxes")]
pub struct Waypoints {
    x: Vec<Float>,
    y: Vec<Float>,
    z: Vec<Float>,
}

#[derive(Deserialize)]
struct WaypointAxes {
    x: Vec<Float>,
    y: Vec<Float>,
    z: Vec<Float>,
}

impl TryFrom<WaypointAxes> for Waypoints {
    type Error = PlanError;

    fn try_from(axes: WaypointAxes) -> Result<Self, PlanError> {
        Self::new(axes.x, axes.y, axes.z)
    }
}

impl Waypoints {
    fn check_axes(x: &[Float], y: &[Float], z: &[Float]) -> Result<(), PlanError> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(PlanError::AxisLengthMismatch {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        Ok(())
    }

    pub fn new(x: Vec<Float>, y: Vec<Float>, z: Vec<Float>) -> Result<Self, PlanError> {
        Self::check_axes(&x, &y, &z)?;
        Ok(Self { x, y, z })
    }

    pub fn from_array_meter(points: &[[Float; 3]]) -> Self {
        Self {
            x: points.iter().map(|p| p[0]).collect(),
            y: points.iter().map(|p| p[1]).collect(),
            z: points.iter().map(|p| p[2]).collect(),
        }
    }

    pub fn preset(preset: Preset) -> Self {
        let [x, y, z] = preset
            .axes()
            .map(|axis| axis.into_iter().map(|v| v as Float).collect::<Vec<Float>>());
        Self { x, y, z }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[Float] {
        &self.x
    }

    pub fn y(&self) -> &[Float] {
        &self.y
    }

    pub fn z(&self) -> &[Float] {
        &self.z
    }

    pub fn as_array_meter(&self) -> Vec<[Float; 3]> {
        (0..self.len())
            .map(|i| [self.x[i], self.y[i], self.z[i]])
            .collect()
    }
}

/// One straight move between consecutive waypoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// when the move starts
    pub start: Time,
    /// when the move would end at constant max velocity, braking starts here
    pub end: Time,
    pub length: Length,
    /// unit vector along the move
    pub direction: [Float; 3],
}

impl Segment {
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPlan {
    /// largest signed displacement of any segment along x, y and z
    pub max_displacement: [Float; 3],
    pub settling_time: Time,
    /// cumulative time each segment is done, settling gap included
    pub completion: Vec<Time>,
    pub segments: Vec<Segment>,
    pub total_motion_time: Time,
}

impl PathPlan {
    pub fn lengths(&self) -> Vec<Length> {
        self.segments.iter().map(|segment| segment.length).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExponentialPlanner {
    limits: MotionLimits,
    /// 0 waits for each move to settle, 1 starts the next move as soon as braking begins
    overlap: Float,
}

impl Default for ExponentialPlanner {
    fn default() -> Self {
        Self {
            limits: MotionLimits::default(),
            overlap: 0.8,
        }
    }
}

impl ExponentialPlanner {
    pub fn new(limits: MotionLimits, overlap: Float) -> Result<Self, PlanError> {
        if !(0.0..=1.0).contains(&overlap) {
            return Err(PlanError::InvalidOverlap(f64::from(overlap)));
        }
        Ok(Self { limits, overlap })
    }

    pub fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    pub fn overlap(&self) -> Float {
        self.overlap
    }

    /// Time every segment of the path, waypoints must not repeat back to back
    pub fn plan(&self, waypoints: &Waypoints) -> Result<PathPlan, PlanError> {
        Waypoints::check_axes(waypoints.x(), waypoints.y(), waypoints.z())?;
        let count = waypoints.len();
        if count < 2 {
            return Err(PlanError::TooFewWaypoints { count });
        }

        let dx = diff(waypoints.x());
        let dy = diff(waypoints.y());
        let dz = diff(waypoints.z());
        let max_displacement = [&dx, &dy, &dz]
            .map(|d| d.iter().copied().fold(Float::NEG_INFINITY, Float::max));

        let lengths = sqrt_each(&add_pairwise(
            &add_pairwise(&square(&dx), &square(&dy))?,
            &square(&dz),
        )?);
        if let Some(index) = lengths.iter().position(|&length| length == 0.0) {
            return Err(PlanError::CoincidentWaypoints { index });
        }

        let alpha_max = self.limits.alpha_max();
        let settling_time = self.limits.settling_time();
        let gap = settling_time.get::<second>() * (1.0 - self.overlap);
        debug!(
            "alpha max {} Hz, settling time {} s, gap {} s",
            alpha_max.get::<hertz>(),
            settling_time.get::<second>(),
            gap
        );

        let delays = div_scalar(&lengths, self.limits.max_velocity.get::<meter_per_second>());
        let completion = cumsum(&add_scalar(&delays, gap));
        let mut starts = Vec::with_capacity(completion.len());
        starts.push(0.0);
        starts.extend_from_slice(&completion[..completion.len() - 1]);
        let ends = add_pairwise(&starts, &delays)?;

        let directions = [
            div_pairwise(&dx, &lengths)?,
            div_pairwise(&dy, &lengths)?,
            div_pairwise(&dz, &lengths)?,
        ];

        let segments: Vec<Segment> = (0..lengths.len())
            .map(|i| Segment {
                start: Time::new::<second>(starts[i]),
                end: Time::new::<second>(ends[i]),
                length: Length::new::<meter>(lengths[i]),
                direction: [directions[0][i], directions[1][i], directions[2][i]],
            })
            .collect();
        let completion: Vec<Time> = completion
            .into_iter()
            .map(|t| Time::new::<second>(t))
            .collect();
        // at least one segment, checked above
        let total_motion_time = completion[completion.len() - 1];
        debug!(
            "{} segments, total motion time {} s",
            segments.len(),
            total_motion_time.get::<second>()
        );

        Ok(PathPlan {
            max_displacement,
            settling_time,
            completion,
            segments,
            total_motion_time,
        })
    }
}
