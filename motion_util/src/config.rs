//! Run parameters for the command line tools
//!
//! Every field has a default matching the reference runs, so a config file only
//! needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use path_planner::f64::{ExponentialPlanner, MotionLimits, Waypoints};
use path_planner::{PlanError, Preset};
use serde::{Deserialize, Serialize};
use stepper_math::{AccelerationTrace, StepOrder, StepperError, TrapezoidProfile};
use thiserror::Error;
use uom::si::{
    acceleration::meter_per_second_squared,
    f64::{Acceleration, Jerk, Velocity},
    jerk::meter_per_second_cubed,
    velocity::meter_per_second,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub ticks: u32,
    /// velocity gained over `ticks`, negative to slow down
    pub acceleration: i32,
    pub initial_velocity: u32,
    pub order: StepOrder,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            ticks: 30000,
            acceleration: 500,
            initial_velocity: 0,
            order: StepOrder::StepBothThenAccelerate,
        }
    }
}

impl TraceConfig {
    pub fn trace(&self) -> Result<AccelerationTrace, StepperError> {
        Ok(AccelerationTrace::new(self.ticks, self.acceleration)?
            .starting_at(self.initial_velocity)
            .with_order(self.order))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// m/s
    pub max_velocity: f64,
    /// m/s^2
    pub max_acceleration: f64,
    /// m/s^3
    pub max_jerk: f64,
    pub overlap: f64,
    pub preset: Preset,
    /// explicit [x, y, z] waypoints in meters, used instead of the preset
    pub waypoints: Option<Vec<[f64; 3]>>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_velocity: 1.0,
            max_acceleration: 8.0,
            max_jerk: 200.0,
            overlap: 0.8,
            preset: Preset::TenSquares,
            waypoints: None,
        }
    }
}

impl PlannerConfig {
    pub fn planner(&self) -> Result<ExponentialPlanner, PlanError> {
        let limits = MotionLimits::new(
            Velocity::new::<meter_per_second>(self.max_velocity),
            Acceleration::new::<meter_per_second_squared>(self.max_acceleration),
            Jerk::new::<meter_per_second_cubed>(self.max_jerk),
        )?;
        ExponentialPlanner::new(limits, self.overlap)
    }

    pub fn waypoints(&self) -> Waypoints {
        match &self.waypoints {
            Some(points) => Waypoints::from_array_meter(points),
            None => Waypoints::preset(self.preset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapezoidConfig {
    /// steps/s
    pub vmax: u64,
    /// steps/s^2
    pub acc: u64,
    /// steps
    pub dx: u64,
    /// ticks/s
    pub clock: u64,
    /// ticks between printed samples
    pub stride: u64,
}

impl Default for TrapezoidConfig {
    fn default() -> Self {
        Self {
            vmax: 12800,
            acc: 320,
            dx: 35_000,
            clock: 20_000_000,
            stride: 1000,
        }
    }
}

impl TrapezoidConfig {
    pub fn profile(&self) -> Result<TrapezoidProfile, StepperError> {
        TrapezoidProfile::plan(self.vmax, self.acc, self.dx, self.clock)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trace: TraceConfig,
    pub planner: PlannerConfig,
    pub trapezoid: TrapezoidConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Reference defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "trace": {{ "acceleration": -200, "order": "interleaved" }},
                 "planner": {{ "preset": "square", "overlap": 0.5 }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.trace.acceleration, -200);
        assert_eq!(config.trace.ticks, 30000);
        assert_eq!(config.trace.order, StepOrder::Interleaved);
        assert_eq!(config.planner.preset, Preset::Square);
        assert_eq!(config.planner.overlap, 0.5);
        assert_eq!(config.planner.max_jerk, 200.0);
        assert_eq!(config.trapezoid, TrapezoidConfig::default());
    }

    #[test]
    fn explicit_waypoints_override_preset() {
        let config = PlannerConfig {
            waypoints: Some(vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.2]]),
            ..PlannerConfig::default()
        };
        let waypoints = config.waypoints();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints.z(), &[0.0, 0.2]);
        assert_eq!(
            PlannerConfig::default().waypoints(),
            Waypoints::preset(Preset::TenSquares)
        );
    }

    #[test]
    fn defaults_build() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config.trace.trace().unwrap().finish(), (500, 250));
        assert!(config.planner.planner().is_ok());
        assert_eq!(config.trapezoid.profile().unwrap().vmax(), 3346);
    }

    #[test]
    fn bad_values_surface_errors() {
        let config = PlannerConfig {
            overlap: 2.0,
            ..PlannerConfig::default()
        };
        assert!(matches!(config.planner(), Err(PlanError::InvalidOverlap(_))));

        let trace = TraceConfig {
            ticks: 0,
            ..TraceConfig::default()
        };
        assert!(matches!(trace.trace(), Err(StepperError::ZeroFastAxis)));
    }

    #[test]
    fn missing_and_malformed_files() {
        let missing = Config::load(Path::new("/nonexistent/motion.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
