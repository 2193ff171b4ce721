use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Test shapes in the xy plane, coordinates in meters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Square,
    Hexagon,
    FigureEight,
    #[default]
    TenSquares,
}

const SQUARE_X: [f64; 5] = [0.0, 0.0, 0.1, 0.1, 0.0];
const SQUARE_Y: [f64; 5] = [0.0, 0.1, 0.1, 0.0, 0.0];

const HEXAGON_X: [f64; 7] = [0.0, 0.05, 0.0, -0.1, -0.15, -0.1, 0.0];
const HEXAGON_Y: [f64; 7] = [0.0, 0.0866, 0.1732, 0.1732, 0.0866, 0.0, 0.0];

const FIGURE_EIGHT_X: [f64; 13] = [
    0.0, 0.0866, 0.1732, 0.1732, 0.0866, 0.0, -0.05, -0.1366, -0.2232, -0.2232, -0.1366, -0.05,
    -0.1366,
];
const FIGURE_EIGHT_Y: [f64; 13] = [
    0.0, -0.05, 0.0, 0.1, 0.15, 0.1, 0.0, -0.05, 0.0, 0.1, 0.15, 0.1, 0.15,
];

const TEN_SQUARES: usize = 10;

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Square,
        Preset::Hexagon,
        Preset::FigureEight,
        Preset::TenSquares,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Square => "square",
            Preset::Hexagon => "hexagon",
            Preset::FigureEight => "figure-eight",
            Preset::TenSquares => "ten-squares",
        }
    }

    /// [x, y, z] coordinates of every waypoint, all shapes are flat (z = 0)
    pub fn axes(&self) -> [Vec<f64>; 3] {
        let (x, y) = match self {
            Preset::Square => (SQUARE_X.to_vec(), SQUARE_Y.to_vec()),
            Preset::Hexagon => (HEXAGON_X.to_vec(), HEXAGON_Y.to_vec()),
            Preset::FigureEight => (FIGURE_EIGHT_X.to_vec(), FIGURE_EIGHT_Y.to_vec()),
            Preset::TenSquares => {
                // the square traced ten times, sharing the start/end corner
                let mut x = vec![0.0];
                let mut y = vec![0.0];
                for _ in 0..TEN_SQUARES {
                    x.extend_from_slice(&SQUARE_X[1..]);
                    y.extend_from_slice(&SQUARE_Y[1..]);
                }
                (x, y)
            }
        };
        let z = vec![0.0; x.len()];
        [x, y, z]
    }
}

impl FromStr for Preset {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| PlanError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_squares_repeats_square() {
        let [x, y, z] = Preset::TenSquares.axes();
        assert_eq!(x.len(), 41);
        assert_eq!(y.len(), 41);
        assert_eq!(z.len(), 41);
        assert_eq!(&x[..5], &SQUARE_X);
        assert_eq!(&y[36..], &SQUARE_Y);
    }

    #[test]
    fn names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
        assert!(matches!(
            "circle".parse::<Preset>(),
            Err(PlanError::UnknownPreset(_))
        ));
    }
}
