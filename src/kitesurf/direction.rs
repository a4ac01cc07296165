//! Compass helpers for the eight-point wind rose used by the spot catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KitecastError;

/// One of the eight cardinal and intercardinal wind directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Cardinal {
    /// Clockwise from north; the index of each label is its 45° sector.
    pub const ALL: [Cardinal; 8] = [
        Cardinal::N,
        Cardinal::NE,
        Cardinal::E,
        Cardinal::SE,
        Cardinal::S,
        Cardinal::SW,
        Cardinal::W,
        Cardinal::NW,
    ];

    /// Convert a bearing in degrees to the nearest cardinal.
    ///
    /// Each cardinal owns the 45° sector centered on it, so 22° is still
    /// north and 23° is north-east. Bearings outside `[0, 360)` are wrapped
    /// first, which makes the conversion periodic in 360°.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Cardinal::N;
        }
        let normalized = degrees.rem_euclid(360.0);
        let sector = (normalized / 45.0).round() as usize % 8;
        Self::ALL[sector]
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The two neighbours on the compass rose, counter-clockwise first.
    #[must_use]
    pub fn adjacent(self) -> [Cardinal; 2] {
        let index = self.index();
        [Self::ALL[(index + 7) % 8], Self::ALL[(index + 1) % 8]]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NE => "NE",
            Cardinal::E => "E",
            Cardinal::SE => "SE",
            Cardinal::S => "S",
            Cardinal::SW => "SW",
            Cardinal::W => "W",
            Cardinal::NW => "NW",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinal {
    type Err = KitecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| KitecastError::validation(format!("unknown wind direction '{wanted}'")))
    }
}

/// Shorthand for [`Cardinal::from_degrees`].
#[must_use]
pub fn to_cardinal(degrees: f64) -> Cardinal {
    Cardinal::from_degrees(degrees)
}
