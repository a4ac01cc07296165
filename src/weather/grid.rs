//! Coarse grid used to share one weather fetch between nearby spots

use std::collections::HashMap;
use std::fmt;

use crate::kitesurf::spots::{Coordinates, Spot};

/// Coordinates rounded to 0.1° (roughly 11 km), stored in tenths of a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    pub lat_tenths: i64,
    pub lng_tenths: i64,
}

impl GridKey {
    #[must_use]
    pub fn new(coordinates: &Coordinates) -> Self {
        Self {
            lat_tenths: round_tenths(coordinates.lat),
            lng_tenths: round_tenths(coordinates.lng),
        }
    }
}

/// Half-up rounding to a tenth, so -0.05 lands on 0.0 and 0.05 on 0.1.
fn round_tenths(value: f64) -> i64 {
    (value * 10.0 + 0.5).floor() as i64
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}",
            self.lat_tenths as f64 / 10.0,
            self.lng_tenths as f64 / 10.0
        )
    }
}

/// Group spots by grid cell.
///
/// Groups come back in the order their first spot was seen; within a group
/// spots keep their input order. Flattening the groups therefore does not
/// reproduce the input order when cells interleave.
#[must_use]
pub fn group_spots<'a>(spots: &'a [Spot]) -> Vec<(GridKey, Vec<&'a Spot>)> {
    let mut index: HashMap<GridKey, usize> = HashMap::new();
    let mut groups: Vec<(GridKey, Vec<&'a Spot>)> = Vec::new();

    for spot in spots {
        let key = GridKey::new(&spot.coordinates);
        match index.get(&key) {
            Some(&position) => groups[position].1.push(spot),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![spot]));
            }
        }
    }

    groups
}
