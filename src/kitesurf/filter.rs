//! Narrowing and ordering a list of condition assessments

use super::direction::Cardinal;
use super::kiteability::ConditionAssessment;
use super::spots::{Spot, WaterType};

/// Optional criteria, all of which must hold for an assessment to be kept
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotFilter {
    pub region: Option<String>,
    pub only_kiteable: bool,
    /// Keep spots that work with at least one of these directions
    pub wind_directions: Vec<Cardinal>,
    pub tide_independent: bool,
    pub water_types: Vec<WaterType>,
    pub min_kiteability: Option<f64>,
}

impl SpotFilter {
    /// Criteria that only look at the static spot record.
    #[must_use]
    pub fn matches_spot(&self, spot: &Spot) -> bool {
        if self.region.as_ref().is_some_and(|region| &spot.region != region) {
            return false;
        }
        if !self.wind_directions.is_empty()
            && !self
                .wind_directions
                .iter()
                .any(|direction| spot.accepts(*direction))
        {
            return false;
        }
        if self.tide_independent && spot.tide_dependent {
            return false;
        }
        if !self.water_types.is_empty() && !self.water_types.contains(&spot.water_type) {
            return false;
        }
        true
    }

    #[must_use]
    pub fn matches(&self, assessment: &ConditionAssessment) -> bool {
        if !self.matches_spot(&assessment.spot) {
            return false;
        }
        if self.only_kiteable && !assessment.is_kiteable {
            return false;
        }
        if self
            .min_kiteability
            .is_some_and(|min| assessment.kiteability < min)
        {
            return false;
        }
        true
    }

    /// Drop non-matching assessments and sort the rest best first.
    #[must_use]
    pub fn apply(&self, assessments: Vec<ConditionAssessment>) -> Vec<ConditionAssessment> {
        let mut kept: Vec<ConditionAssessment> =
            assessments.into_iter().filter(|a| self.matches(a)).collect();
        sort_by_kiteability(&mut kept);
        kept
    }
}

/// Descending by score; ties keep their relative order.
pub fn sort_by_kiteability(assessments: &mut [ConditionAssessment]) {
    assessments.sort_by(|a, b| b.kiteability.total_cmp(&a.kiteability));
}
