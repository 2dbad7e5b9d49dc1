//! Criterion weights for the overall score.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use super::Criterion;
use crate::error::{GradingError, GradingResult};

/// Accepted deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Validated criterion weights.
///
/// Weights always sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`]. The set does
/// not have to name all four criteria; unweighted criteria simply do not
/// contribute to the overall score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightSet(BTreeMap<Criterion, f64>);

impl WeightSet {
    /// Builds a weight set, rejecting sums outside 1.0 ± 0.01.
    ///
    /// # Errors
    ///
    /// Returns [`GradingError::InvalidWeight`] for negative or non-finite
    /// weights and [`GradingError::InvalidWeights`] when the sum is off.
    pub fn new(weights: BTreeMap<Criterion, f64>) -> GradingResult<Self> {
        if let Some((criterion, value)) = weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(GradingError::InvalidWeight {
                criterion: criterion.to_string(),
                value: *value,
            });
        }

        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(GradingError::InvalidWeights {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(Self(weights))
    }

    /// Builds a weight set from `(criterion, weight)` pairs.
    ///
    /// # Errors
    ///
    /// See [`WeightSet::new`].
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Criterion, f64)>) -> GradingResult<Self> {
        Self::new(pairs.into_iter().collect())
    }

    /// Weight for a criterion, if it is weighted.
    #[must_use]
    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.0.get(&criterion).copied()
    }

    /// Iterates weights in criterion order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.0.iter().map(|(c, w)| (*c, *w))
    }

    /// Number of weighted criteria.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no criterion is weighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Criterion::Edges, 0.25),
            (Criterion::Corners, 0.30),
            (Criterion::Surface, 0.30),
            (Criterion::Centering, 0.15),
        ]))
    }
}

/// Parses `edges=0.25,corners=0.3,...`.
impl FromStr for WeightSet {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weights = BTreeMap::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = part
                .split_once('=')
                .ok_or_else(|| GradingError::Parse(part.to_string()))?;
            let criterion = Criterion::from_name(name)
                .ok_or_else(|| GradingError::UnknownCriterion(name.trim().to_string()))?;
            let weight: f64 = value
                .trim()
                .parse()
                .map_err(|_| GradingError::Parse(part.to_string()))?;
            weights.insert(criterion, weight);
        }
        Self::new(weights)
    }
}
