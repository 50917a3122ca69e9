//! Ordered threshold tables.
//!
//! Every heuristic tier in the crate (velocity points, engagement points,
//! projection multipliers, health sub-score tiers) is a list of
//! `{ bound, value }` pairs checked in order, first match wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Matches when the input is strictly greater than the bound.
    Above,
    /// Matches when the input is strictly less than the bound.
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub bound: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub comparison: Comparison,
    pub tiers: Vec<Tier>,
    pub fallback: f64,
}

impl ThresholdTable {
    /// Builds an `Above` table. Pairs should be ordered from the highest bound down.
    pub fn above(pairs: &[(f64, f64)], fallback: f64) -> Self {
        Self::from_pairs(Comparison::Above, pairs, fallback)
    }

    /// Builds a `Below` table. Pairs should be ordered from the lowest bound up.
    pub fn below(pairs: &[(f64, f64)], fallback: f64) -> Self {
        Self::from_pairs(Comparison::Below, pairs, fallback)
    }

    fn from_pairs(comparison: Comparison, pairs: &[(f64, f64)], fallback: f64) -> Self {
        Self {
            comparison,
            tiers: pairs
                .iter()
                .map(|&(bound, value)| Tier { bound, value })
                .collect(),
            fallback,
        }
    }

    pub fn lookup(&self, input: f64) -> f64 {
        if input.is_nan() {
            return self.fallback;
        }
        self.tiers
            .iter()
            .find(|tier| match self.comparison {
                Comparison::Above => input > tier.bound,
                Comparison::Below => input < tier.bound,
            })
            .map(|tier| tier.value)
            .unwrap_or(self.fallback)
    }
}

pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}
