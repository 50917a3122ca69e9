use serde::{Deserialize, Serialize};

use crate::config::{ClassificationConfig, ScoringTables, TierFloor};
use crate::scoring::NormalizedMetrics;

/// Trend state of one item, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClassification {
    Declining,
    Stable,
    Rising,
    Trending,
    Viral,
}

impl TrendClassification {
    pub fn label(self) -> &'static str {
        match self {
            TrendClassification::Declining => "declining",
            TrendClassification::Stable => "stable",
            TrendClassification::Rising => "rising",
            TrendClassification::Trending => "trending",
            TrendClassification::Viral => "viral",
        }
    }

    /// Rising or better.
    pub fn is_rising(self) -> bool {
        self >= TrendClassification::Rising
    }
}

#[derive(Debug, Clone)]
pub struct TrendClassifier {
    tables: ScoringTables,
    rules: ClassificationConfig,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self::new(ScoringTables::default(), ClassificationConfig::default())
    }
}

impl TrendClassifier {
    pub fn new(tables: ScoringTables, rules: ClassificationConfig) -> Self {
        Self { tables, rules }
    }

    /// Composite 0-100 score from velocity, engagement, discussion and recency points.
    pub fn performance_score(&self, metrics: &NormalizedMetrics) -> f64 {
        let mut score = 0.0;
        score += self.tables.view_velocity.lookup(metrics.view_velocity);
        score += self.tables.engagement_rate.lookup(metrics.engagement_rate);
        score += self.tables.comment_velocity.lookup(metrics.comment_velocity);
        score += self.tables.recency_hours.lookup(metrics.age_hours);
        score.max(0.0).min(self.tables.max_score)
    }

    /// First matching tier wins, strongest first.
    pub fn classify(&self, metrics: &NormalizedMetrics, score: f64) -> TrendClassification {
        if clears(&self.rules.viral, metrics, score) {
            TrendClassification::Viral
        } else if clears(&self.rules.trending, metrics, score) {
            TrendClassification::Trending
        } else if clears(&self.rules.rising, metrics, score) {
            TrendClassification::Rising
        } else if score >= self.rules.stable_min_score {
            TrendClassification::Stable
        } else {
            TrendClassification::Declining
        }
    }
}

fn clears(floor: &TierFloor, metrics: &NormalizedMetrics, score: f64) -> bool {
    score >= floor.min_score
        && metrics.view_velocity > floor.min_view_velocity
        && metrics.engagement_rate > floor.min_engagement_rate
}
