use serde::{Deserialize, Serialize};

use crate::config::ProjectionConfig;
use crate::scoring::NormalizedMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakProjection {
    pub estimated_peak_views: u64,
    pub estimated_peak_time_hours: u64,
    pub confidence: u8,
}

#[derive(Debug, Clone, Default)]
pub struct PeakProjector {
    config: ProjectionConfig,
}

impl PeakProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn multiplier(&self, score: f64) -> f64 {
        // A multiplier below 1 would project a peak under the current count.
        self.config.multipliers.lookup(score).max(1.0)
    }

    pub fn project(
        &self,
        metrics: &NormalizedMetrics,
        score: f64,
        current_views: u64,
    ) -> PeakProjection {
        let multiplier = self.multiplier(score);
        let peak_views = (current_views as f64 * multiplier).round();
        let peak_time = (metrics.age_hours + 24.0 * multiplier.ln()).round();

        PeakProjection {
            estimated_peak_views: (peak_views as u64).max(current_views),
            estimated_peak_time_hours: peak_time.max(metrics.age_hours.ceil()) as u64,
            confidence: self.confidence(metrics),
        }
    }

    fn confidence(&self, metrics: &NormalizedMetrics) -> u8 {
        let mut confidence: u32 = 50;
        if metrics.age_hours > 48.0 {
            confidence += 30;
        }
        if metrics.engagement_rate > 2.0 {
            confidence += 20;
        }
        if metrics.view_velocity > 100.0 {
            confidence += 20;
        }
        if metrics.comment_velocity > 1.0 {
            confidence += 10;
        }
        confidence.min(self.config.max_confidence as u32) as u8
    }
}
