use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::config::AnalysisConfig;
use crate::scoring::{
    attribute, normalize, NormalizedMetrics, PeakProjection, PeakProjector, TrendClassification,
    TrendClassifier, TrendReason,
};
use crate::ContentItem;

/// One item after the per-item pass. Borrows the input record instead of copying it.
#[derive(Debug, Clone)]
pub struct ScoredItem<'a> {
    pub item: &'a ContentItem,
    pub metrics: NormalizedMetrics,
    pub performance_score: f64,
    pub classification: TrendClassification,
    pub reasons: Vec<TrendReason>,
    pub projection: PeakProjection,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    classifier: TrendClassifier,
    projector: PeakProjector,
}

impl ScoringPipeline {
    pub fn new(classifier: TrendClassifier, projector: PeakProjector) -> Self {
        Self {
            classifier,
            projector,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            TrendClassifier::new(config.scoring.clone(), config.classification.clone()),
            PeakProjector::new(config.projection.clone()),
        )
    }

    pub fn classifier(&self) -> &TrendClassifier {
        &self.classifier
    }

    pub fn score<'a>(&self, item: &'a ContentItem, now: DateTime<Utc>) -> ScoredItem<'a> {
        let metrics = normalize(item, now);
        let performance_score = self.classifier.performance_score(&metrics);
        let classification = self.classifier.classify(&metrics, performance_score);
        let reasons = attribute(item, &metrics, now);
        let projection = self
            .projector
            .project(&metrics, performance_score, item.view_count);

        ScoredItem {
            item,
            metrics,
            performance_score,
            classification,
            reasons,
            projection,
        }
    }

    /// Map pass over the batch, preserving batch order.
    pub fn score_batch<'a>(
        &self,
        items: &'a [ContentItem],
        now: DateTime<Utc>,
    ) -> Vec<ScoredItem<'a>> {
        items.iter().map(|item| self.score(item, now)).collect()
    }
}

/// Stable sort by performance score, highest first; ties keep their order.
pub fn rank_by_score(items: &mut [&ScoredItem<'_>]) {
    items.sort_by(|a, b| {
        b.performance_score
            .partial_cmp(&a.performance_score)
            .unwrap_or(Ordering::Equal)
    });
}
