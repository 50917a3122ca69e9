//! Weighted channel health score.
//!
//! overall = 0.30 × engagement + 0.20 × consistency + 0.20 × growth
//!         + 0.15 × market alignment + 0.15 × content quality
//!
//! Each sub-score is capped and rounded before it enters the sum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::HealthWeights;
use crate::scoring::normalizer::engagement_rate;
use crate::tiers::{ratio_or_zero, ThresholdTable};
use crate::{mean, ChannelAggregates, ContentItem, MarketSignals};

const EMPTY_ENGAGEMENT: f64 = 50.0;
const SPARSE_CONSISTENCY: f64 = 30.0;
const EMPTY_CONTENT_QUALITY: f64 = 50.0;
const CONSISTENCY_WINDOW: usize = 10;

const ENGAGEMENT_MAX: f64 = 90.0;
const CONSISTENCY_MAX: f64 = 90.0;
const GROWTH_MAX: f64 = 90.0;
const MARKET_ALIGNMENT_MAX: f64 = 90.0;
const CONTENT_QUALITY_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBreakdown {
    pub engagement: u8,
    pub consistency: u8,
    pub growth: u8,
    pub market_alignment: u8,
    pub content_quality: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub overall: u8,
    pub breakdown: HealthBreakdown,
    pub recommendations: Vec<String>,
}

struct HealthTables {
    engagement: ThresholdTable,
    views_per_video: ThresholdTable,
    subscriber_ratio: ThresholdTable,
    subscribers: ThresholdTable,
    item_engagement: ThresholdTable,
}

fn tables() -> &'static HealthTables {
    static TABLES: OnceLock<HealthTables> = OnceLock::new();
    TABLES.get_or_init(|| HealthTables {
        engagement: ThresholdTable::above(&[(5.0, 90.0), (3.0, 75.0), (1.0, 60.0)], 40.0),
        views_per_video: ThresholdTable::above(
            &[(10_000.0, 20.0), (1_000.0, 10.0), (100.0, 5.0)],
            0.0,
        ),
        subscriber_ratio: ThresholdTable::above(&[(0.05, 15.0), (0.02, 10.0), (0.01, 5.0)], 0.0),
        subscribers: ThresholdTable::above(
            &[(100_000.0, 15.0), (10_000.0, 10.0), (1_000.0, 5.0)],
            0.0,
        ),
        item_engagement: ThresholdTable::above(&[(5.0, 20.0), (2.0, 10.0)], 0.0),
    })
}

const LOW_HEALTH_RECOMMENDATIONS: &[&str] = &[
    "Publish on a fixed weekly schedule before experimenting with new formats",
    "Rework titles and thumbnails on the ten most recent uploads",
    "Ask a direct question in every video to restart comment activity",
    "Study the top three videos in your niche and match their structure",
];

const MEDIUM_HEALTH_RECOMMENDATIONS: &[&str] = &[
    "Double down on the topics that are currently rising",
    "Turn your best-performing video into a short series",
    "Add detailed descriptions and at least six relevant tags to each upload",
    "Reply to comments in the first hours after publishing",
];

const HIGH_HEALTH_RECOMMENDATIONS: &[&str] = &[
    "Keep the current cadence and protect what is working",
    "Test one new format per month against your proven topics",
    "Repurpose top videos into shorts to reach new viewers",
    "Explore collaborations with channels in adjacent niches",
];

#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    weights: HealthWeights,
}

impl HealthScorer {
    pub fn new(weights: HealthWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        items: &[ContentItem],
        aggregates: &ChannelAggregates,
        market: Option<&MarketSignals>,
    ) -> HealthScore {
        let breakdown = HealthBreakdown {
            engagement: to_score(engagement_score(items), ENGAGEMENT_MAX),
            consistency: to_score(consistency_score(items), CONSISTENCY_MAX),
            growth: to_score(growth_score(aggregates), GROWTH_MAX),
            market_alignment: to_score(market_alignment_score(market), MARKET_ALIGNMENT_MAX),
            content_quality: to_score(content_quality_score(items), CONTENT_QUALITY_MAX),
        };
        let overall = self.overall(&breakdown);
        debug!(overall, ?breakdown, "scored channel health");

        HealthScore {
            overall,
            breakdown,
            recommendations: recommendations(overall),
        }
    }

    pub fn overall(&self, breakdown: &HealthBreakdown) -> u8 {
        let weighted = self.weights.engagement * breakdown.engagement as f64
            + self.weights.consistency * breakdown.consistency as f64
            + self.weights.growth * breakdown.growth as f64
            + self.weights.market_alignment * breakdown.market_alignment as f64
            + self.weights.content_quality * breakdown.content_quality as f64;
        to_score(weighted, 100.0)
    }
}

pub fn engagement_score(items: &[ContentItem]) -> f64 {
    if items.is_empty() {
        return EMPTY_ENGAGEMENT;
    }
    let rates: Vec<f64> = items.iter().map(item_engagement).collect();
    tables().engagement.lookup(mean(&rates))
}

/// Regularity of the gaps between the most recent uploads.
pub fn consistency_score(items: &[ContentItem]) -> f64 {
    if items.len() < 3 {
        return SPARSE_CONSISTENCY;
    }

    let mut published: Vec<DateTime<Utc>> = items.iter().map(|item| item.published_at).collect();
    published.sort_by_key(|timestamp| Reverse(*timestamp));
    published.truncate(CONSISTENCY_WINDOW);

    let intervals: Vec<f64> = published
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_milliseconds() as f64 / 86_400_000.0)
        .collect();
    let mean_interval = mean(&intervals);
    let variance = mean(
        &intervals
            .iter()
            .map(|interval| (interval - mean_interval).powi(2))
            .collect::<Vec<_>>(),
    );

    (100.0 - 10.0 * ratio_or_zero(variance, mean_interval)).max(0.0)
}

pub fn growth_score(aggregates: &ChannelAggregates) -> f64 {
    let views = aggregates.view_count as f64;
    let subscribers = aggregates.subscriber_count as f64;
    let views_per_video = ratio_or_zero(views, aggregates.video_count as f64);
    let subscriber_ratio = ratio_or_zero(subscribers, views);

    let tables = tables();
    50.0 + tables.views_per_video.lookup(views_per_video)
        + tables.subscriber_ratio.lookup(subscriber_ratio)
        + tables.subscribers.lookup(subscribers)
}

pub fn market_alignment_score(market: Option<&MarketSignals>) -> f64 {
    let Some(market) = market else {
        return 50.0;
    };
    let mut score = 50.0;
    for present in [market.competitors, market.audience, market.trends] {
        if present {
            score += 15.0;
        }
    }
    if market.business_profile {
        score += 10.0;
    }
    score
}

pub fn content_quality_score(items: &[ContentItem]) -> f64 {
    if items.is_empty() {
        return EMPTY_CONTENT_QUALITY;
    }
    let per_item: Vec<f64> = items
        .iter()
        .map(|item| {
            let mut score = 50.0;
            if item.title.chars().count() > 30 {
                score += 10.0;
            }
            if item.tags.len() > 5 {
                score += 10.0;
            }
            if item
                .description
                .as_deref()
                .map(|description| description.chars().count() > 100)
                .unwrap_or(false)
            {
                score += 10.0;
            }
            score += tables().item_engagement.lookup(item_engagement(item));
            score.min(CONTENT_QUALITY_MAX)
        })
        .collect();
    mean(&per_item)
}

pub fn recommendations(overall: u8) -> Vec<String> {
    let set = if overall < 40 {
        LOW_HEALTH_RECOMMENDATIONS
    } else if overall < 70 {
        MEDIUM_HEALTH_RECOMMENDATIONS
    } else {
        HIGH_HEALTH_RECOMMENDATIONS
    };
    set.iter().map(|line| line.to_string()).collect()
}

fn item_engagement(item: &ContentItem) -> f64 {
    engagement_rate(item.view_count, item.like_count, item.comment_count)
}

fn to_score(value: f64, max: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.max(0.0).min(max).round() as u8
}
