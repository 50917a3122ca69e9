pub mod config;
pub mod error;
pub mod health;
pub mod input;
pub mod keywords;
pub mod patterns;
pub mod scoring;
pub mod synthetic;
pub mod tiers;
pub mod trends;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::health::{HealthScore, HealthScorer};
use crate::patterns::{SuccessPattern, TopicPrediction};
use crate::scoring::ScoringPipeline;
use crate::trends::{ContentOpportunity, RankedTrendItem, TrendingReasons, ViralCandidate};

pub use crate::error::InvalidInputError;
pub use crate::input::{analyze_json, AnalysisRequest};

/// One published video. Never mutated by the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            published_at,
            duration_seconds: 0.0,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            tags: Vec::new(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAggregates {
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
}

/// Which external market datasets were available for this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSignals {
    #[serde(default)]
    pub competitors: bool,
    #[serde(default)]
    pub audience: bool,
    #[serde(default)]
    pub trends: bool,
    #[serde(default)]
    pub business_profile: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analyzed_at: DateTime<Utc>,
    pub rising_content: Vec<RankedTrendItem>,
    pub trending_reasons: TrendingReasons,
    pub content_opportunities: Vec<ContentOpportunity>,
    pub viral_potential: Vec<ViralCandidate>,
    pub guaranteed_topics: Vec<TopicPrediction>,
    pub channel_health_score: HealthScore,
    pub success_patterns: Vec<SuccessPattern>,
}

pub fn analyze(
    items: &[ContentItem],
    aggregates: &ChannelAggregates,
    market: Option<&MarketSignals>,
    now: Option<DateTime<Utc>>,
) -> AnalysisResult {
    analyze_with_config(items, aggregates, market, now, &AnalysisConfig::default())
}

pub fn analyze_with_config(
    items: &[ContentItem],
    aggregates: &ChannelAggregates,
    market: Option<&MarketSignals>,
    now: Option<DateTime<Utc>>,
    config: &AnalysisConfig,
) -> AnalysisResult {
    let now = now.unwrap_or_else(Utc::now);

    let pipeline = ScoringPipeline::from_config(config);
    let scored = pipeline.score_batch(items, now);
    let summary = trends::aggregate(&scored, &config.trends);

    let report = patterns::mine(items, aggregates, &config.patterns);
    let predictions = patterns::predict(&report, &config.patterns, now);
    let guaranteed_topics =
        patterns::guaranteed_topics(predictions, config.patterns.guaranteed_min_confidence);

    let health = HealthScorer::new(config.health.clone()).score(items, aggregates, market);

    info!(
        items = items.len(),
        rising = summary.rising_content.len(),
        guaranteed_topics = guaranteed_topics.len(),
        health = health.overall,
        "analysis complete"
    );

    AnalysisResult {
        analyzed_at: now,
        rising_content: summary.rising_content,
        trending_reasons: summary.trending_reasons,
        content_opportunities: summary.content_opportunities,
        viral_potential: summary.viral_potential,
        guaranteed_topics,
        channel_health_score: health,
        success_patterns: report.success_patterns(),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_number(value: f64) -> String {
    let rounded = if value.is_finite() {
        value.round().max(0.0) as i64
    } else {
        0
    };
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Formats a value that is already a percentage.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
