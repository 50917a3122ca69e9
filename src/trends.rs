//! Batch-level reduction over scored items: ranking, reason and topic
//! frequencies, opportunities and viral candidates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TrendsConfig;
use crate::keywords::{TitleText, THEMES};
use crate::scoring::reasons::{
    FACTOR_DISCUSSION, FACTOR_EDUCATIONAL, FACTOR_ENGAGEMENT, FACTOR_TECH,
};
use crate::scoring::{
    rank_by_score, NormalizedMetrics, PeakProjection, RetentionSignal, ScoredItem,
    ShareProjection, TrendClassification, TrendReason,
};
use crate::{format_number, mean};

pub const PATTERN_TECH: &str = "AI and technology content is driving growth. Keep covering new tools and releases while interest is high.";
pub const PATTERN_EDUCATIONAL: &str = "Educational content is the strongest performer. Viewers reward step-by-step tutorials and practical guides.";
pub const PATTERN_ENGAGEMENT: &str = "Audience engagement is the main growth driver. Videos that invite comments and opinions are outperforming.";
pub const PATTERN_DIVERSIFIED: &str = "Performance is spread across several formats. Keep a diversified content strategy and double down on whatever rises next.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTrendItem {
    pub rank: usize,
    pub id: String,
    pub title: String,
    pub view_count: u64,
    pub classification: TrendClassification,
    pub performance_score: f64,
    pub metrics: NormalizedMetrics,
    pub reasons: Vec<TrendReason>,
    pub projection: PeakProjection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub name: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingReasons {
    pub top_reasons: Vec<FrequencyEntry>,
    pub trending_topics: Vec<FrequencyEntry>,
    pub overall_pattern: String,
    pub market_insights: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityPriority {
    Immediate,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOpportunity {
    pub theme: String,
    pub frequency: usize,
    pub priority: OpportunityPriority,
    pub suggestion: String,
    pub example_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralCandidate {
    pub id: String,
    pub title: String,
    pub classification: TrendClassification,
    pub viral_score: f64,
    pub share_projection: ShareProjection,
    pub retention_signal: RetentionSignal,
    pub projection: PeakProjection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub rising_content: Vec<RankedTrendItem>,
    pub trending_reasons: TrendingReasons,
    pub content_opportunities: Vec<ContentOpportunity>,
    pub viral_potential: Vec<ViralCandidate>,
}

/// Counts names while remembering first-seen order for tie breaks.
#[derive(Debug, Default)]
struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    fn add(&mut self, name: &str) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.frequency += 1,
            None => self.entries.push(FrequencyEntry {
                name: name.to_string(),
                frequency: 1,
            }),
        }
    }

    fn into_sorted(mut self) -> Vec<FrequencyEntry> {
        self.entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        self.entries
    }
}

pub fn aggregate(scored: &[ScoredItem<'_>], config: &TrendsConfig) -> TrendSummary {
    let mut kept: Vec<&ScoredItem<'_>> = scored
        .iter()
        .filter(|item| item.classification.is_rising())
        .collect();
    rank_by_score(&mut kept);
    debug!(total = scored.len(), rising = kept.len(), "aggregating trend batch");

    let rising_content = kept
        .iter()
        .enumerate()
        .map(|(index, item)| ranked_item(index + 1, item))
        .collect();

    let all_reasons = reason_frequencies(&kept);
    let overall_pattern = overall_pattern(all_reasons.first()).to_string();
    let mut top_reasons = all_reasons;
    top_reasons.truncate(config.top_reasons);

    let theme_counts = theme_frequencies(&kept);
    let content_opportunities = opportunities(&kept, &theme_counts);
    let mut trending_topics = theme_counts;
    trending_topics.truncate(config.top_topics);

    TrendSummary {
        rising_content,
        trending_reasons: TrendingReasons {
            top_reasons,
            trending_topics,
            overall_pattern,
            market_insights: market_insights(scored, &kept),
        },
        content_opportunities,
        viral_potential: viral_candidates(scored, config.max_viral_candidates),
    }
}

fn ranked_item(rank: usize, scored: &ScoredItem<'_>) -> RankedTrendItem {
    RankedTrendItem {
        rank,
        id: scored.item.id.clone(),
        title: scored.item.title.clone(),
        view_count: scored.item.view_count,
        classification: scored.classification,
        performance_score: scored.performance_score,
        metrics: scored.metrics.clone(),
        reasons: scored.reasons.clone(),
        projection: scored.projection.clone(),
    }
}

fn reason_frequencies(kept: &[&ScoredItem<'_>]) -> Vec<FrequencyEntry> {
    let mut table = FrequencyTable::default();
    for item in kept {
        for reason in &item.reasons {
            table.add(&reason.factor);
        }
    }
    table.into_sorted()
}

/// Theme hit counts over the kept titles, most frequent first, zero counts dropped.
fn theme_frequencies(kept: &[&ScoredItem<'_>]) -> Vec<FrequencyEntry> {
    let mut counts = vec![0usize; THEMES.len()];
    for item in kept {
        let title = TitleText::new(&item.item.title);
        for (index, theme) in THEMES.iter().enumerate() {
            if title.matches_any(theme.keywords) {
                counts[index] += 1;
            }
        }
    }

    let mut entries: Vec<FrequencyEntry> = THEMES
        .iter()
        .zip(counts)
        .filter(|(_, frequency)| *frequency > 0)
        .map(|(theme, frequency)| FrequencyEntry {
            name: theme.name.to_string(),
            frequency,
        })
        .collect();
    entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    entries
}

pub fn overall_pattern(top_reason: Option<&FrequencyEntry>) -> &'static str {
    match top_reason.map(|entry| entry.name.as_str()) {
        Some(FACTOR_TECH) => PATTERN_TECH,
        Some(FACTOR_EDUCATIONAL) => PATTERN_EDUCATIONAL,
        Some(FACTOR_ENGAGEMENT) | Some(FACTOR_DISCUSSION) => PATTERN_ENGAGEMENT,
        _ => PATTERN_DIVERSIFIED,
    }
}

fn opportunities(
    kept: &[&ScoredItem<'_>],
    theme_counts: &[FrequencyEntry],
) -> Vec<ContentOpportunity> {
    theme_counts
        .iter()
        .filter(|entry| entry.frequency >= 2)
        .filter_map(|entry| {
            let theme = THEMES.iter().find(|theme| theme.name == entry.name)?;
            let example_titles = kept
                .iter()
                .filter(|item| TitleText::new(&item.item.title).matches_any(theme.keywords))
                .take(3)
                .map(|item| item.item.title.clone())
                .collect();
            let priority = if entry.frequency > 3 {
                OpportunityPriority::Immediate
            } else {
                OpportunityPriority::High
            };
            Some(ContentOpportunity {
                theme: theme.name.to_string(),
                frequency: entry.frequency,
                priority,
                suggestion: theme.opportunity.to_string(),
                example_titles,
            })
        })
        .collect()
}

fn market_insights(scored: &[ScoredItem<'_>], kept: &[&ScoredItem<'_>]) -> Vec<String> {
    let count = |class: TrendClassification| {
        scored
            .iter()
            .filter(|item| item.classification == class)
            .count()
    };

    let mut insights = vec![format!(
        "{} of {} videos are rising or better ({} viral, {} trending, {} rising)",
        kept.len(),
        scored.len(),
        count(TrendClassification::Viral),
        count(TrendClassification::Trending),
        count(TrendClassification::Rising),
    )];

    if let Some(leader) = kept.first() {
        let engagement: Vec<f64> = kept.iter().map(|item| item.metrics.engagement_rate).collect();
        let velocity: Vec<f64> = kept.iter().map(|item| item.metrics.view_velocity).collect();
        insights.push(format!(
            "Rising content averages {:.1}% engagement and {} views per hour",
            mean(&engagement),
            format_number(mean(&velocity))
        ));
        insights.push(format!(
            "\"{}\" leads with a performance score of {:.0}",
            leader.item.title, leader.performance_score
        ));
    }

    let declining = count(TrendClassification::Declining);
    if !scored.is_empty() && declining * 2 > scored.len() {
        insights.push(
            "Most of the catalogue is declining; refresh titles and thumbnails on older uploads"
                .to_string(),
        );
    }

    insights
}

fn viral_candidates(scored: &[ScoredItem<'_>], limit: usize) -> Vec<ViralCandidate> {
    let mut candidates: Vec<&ScoredItem<'_>> = scored
        .iter()
        .filter(|item| {
            item.classification >= TrendClassification::Trending
                || item.metrics.share_projection >= ShareProjection::High
        })
        .collect();
    rank_by_score(&mut candidates);

    candidates
        .into_iter()
        .take(limit)
        .map(|item| ViralCandidate {
            id: item.item.id.clone(),
            title: item.item.title.clone(),
            classification: item.classification,
            viral_score: item.performance_score,
            share_projection: item.metrics.share_projection,
            retention_signal: item.metrics.retention_signal,
            projection: item.projection.clone(),
        })
        .collect()
}
