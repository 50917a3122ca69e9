use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::keywords::{
    TitleText, NOVELTY_KEYWORDS, TECH_KEYWORDS, TRENDING_TAG_KEYWORDS, TUTORIAL_KEYWORDS,
};
use crate::scoring::NormalizedMetrics;
use crate::ContentItem;

pub const FACTOR_TECH: &str = "AI & Technology";
pub const FACTOR_EDUCATIONAL: &str = "Educational Content";
pub const FACTOR_FRESH: &str = "Fresh Content";
pub const FACTOR_ENGAGEMENT: &str = "High Engagement";
pub const FACTOR_MOMENTUM: &str = "Strong Momentum";
pub const FACTOR_DISCUSSION: &str = "Active Discussion";
pub const FACTOR_TRENDING_KEYWORDS: &str = "Trending Keywords";
pub const FACTOR_TIMING: &str = "Optimal Timing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReason {
    pub factor: String,
    pub impact: Impact,
    pub description: String,
}

impl TrendReason {
    fn new(factor: &str, impact: Impact, description: impl Into<String>) -> Self {
        Self {
            factor: factor.to_string(),
            impact,
            description: description.into(),
        }
    }
}

/// Collects every rule that fires for the item, in rule order.
pub fn attribute(
    item: &ContentItem,
    metrics: &NormalizedMetrics,
    now: DateTime<Utc>,
) -> Vec<TrendReason> {
    let title = TitleText::new(&item.title);
    let mut reasons = Vec::new();

    if title.matches_any(TECH_KEYWORDS) {
        reasons.push(TrendReason::new(
            FACTOR_TECH,
            Impact::High,
            "Covers AI and technology topics that are in high demand",
        ));
    }
    if title.matches_any(TUTORIAL_KEYWORDS) {
        reasons.push(TrendReason::new(
            FACTOR_EDUCATIONAL,
            Impact::Medium,
            "Tutorial format gives viewers a concrete reason to watch and save",
        ));
    }
    if is_fresh(&title, now) {
        reasons.push(TrendReason::new(
            FACTOR_FRESH,
            Impact::Medium,
            "Title signals new or current-year information",
        ));
    }
    if metrics.engagement_rate > 3.0 {
        reasons.push(TrendReason::new(
            FACTOR_ENGAGEMENT,
            Impact::High,
            format!(
                "Strong audience engagement at {:.1}% of viewers liking or commenting",
                metrics.engagement_rate
            ),
        ));
    }
    if metrics.view_velocity > 500.0 {
        reasons.push(TrendReason::new(
            FACTOR_MOMENTUM,
            Impact::High,
            format!("Gaining momentum at {:.0} views per hour", metrics.view_velocity),
        ));
    }
    if metrics.comment_velocity > 5.0 {
        reasons.push(TrendReason::new(
            FACTOR_DISCUSSION,
            Impact::Medium,
            format!(
                "Sparking discussion at {:.1} comments per hour",
                metrics.comment_velocity
            ),
        ));
    }

    let matched = matched_tag_keywords(&item.tags);
    if !matched.is_empty() {
        reasons.push(TrendReason::new(
            FACTOR_TRENDING_KEYWORDS,
            Impact::Medium,
            format!("Tagged with trending keywords: {}", matched.join(", ")),
        ));
    }

    let hour = item.published_at.hour();
    if (14..=16).contains(&hour) {
        reasons.push(TrendReason::new(
            FACTOR_TIMING,
            Impact::Low,
            "Published in the mid-afternoon window when the audience is most active",
        ));
    }

    reasons
}

fn is_fresh(title: &TitleText, now: DateTime<Utc>) -> bool {
    if title.matches_any(NOVELTY_KEYWORDS) {
        return true;
    }
    let year = now.year();
    [year, year + 1]
        .iter()
        .any(|candidate| title.contains_token(&candidate.to_string()))
}

/// Dictionary keywords matched by any tag, in dictionary order. Tags follow
/// the same token rules as titles.
pub fn matched_tag_keywords(tags: &[String]) -> Vec<&'static str> {
    let tags: Vec<TitleText> = tags.iter().map(|tag| TitleText::new(tag)).collect();
    TRENDING_TAG_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| tags.iter().any(|tag| tag.matches(keyword)))
        .collect()
}
