use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tiers::ratio_or_zero;
use crate::ContentItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RetentionSignal {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShareProjection {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Per-item rates for one analysis run. Every rate is finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMetrics {
    pub age_hours: f64,
    pub view_velocity: f64,
    pub comment_velocity: f64,
    pub engagement_rate: f64,
    pub retention_signal: RetentionSignal,
    pub share_projection: ShareProjection,
}

pub fn normalize(item: &ContentItem, now: DateTime<Utc>) -> NormalizedMetrics {
    let age_hours = age_hours(item.published_at, now);
    let views = item.view_count as f64;

    let view_velocity = ratio_or_zero(views, age_hours);
    let comment_velocity = ratio_or_zero(item.comment_count as f64, age_hours);
    let engagement_rate = engagement_rate(item.view_count, item.like_count, item.comment_count);

    NormalizedMetrics {
        age_hours,
        view_velocity,
        comment_velocity,
        engagement_rate,
        retention_signal: retention_signal(item.duration_seconds, engagement_rate),
        share_projection: share_projection(engagement_rate, comment_velocity),
    }
}

/// Hours since publish; future timestamps clamp to zero.
pub fn age_hours(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - published_at).num_milliseconds();
    (millis as f64 / 3_600_000.0).max(0.0)
}

pub fn engagement_rate(views: u64, likes: u64, comments: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes as f64 + comments as f64) / views as f64 * 100.0
}

pub fn retention_signal(duration_seconds: f64, engagement_rate: f64) -> RetentionSignal {
    let long_and_engaged = duration_seconds > 600.0 && engagement_rate > 2.0;
    let short_and_engaged = duration_seconds < 300.0 && engagement_rate > 3.0;
    if long_and_engaged || short_and_engaged {
        RetentionSignal::High
    } else if engagement_rate > 1.5 {
        RetentionSignal::Medium
    } else {
        RetentionSignal::Low
    }
}

pub fn share_projection(engagement_rate: f64, comment_velocity: f64) -> ShareProjection {
    if engagement_rate > 4.0 && comment_velocity > 8.0 {
        ShareProjection::VeryHigh
    } else if engagement_rate > 3.0 && comment_velocity > 5.0 {
        ShareProjection::High
    } else if engagement_rate > 2.0 && comment_velocity > 2.0 {
        ShareProjection::Medium
    } else {
        ShareProjection::Low
    }
}
