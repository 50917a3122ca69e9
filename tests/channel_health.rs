use chrono::{DateTime, Duration, TimeZone, Utc};

use channel_trends::config::HealthWeights;
use channel_trends::health::{
    consistency_score, content_quality_score, engagement_score, growth_score,
    market_alignment_score, recommendations, HealthScorer,
};
use channel_trends::{ChannelAggregates, ContentItem, MarketSignals};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn upload(days_ago: i64, views: u64, likes: u64, comments: u64) -> ContentItem {
    let mut item = ContentItem::new(
        format!("upload-{}", days_ago),
        "Weekly upload",
        now() - Duration::days(days_ago),
    );
    item.view_count = views;
    item.like_count = likes;
    item.comment_count = comments;
    item
}

fn polished(days_ago: i64) -> ContentItem {
    let mut item = upload(days_ago, 10_000, 500, 100);
    item.title = "A very long title that clears thirty characters".to_string();
    item.tags = ["ai", "automation", "coding", "tools", "review", "workflow"]
        .iter()
        .map(|tag| tag.to_string())
        .collect();
    item.description = Some("x".repeat(120));
    item
}

fn aggregates(subscriber_count: u64, view_count: u64, video_count: u64) -> ChannelAggregates {
    ChannelAggregates {
        subscriber_count,
        view_count,
        video_count,
    }
}

#[test]
fn empty_channel_uses_fallbacks() {
    let health = HealthScorer::default().score(&[], &aggregates(0, 0, 0), None);
    let breakdown = health.breakdown;

    assert_eq!(breakdown.engagement, 50);
    assert_eq!(breakdown.consistency, 30);
    assert_eq!(breakdown.growth, 50);
    assert_eq!(breakdown.market_alignment, 50);
    assert_eq!(breakdown.content_quality, 50);
    // 0.30·50 + 0.20·30 + 0.20·50 + 0.15·50 + 0.15·50
    assert_eq!(health.overall, 46);
    assert_eq!(health.recommendations, recommendations(46));
    assert_eq!(health.recommendations.len(), 4);
}

#[test]
fn engagement_tiers() {
    assert_eq!(engagement_score(&[]), 50.0);
    assert_eq!(engagement_score(&[upload(1, 10_000, 500, 100)]), 90.0);
    assert_eq!(engagement_score(&[upload(1, 10_000, 150, 50)]), 60.0);
    assert_eq!(engagement_score(&[upload(1, 10_000, 40, 10)]), 40.0);
    assert_eq!(engagement_score(&[upload(1, 0, 0, 0)]), 40.0);
}

#[test]
fn regular_schedule_is_consistent() {
    let items: Vec<ContentItem> = (0..3).map(|day| upload(day, 100, 0, 0)).collect();
    assert!((consistency_score(&items) - 100.0).abs() < 1e-9);

    let health = HealthScorer::default().score(&items, &aggregates(0, 0, 0), None);
    assert_eq!(health.breakdown.consistency, 90);
}

#[test]
fn irregular_schedule_loses_consistency() {
    let items = vec![upload(0, 100, 0, 0), upload(10, 100, 0, 0), upload(1, 100, 0, 0)];
    // intervals 1 and 9 days: variance 16 over mean 5
    assert!((consistency_score(&items) - 68.0).abs() < 1e-9);
}

#[test]
fn consistency_edge_cases() {
    assert_eq!(consistency_score(&[upload(0, 1, 0, 0), upload(3, 1, 0, 0)]), 30.0);

    let simultaneous = vec![upload(2, 1, 0, 0), upload(2, 1, 0, 0), upload(2, 1, 0, 0)];
    let score = consistency_score(&simultaneous);
    assert!(score.is_finite());
    assert!((score - 100.0).abs() < 1e-9);
}

#[test]
fn consistency_only_looks_at_recent_uploads() {
    let mut items: Vec<ContentItem> = (0..10).map(|day| upload(day, 100, 0, 0)).collect();
    items.push(upload(50, 100, 0, 0));
    items.push(upload(200, 100, 0, 0));
    assert!((consistency_score(&items) - 100.0).abs() < 1e-9);
}

#[test]
fn growth_tiers() {
    assert_eq!(growth_score(&aggregates(0, 0, 0)), 50.0);
    // 500 views per video, 0.8% subscriber ratio, 400 subscribers
    assert_eq!(growth_score(&aggregates(400, 50_000, 100)), 55.0);
    // 20 000 views per video, 6% subscriber ratio, 60 000 subscribers
    assert_eq!(growth_score(&aggregates(60_000, 1_000_000, 50)), 95.0);

    let health = HealthScorer::default().score(&[], &aggregates(60_000, 1_000_000, 50), None);
    assert_eq!(health.breakdown.growth, 90);
}

#[test]
fn market_signals_raise_alignment() {
    assert_eq!(market_alignment_score(None), 50.0);
    assert_eq!(market_alignment_score(Some(&MarketSignals::default())), 50.0);

    let partial = MarketSignals {
        competitors: true,
        trends: true,
        ..MarketSignals::default()
    };
    assert_eq!(market_alignment_score(Some(&partial)), 80.0);

    let full = MarketSignals {
        competitors: true,
        audience: true,
        trends: true,
        business_profile: true,
    };
    assert_eq!(market_alignment_score(Some(&full)), 105.0);
    let health = HealthScorer::default().score(&[], &aggregates(0, 0, 0), Some(&full));
    assert_eq!(health.breakdown.market_alignment, 90);
}

#[test]
fn content_quality_averages_items() {
    assert_eq!(content_quality_score(&[]), 50.0);
    assert_eq!(content_quality_score(&[polished(1)]), 100.0);
    assert_eq!(content_quality_score(&[upload(1, 0, 0, 0)]), 50.0);
    assert!((content_quality_score(&[polished(1), upload(2, 0, 0, 0)]) - 75.0).abs() < 1e-9);
}

#[test]
fn overall_is_rounded_weighted_sum() {
    let weights = HealthWeights::default();
    let scorer = HealthScorer::new(weights.clone());
    let items = vec![polished(0), upload(3, 2_000, 30, 5), polished(9), upload(11, 0, 0, 0)];
    let market = MarketSignals {
        audience: true,
        ..MarketSignals::default()
    };
    let health = scorer.score(&items, &aggregates(1_500, 120_000, 30), Some(&market));
    let b = health.breakdown;

    let weighted = weights.engagement * b.engagement as f64
        + weights.consistency * b.consistency as f64
        + weights.growth * b.growth as f64
        + weights.market_alignment * b.market_alignment as f64
        + weights.content_quality * b.content_quality as f64;
    assert_eq!(health.overall as f64, weighted.round());
    assert!(health.overall <= 100);
    assert_eq!(health.recommendations, recommendations(health.overall));
}

#[test]
fn custom_weights_are_respected() {
    let scorer = HealthScorer::new(HealthWeights {
        engagement: 1.0,
        consistency: 0.0,
        growth: 0.0,
        market_alignment: 0.0,
        content_quality: 0.0,
    });
    let health = scorer.score(&[polished(0)], &aggregates(0, 0, 0), None);
    assert_eq!(health.overall, health.breakdown.engagement);
    assert_eq!(health.overall, 90);
}

#[test]
fn recommendation_tiers() {
    let low = recommendations(39);
    let medium = recommendations(40);
    let high = recommendations(70);

    assert_ne!(low, medium);
    assert_ne!(medium, high);
    assert_eq!(medium, recommendations(69));
    assert_eq!(low, recommendations(0));
    assert_eq!(high, recommendations(100));
}
