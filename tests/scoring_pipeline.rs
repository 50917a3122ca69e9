use chrono::{DateTime, Duration, TimeZone, Utc};

use channel_trends::config::AnalysisConfig;
use channel_trends::scoring::normalizer::{retention_signal, share_projection};
use channel_trends::scoring::reasons::matched_tag_keywords;
use channel_trends::scoring::{
    attribute, normalize, Impact, NormalizedMetrics, PeakProjector, RetentionSignal,
    ScoringPipeline, ShareProjection, TrendClassification, TrendClassifier,
};
use channel_trends::tiers::ThresholdTable;
use channel_trends::ContentItem;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn item(title: &str, age_hours: i64, views: u64, likes: u64, comments: u64) -> ContentItem {
    let mut item = ContentItem::new("video", title, now() - Duration::hours(age_hours));
    item.view_count = views;
    item.like_count = likes;
    item.comment_count = comments;
    item
}

fn metrics(age_hours: f64, view_velocity: f64, comment_velocity: f64, engagement_rate: f64) -> NormalizedMetrics {
    NormalizedMetrics {
        age_hours,
        view_velocity,
        comment_velocity,
        engagement_rate,
        retention_signal: RetentionSignal::Low,
        share_projection: ShareProjection::Low,
    }
}

#[test]
fn zero_views_yield_zero_engagement() {
    let video = item("Nothing yet", 5, 0, 0, 0);
    let normalized = normalize(&video, now());

    assert_eq!(normalized.engagement_rate, 0.0);
    assert_eq!(normalized.view_velocity, 0.0);
    assert!(normalized.comment_velocity.is_finite());

    let score = TrendClassifier::default().performance_score(&normalized);
    assert!(score.is_finite());
    assert!((score - 10.0).abs() < 1e-9, "only the recency bonus applies: {}", score);
}

#[test]
fn future_publish_time_clamps_age_to_zero() {
    let mut video = item("Scheduled premiere", 0, 1_000, 50, 10);
    video.published_at = now() + Duration::hours(6);
    let normalized = normalize(&video, now());

    assert_eq!(normalized.age_hours, 0.0);
    assert_eq!(normalized.view_velocity, 0.0);
    assert_eq!(normalized.comment_velocity, 0.0);
    assert!((normalized.engagement_rate - 6.0).abs() < 1e-9);
}

#[test]
fn retention_and_share_tiers() {
    assert_eq!(retention_signal(900.0, 2.5), RetentionSignal::High);
    assert_eq!(retention_signal(120.0, 3.5), RetentionSignal::High);
    assert_eq!(retention_signal(400.0, 3.5), RetentionSignal::Medium);
    assert_eq!(retention_signal(900.0, 1.0), RetentionSignal::Low);

    assert_eq!(share_projection(4.5, 9.0), ShareProjection::VeryHigh);
    assert_eq!(share_projection(4.5, 6.0), ShareProjection::High);
    assert_eq!(share_projection(2.5, 3.0), ShareProjection::Medium);
    assert_eq!(share_projection(5.0, 1.0), ShareProjection::Low);
}

#[test]
fn performance_score_sums_tiers() {
    let classifier = TrendClassifier::default();

    // 20 velocity + 15 engagement + 5 comments + 5 recency
    let score = classifier.performance_score(&metrics(48.0, 150.0, 2.0, 2.5));
    assert!((score - 45.0).abs() < 1e-9);

    // tiers use strict comparisons
    let score = classifier.performance_score(&metrics(72.0, 50.0, 1.0, 1.0));
    assert_eq!(score, 0.0);

    let score = classifier.performance_score(&metrics(1.0, 5_000.0, 50.0, 9.0));
    assert!((score - 100.0).abs() < 1e-9);
}

#[test]
fn breakout_upload_is_viral() {
    let video = item("Launch day", 10, 1_000_000, 60_000, 15_000);
    let pipeline = ScoringPipeline::default();
    let scored = pipeline.score(&video, now());

    assert!((scored.metrics.view_velocity - 100_000.0).abs() < 1e-6);
    assert!((scored.metrics.engagement_rate - 7.5).abs() < 1e-9);
    assert_eq!(scored.classification, TrendClassification::Viral);
    assert_eq!(scored.metrics.share_projection, ShareProjection::VeryHigh);
}

#[test]
fn stale_upload_is_declining() {
    let video = item("Old upload", 100, 500, 2, 0);
    let scored = ScoringPipeline::default().score(&video, now());

    assert!((scored.metrics.engagement_rate - 0.4).abs() < 1e-9);
    assert!((scored.metrics.view_velocity - 5.0).abs() < 1e-9);
    assert_eq!(scored.classification, TrendClassification::Declining);
}

#[test]
fn viral_score_without_velocity_falls_through() {
    let classifier = TrendClassifier::default();
    let m = metrics(10.0, 900.0, 20.0, 6.0);
    let score = classifier.performance_score(&m);

    assert!(score >= 80.0);
    assert_eq!(classifier.classify(&m, score), TrendClassification::Trending);
}

#[test]
fn classification_is_monotonic_in_score() {
    let classifier = TrendClassifier::default();
    let samples = [
        metrics(10.0, 50.0, 0.5, 0.5),
        metrics(10.0, 150.0, 2.0, 2.0),
        metrics(10.0, 400.0, 6.0, 3.0),
        metrics(10.0, 2_000.0, 12.0, 6.0),
    ];

    for m in &samples {
        let mut previous = TrendClassification::Declining;
        for step in 0..=100 {
            let class = classifier.classify(m, step as f64);
            assert!(class >= previous, "score {} dropped to {:?}", step, class);
            previous = class;
        }
    }
}

#[test]
fn reasons_fire_in_rule_order() {
    let mut video = item("Build an AI agent: new 2025 tutorial", 0, 0, 0, 0);
    video.published_at = Utc.with_ymd_and_hms(2025, 6, 1, 15, 30, 0).unwrap();
    video.tags = vec!["AI Tools".to_string(), "vlog".to_string(), "chatgpt tips".to_string()];

    let reasons = attribute(&video, &metrics(2.0, 800.0, 9.0, 4.5), now());
    let factors: Vec<&str> = reasons.iter().map(|reason| reason.factor.as_str()).collect();

    assert_eq!(
        factors,
        vec![
            "AI & Technology",
            "Educational Content",
            "Fresh Content",
            "High Engagement",
            "Strong Momentum",
            "Active Discussion",
            "Trending Keywords",
            "Optimal Timing",
        ]
    );
    assert_eq!(reasons[0].impact, Impact::High);
    assert_eq!(reasons[7].impact, Impact::Low);
    assert!(reasons[6].description.ends_with("ai, chatgpt"));
}

#[test]
fn quiet_item_has_no_reasons() {
    let mut video = item("He said it again at the weekend", 0, 0, 0, 0);
    video.published_at = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();

    let reasons = attribute(&video, &metrics(80.0, 3.0, 0.0, 0.5), now());
    assert!(reasons.is_empty(), "unexpected reasons: {:?}", reasons);
}

#[test]
fn projection_scales_with_score() {
    let projector = PeakProjector::default();

    let strong = projector.project(&metrics(10.0, 400.0, 3.0, 4.0), 85.0, 1_000);
    assert_eq!(strong.estimated_peak_views, 5_000);
    assert_eq!(strong.estimated_peak_time_hours, 49);
    assert_eq!(strong.confidence, 95);

    let weak = projector.project(&metrics(50.0, 6.0, 0.0, 0.0), 10.0, 333);
    assert_eq!(weak.estimated_peak_views, 400);
    assert_eq!(weak.estimated_peak_time_hours, 54);
    assert_eq!(weak.confidence, 80);
}

#[test]
fn projection_never_undershoots_current_state() {
    let projector = PeakProjector::default();
    for score in [0.0, 41.0, 61.0, 81.0] {
        let projection = projector.project(&metrics(12.4, 10.0, 0.0, 1.0), score, 777);
        assert!(projection.estimated_peak_views >= 777);
        assert!(projection.estimated_peak_time_hours as f64 >= 12.4);
        assert!(projection.confidence <= 95);
    }
}

#[test]
fn threshold_tables_take_first_match() {
    let above = ThresholdTable::above(&[(10.0, 3.0), (5.0, 2.0)], 1.0);
    assert_eq!(above.lookup(11.0), 3.0);
    assert_eq!(above.lookup(10.0), 2.0);
    assert_eq!(above.lookup(5.0), 1.0);
    assert_eq!(above.lookup(f64::NAN), 1.0);

    let below = ThresholdTable::below(&[(24.0, 10.0), (72.0, 5.0)], 0.0);
    assert_eq!(below.lookup(0.0), 10.0);
    assert_eq!(below.lookup(24.0), 5.0);
    assert_eq!(below.lookup(72.0), 0.0);
}

#[test]
fn pipeline_honours_configured_floors() {
    let mut config = AnalysisConfig::default();
    config.classification.rising.min_view_velocity = 10_000.0;
    let pipeline = ScoringPipeline::from_config(&config);

    let video = item("Solid performer", 30, 6_000, 150, 30);
    let scored = pipeline.score(&video, now());

    assert_eq!(scored.classification, TrendClassification::Stable);
    assert_eq!(
        ScoringPipeline::default().score(&video, now()).classification,
        TrendClassification::Rising
    );
}

#[test]
fn tag_keywords_match_whole_tokens() {
    let tags = |values: &[&str]| values.iter().map(|tag| tag.to_string()).collect::<Vec<_>>();

    assert!(matched_tag_keywords(&tags(&["email marketing", "detail"])).is_empty());
    assert_eq!(
        matched_tag_keywords(&tags(&["Email Marketing", "AI", "python programming"])),
        vec!["ai", "programming"]
    );

    let mut video = item("Weekend vlog", 0, 0, 0, 0);
    video.published_at = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
    video.tags = tags(&["email marketing", "detail"]);
    let reasons = attribute(&video, &metrics(80.0, 3.0, 0.0, 0.5), now());
    assert!(reasons
        .iter()
        .all(|reason| reason.factor != "Trending Keywords"));
}
