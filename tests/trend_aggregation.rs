use chrono::{DateTime, Duration, TimeZone, Utc};

use channel_trends::config::TrendsConfig;
use channel_trends::scoring::{ScoringPipeline, ShareProjection, TrendClassification};
use channel_trends::trends::{
    aggregate, overall_pattern, FrequencyEntry, OpportunityPriority, PATTERN_DIVERSIFIED,
    PATTERN_EDUCATIONAL, PATTERN_ENGAGEMENT, PATTERN_TECH,
};
use channel_trends::ContentItem;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn item(id: &str, title: &str, age_hours: i64, views: u64, likes: u64, comments: u64) -> ContentItem {
    let mut item = ContentItem::new(id, title, now() - Duration::hours(age_hours));
    item.view_count = views;
    item.like_count = likes;
    item.comment_count = comments;
    item
}

/// 200 views/h, 2.7% engagement at 30h: a score of 40, just rising.
fn rising_tutorial(index: usize) -> ContentItem {
    item(
        &format!("tutorial-{}", index),
        &format!("Python tutorial part {}", index),
        30,
        6_000,
        160,
        0,
    )
}

#[test]
fn tutorial_batch_surfaces_educational_pattern() {
    let items: Vec<ContentItem> = (1..=15).map(rising_tutorial).collect();
    let scored = ScoringPipeline::default().score_batch(&items, now());
    assert!(scored
        .iter()
        .all(|item| item.classification == TrendClassification::Rising));

    let summary = aggregate(&scored, &TrendsConfig::default());
    let reasons = &summary.trending_reasons;

    assert_eq!(summary.rising_content.len(), 15);
    assert_eq!(reasons.top_reasons[0].name, "Educational Content");
    assert_eq!(reasons.top_reasons[0].frequency, 15);

    let educational = reasons
        .trending_topics
        .iter()
        .find(|topic| topic.name == "Educational")
        .expect("educational topic");
    assert!(educational.frequency >= 15);
    assert_eq!(reasons.overall_pattern, PATTERN_EDUCATIONAL);

    let opportunity = &summary.content_opportunities[0];
    assert_eq!(opportunity.theme, "Educational");
    assert_eq!(opportunity.priority, OpportunityPriority::Immediate);
    assert_eq!(opportunity.example_titles.len(), 3);
}

#[test]
fn equal_scores_keep_batch_order() {
    let items: Vec<ContentItem> = (1..=6).map(rising_tutorial).collect();
    let scored = ScoringPipeline::default().score_batch(&items, now());
    let summary = aggregate(&scored, &TrendsConfig::default());

    let ids: Vec<&str> = summary
        .rising_content
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["tutorial-1", "tutorial-2", "tutorial-3", "tutorial-4", "tutorial-5", "tutorial-6"]
    );
    let ranks: Vec<usize> = summary.rising_content.iter().map(|item| item.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn rising_content_is_ranked_by_score() {
    let items = vec![
        rising_tutorial(1),
        item("stale", "Weekend vlog", 200, 300, 1, 0),
        item("launch", "Launch day", 10, 1_000_000, 60_000, 15_000),
    ];
    let scored = ScoringPipeline::default().score_batch(&items, now());
    let summary = aggregate(&scored, &TrendsConfig::default());

    let ids: Vec<&str> = summary
        .rising_content
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(ids, vec!["launch", "tutorial-1"]);
    assert_eq!(summary.rising_content[0].classification, TrendClassification::Viral);
    assert!(
        summary.rising_content[0].performance_score >= summary.rising_content[1].performance_score
    );
}

#[test]
fn small_theme_counts_are_high_priority() {
    let items = vec![
        item("a", "Productivity tips for remote teams", 30, 6_000, 160, 0),
        item("b", "My productivity system in 2019", 30, 6_000, 160, 0),
        item("c", "Morning productivity routine", 30, 6_000, 160, 0),
        item("d", "Garden tour", 30, 6_000, 160, 0),
    ];
    let scored = ScoringPipeline::default().score_batch(&items, now());
    let summary = aggregate(&scored, &TrendsConfig::default());

    assert_eq!(summary.content_opportunities.len(), 1);
    let opportunity = &summary.content_opportunities[0];
    assert_eq!(opportunity.theme, "Productivity");
    assert_eq!(opportunity.frequency, 3);
    assert_eq!(opportunity.priority, OpportunityPriority::High);
    assert_eq!(
        opportunity.example_titles,
        vec![
            "Productivity tips for remote teams".to_string(),
            "My productivity system in 2019".to_string(),
            "Morning productivity routine".to_string(),
        ]
    );
}

#[test]
fn viral_candidates_include_high_share_items() {
    let items = vec![
        rising_tutorial(1),
        // 200 views/h, 5% engagement, 6 comments/h at 100h: rising, high share
        item("chatty", "Ask me anything", 100, 20_000, 400, 600),
        item("launch", "Launch day", 10, 1_000_000, 60_000, 15_000),
    ];
    let scored = ScoringPipeline::default().score_batch(&items, now());
    let summary = aggregate(&scored, &TrendsConfig::default());

    let ids: Vec<&str> = summary
        .viral_potential
        .iter()
        .map(|candidate| candidate.id.as_str())
        .collect();
    assert_eq!(ids, vec!["launch", "chatty"]);
    assert_eq!(summary.viral_potential[1].classification, TrendClassification::Rising);
    assert!(summary.viral_potential[1].share_projection >= ShareProjection::High);
}

#[test]
fn viral_candidates_respect_limit() {
    let items: Vec<ContentItem> = (0..4)
        .map(|index| {
            item(
                &format!("launch-{}", index),
                "Launch day",
                10,
                1_000_000 + index as u64,
                60_000,
                15_000,
            )
        })
        .collect();
    let scored = ScoringPipeline::default().score_batch(&items, now());
    let config = TrendsConfig {
        max_viral_candidates: 2,
        ..TrendsConfig::default()
    };
    let summary = aggregate(&scored, &config);

    assert_eq!(summary.rising_content.len(), 4);
    assert_eq!(summary.viral_potential.len(), 2);
}

#[test]
fn empty_batch_falls_back_to_diversified() {
    let summary = aggregate(&[], &TrendsConfig::default());

    assert!(summary.rising_content.is_empty());
    assert!(summary.trending_reasons.top_reasons.is_empty());
    assert!(summary.trending_reasons.trending_topics.is_empty());
    assert!(summary.content_opportunities.is_empty());
    assert!(summary.viral_potential.is_empty());
    assert_eq!(summary.trending_reasons.overall_pattern, PATTERN_DIVERSIFIED);
    assert_eq!(summary.trending_reasons.market_insights.len(), 1);
}

#[test]
fn declining_catalogue_gets_refresh_insight() {
    let items = vec![
        item("old-1", "Weekend vlog", 200, 300, 1, 0),
        item("old-2", "Another vlog", 300, 200, 0, 0),
        rising_tutorial(1),
    ];
    let scored = ScoringPipeline::default().score_batch(&items, now());
    let summary = aggregate(&scored, &TrendsConfig::default());
    let insights = &summary.trending_reasons.market_insights;

    assert!(insights[0].starts_with("1 of 3 videos are rising or better"));
    assert!(insights.iter().any(|line| line.contains("declining")));
}

#[test]
fn pattern_follows_top_reason() {
    let entry = |name: &str| FrequencyEntry {
        name: name.to_string(),
        frequency: 3,
    };

    assert_eq!(overall_pattern(Some(&entry("AI & Technology"))), PATTERN_TECH);
    assert_eq!(overall_pattern(Some(&entry("Educational Content"))), PATTERN_EDUCATIONAL);
    assert_eq!(overall_pattern(Some(&entry("High Engagement"))), PATTERN_ENGAGEMENT);
    assert_eq!(overall_pattern(Some(&entry("Active Discussion"))), PATTERN_ENGAGEMENT);
    assert_eq!(overall_pattern(Some(&entry("Optimal Timing"))), PATTERN_DIVERSIFIED);
    assert_eq!(overall_pattern(None), PATTERN_DIVERSIFIED);
}
