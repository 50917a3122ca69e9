use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{ChannelAggregates, ContentItem};

pub const DEFAULT_BATCH_LEN: usize = 24;

const TITLE_TEMPLATES: &[&str] = &[
    "How to Automate Your {topic} Workflow",
    "My Honest Review of {topic}",
    "The Best {topic} Tools for Developers",
    "{topic} Tutorial for Complete Beginners",
    "I Tried {topic} for 30 Days",
    "New {topic} Features You Missed",
    "{topic} vs ChatGPT: Which Is Better?",
    "Building a Side Project With {topic}",
];

const TOPICS: &[&str] = &[
    "AI Coding",
    "n8n",
    "Notion",
    "Python",
    "Cursor",
    "Zapier",
    "VS Code",
    "Obsidian",
];

const TAG_POOL: &[&str] = &[
    "ai",
    "automation",
    "productivity",
    "tutorial",
    "coding",
    "programming",
    "review",
    "workflow",
    "tools",
    "developer",
];

/// A reproducible channel history: same seed and `now`, same batch.
pub fn generate_batch(
    seed: u64,
    count: usize,
    now: DateTime<Utc>,
) -> (Vec<ContentItem>, ChannelAggregates) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut items = Vec::with_capacity(count);
    let mut age_hours: f64 = rng.gen_range(2.0..30.0);

    for idx in 0..count {
        let template = TITLE_TEMPLATES[rng.gen_range(0..TITLE_TEMPLATES.len())];
        let topic = TOPICS[rng.gen_range(0..TOPICS.len())];
        let title = template.replace("{topic}", topic);

        // Older uploads have had longer to collect views.
        let hourly_views: f64 = rng.gen_range(5.0..1_500.0);
        let view_count = (hourly_views * age_hours.max(1.0)) as u64;
        let engagement: f64 = rng.gen_range(0.005..0.07);
        let comment_share: f64 = rng.gen_range(0.05..0.3);
        let interactions = view_count as f64 * engagement;
        let comment_count = (interactions * comment_share) as u64;
        let like_count = (interactions as u64).saturating_sub(comment_count);

        let tag_count = rng.gen_range(0..=8);
        let tags = (0..tag_count)
            .map(|_| TAG_POOL[rng.gen_range(0..TAG_POOL.len())].to_string())
            .collect();

        let description = if rng.gen::<f64>() < 0.6 {
            Some(format!(
                "{} In this video we walk through setup, real examples and the mistakes to avoid so you can get results on day one.",
                title
            ))
        } else {
            None
        };

        let published_at = now - Duration::minutes((age_hours * 60.0) as i64);
        items.push(ContentItem {
            id: format!("synthetic_{}", idx),
            title,
            published_at,
            duration_seconds: rng.gen_range(45.0..1_800.0),
            view_count,
            like_count,
            comment_count,
            tags,
            description,
        });

        age_hours += rng.gen_range(20.0..120.0);
    }

    let batch_views: u64 = items.iter().map(|item| item.view_count).sum();
    let back_catalogue = rng.gen_range(0..=count as u64 * 2);
    let aggregates = ChannelAggregates {
        subscriber_count: (batch_views as f64 * rng.gen_range(0.005..0.06)) as u64,
        view_count: batch_views + back_catalogue * rng.gen_range(100..5_000),
        video_count: count as u64 + back_catalogue,
    };

    (items, aggregates)
}
