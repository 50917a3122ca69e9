//! Success-pattern mining over the full history and the topic predictions
//! built from it.
//!
//! The miner looks only at above-baseline performers. It extracts a title
//! token histogram, fixed "winning phrase" detectors and four keyword
//! clusters, then matches them against a fixed template library. Every
//! template carries its own literal confidence; templates under the
//! guaranteed threshold are dropped, never demoted.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PatternConfig;
use crate::keywords::TitleText;
use crate::scoring::normalizer::engagement_rate;
use crate::tiers::ratio_or_zero;
use crate::{format_number, mean, ChannelAggregates, ContentItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    TitleToken,
    Cluster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPattern {
    pub key: String,
    pub kind: PatternKind,
    pub frequency: usize,
    /// Mean engagement rate (percent) of the performers behind the pattern.
    pub average_engagement: f64,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPrediction {
    pub topic: String,
    pub confidence: u8,
    pub reasoning: String,
    pub expected_views_range: String,
    pub example_titles: Vec<String>,
}

/// Presence flags for the fixed phrase detectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningPhrases {
    pub authenticity: bool,
    pub superlative: bool,
    pub completeness: bool,
    pub comparison: bool,
}

impl WinningPhrases {
    fn is_set(&self, phrase: Phrase) -> bool {
        match phrase {
            Phrase::Authenticity => self.authenticity,
            Phrase::Superlative => self.superlative,
            Phrase::Completeness => self.completeness,
            Phrase::Comparison => self.comparison,
        }
    }

    fn set(&mut self, phrase: Phrase) {
        match phrase {
            Phrase::Authenticity => self.authenticity = true,
            Phrase::Superlative => self.superlative = true,
            Phrase::Completeness => self.completeness = true,
            Phrase::Comparison => self.comparison = true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    Authenticity,
    Superlative,
    Completeness,
    Comparison,
}

/// Exact substrings, matched against the lowercased title padded with spaces.
const PHRASE_DETECTORS: &[(Phrase, &str)] = &[
    (Phrase::Authenticity, "honest"),
    (Phrase::Superlative, "best"),
    (Phrase::Completeness, "complete"),
    (Phrase::Comparison, " vs "),
];

struct Cluster {
    key: &'static str,
    display: &'static str,
    keywords: &'static [&'static str],
}

const CLUSTERS: &[Cluster] = &[
    Cluster {
        key: "tooling",
        display: "Developer Tools",
        keywords: &["tool", "tools", "extension", "plugin", "app", "apps", "software", "editor"],
    },
    Cluster {
        key: "automation",
        display: "Automation",
        keywords: &["automate", "automation", "automated", "bot", "script", "zapier", "n8n"],
    },
    Cluster {
        key: "workflow",
        display: "Workflow",
        keywords: &["workflow", "productivity", "setup", "process", "system"],
    },
    Cluster {
        key: "general-development",
        display: "Development",
        keywords: &["code", "coding", "developer", "programming", "build", "python", "javascript", "rust"],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterScore {
    pub key: String,
    pub display_name: String,
    pub item_count: usize,
    /// Engagement as a ratio (likes plus comments over views), not a percentage.
    pub average_engagement_ratio: f64,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub baseline_views: f64,
    pub top_performer_count: usize,
    pub best_performer_views: u64,
    pub title_tokens: Vec<SuccessPattern>,
    pub phrases: WinningPhrases,
    pub clusters: Vec<ClusterScore>,
}

impl PatternReport {
    /// Token patterns followed by cluster patterns.
    pub fn success_patterns(&self) -> Vec<SuccessPattern> {
        let clusters = self.clusters.iter().map(|cluster| SuccessPattern {
            key: cluster.key.clone(),
            kind: PatternKind::Cluster,
            frequency: cluster.item_count,
            average_engagement: cluster.average_engagement_ratio * 100.0,
            confidence: cluster.confidence,
        });
        self.title_tokens.iter().cloned().chain(clusters).collect()
    }

    pub fn strongest_cluster(&self) -> Option<&ClusterScore> {
        self.clusters.first()
    }
}

struct TopicTemplate {
    trigger: Trigger,
    topic: &'static str,
    base_confidence: u8,
    examples: &'static [&'static str],
}

enum Trigger {
    Phrase(Phrase),
    Cluster,
}

const TEMPLATES: &[TopicTemplate] = &[
    TopicTemplate {
        trigger: Trigger::Phrase(Phrase::Authenticity),
        topic: "My Honest Review of {keyword} After 30 Days",
        base_confidence: 92,
        examples: &[
            "My Honest Review of Cursor After 30 Days",
            "Honest Thoughts on Notion AI: Is It Worth Paying For?",
        ],
    },
    TopicTemplate {
        trigger: Trigger::Phrase(Phrase::Superlative),
        topic: "The Best {cluster} Picks in {year}",
        base_confidence: 90,
        examples: &[
            "The Best AI Coding Tools in 2025",
            "Best Automation Apps for Solo Creators",
        ],
    },
    TopicTemplate {
        trigger: Trigger::Phrase(Phrase::Completeness),
        topic: "The Complete {keyword} Guide for Beginners",
        base_confidence: 88,
        examples: &[
            "The Complete n8n Guide for Beginners",
            "Complete VS Code Setup From Scratch",
        ],
    },
    TopicTemplate {
        trigger: Trigger::Cluster,
        topic: "How I Use {keyword} to Level Up My {cluster}",
        base_confidence: 87,
        examples: &[
            "How I Use AI Agents to Level Up My Workflow",
            "How I Automate My Entire Week With Three Tools",
        ],
    },
    TopicTemplate {
        trigger: Trigger::Phrase(Phrase::Comparison),
        topic: "{keyword} vs the Alternatives: Which One Wins?",
        base_confidence: 82,
        examples: &["Cursor vs Copilot: Which One Wins?"],
    },
    TopicTemplate {
        trigger: Trigger::Cluster,
        topic: "{cluster} Mistakes Everyone Makes",
        base_confidence: 78,
        examples: &["7 Workflow Mistakes Everyone Makes"],
    },
];

/// Average views per video, preferring the channel aggregates.
pub fn baseline_views(items: &[ContentItem], aggregates: &ChannelAggregates) -> f64 {
    if aggregates.view_count > 0 && aggregates.video_count > 0 {
        return ratio_or_zero(aggregates.view_count as f64, aggregates.video_count as f64);
    }
    let views: Vec<f64> = items.iter().map(|item| item.view_count as f64).collect();
    mean(&views)
}

/// Items above `ratio × baseline`, most viewed first.
pub fn top_performers<'a>(items: &'a [ContentItem], threshold: f64) -> Vec<&'a ContentItem> {
    let mut performers: Vec<&ContentItem> = items
        .iter()
        .filter(|item| item.view_count as f64 > threshold)
        .collect();
    performers.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    performers
}

pub fn mine(
    items: &[ContentItem],
    aggregates: &ChannelAggregates,
    config: &PatternConfig,
) -> PatternReport {
    let baseline = baseline_views(items, aggregates);
    let performers = top_performers(items, baseline * config.top_performer_ratio);
    debug!(
        baseline,
        performers = performers.len(),
        "mining success patterns"
    );

    let titles: Vec<TitleText> = performers
        .iter()
        .map(|item| TitleText::new(&item.title))
        .collect();
    let rates: Vec<f64> = performers
        .iter()
        .map(|item| engagement_rate(item.view_count, item.like_count, item.comment_count))
        .collect();

    PatternReport {
        baseline_views: baseline,
        top_performer_count: performers.len(),
        best_performer_views: performers.first().map(|item| item.view_count).unwrap_or(0),
        title_tokens: token_patterns(&titles, &rates, config.top_tokens),
        phrases: detect_phrases(&performers),
        clusters: score_clusters(&titles, &rates),
    }
}

fn token_patterns(titles: &[TitleText], rates: &[f64], limit: usize) -> Vec<SuccessPattern> {
    let mut histogram: Vec<(String, usize)> = Vec::new();
    for title in titles {
        for token in title.tokens() {
            if token.chars().count() <= 3 {
                continue;
            }
            match histogram.iter_mut().find(|(word, _)| word == token) {
                Some((_, count)) => *count += 1,
                None => histogram.push((token.clone(), 1)),
            }
        }
    }
    histogram.sort_by(|a, b| b.1.cmp(&a.1));
    histogram.truncate(limit);

    histogram
        .into_iter()
        .map(|(word, frequency)| {
            let engagement: Vec<f64> = titles
                .iter()
                .zip(rates)
                .filter(|(title, _)| title.contains_token(&word))
                .map(|(_, rate)| *rate)
                .collect();
            SuccessPattern {
                key: word,
                kind: PatternKind::TitleToken,
                frequency,
                average_engagement: mean(&engagement),
                confidence: (50 + 10 * frequency).min(95) as u8,
            }
        })
        .collect()
}

fn detect_phrases(performers: &[&ContentItem]) -> WinningPhrases {
    let mut phrases = WinningPhrases::default();
    for item in performers {
        let padded = format!(" {} ", item.title.to_lowercase());
        for (phrase, needle) in PHRASE_DETECTORS {
            if padded.contains(needle) {
                phrases.set(*phrase);
            }
        }
    }
    phrases
}

/// Non-empty clusters, strongest first. Ties keep declaration order.
fn score_clusters(titles: &[TitleText], rates: &[f64]) -> Vec<ClusterScore> {
    let mut scores: Vec<ClusterScore> = CLUSTERS
        .iter()
        .filter_map(|cluster| {
            let members: Vec<f64> = titles
                .iter()
                .zip(rates)
                .filter(|(title, _)| title.matches_any(cluster.keywords))
                .map(|(_, rate)| rate / 100.0)
                .collect();
            if members.is_empty() {
                return None;
            }
            let ratio = mean(&members);
            let raw = 60.0 + 10.0 * members.len() as f64 + 1000.0 * ratio;
            Some(ClusterScore {
                key: cluster.key.to_string(),
                display_name: cluster.display.to_string(),
                item_count: members.len(),
                average_engagement_ratio: ratio,
                confidence: raw.min(95.0).round() as u8,
            })
        })
        .collect();
    scores.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    scores
}

/// Every template whose trigger fired, in library order.
pub fn predict(
    report: &PatternReport,
    config: &PatternConfig,
    now: DateTime<Utc>,
) -> Vec<TopicPrediction> {
    if report.top_performer_count == 0 {
        return Vec::new();
    }

    let cluster = report.strongest_cluster();
    let cluster_name = cluster
        .map(|cluster| cluster.display_name.clone())
        .unwrap_or_else(|| "Creator".to_string());
    let keyword = report
        .title_tokens
        .first()
        .map(|pattern| capitalize(&pattern.key))
        .unwrap_or_else(|| cluster_name.clone());
    let year = now.year().to_string();

    let low = report.baseline_views * config.top_performer_ratio;
    let high = (report.best_performer_views as f64).max(low);
    let expected_views_range = format!("{}-{} views", format_number(low), format_number(high));

    TEMPLATES
        .iter()
        .filter_map(|template| {
            let reasoning = match template.trigger {
                Trigger::Phrase(phrase) => {
                    if !report.phrases.is_set(phrase) {
                        return None;
                    }
                    format!(
                        "Top performers use {} framing in their titles",
                        phrase_label(phrase)
                    )
                }
                Trigger::Cluster => {
                    let cluster = cluster?;
                    format!(
                        "{} is the strongest topic cluster with {} top performers (cluster confidence {})",
                        cluster.display_name, cluster.item_count, cluster.confidence
                    )
                }
            };

            let topic = template
                .topic
                .replace("{keyword}", &keyword)
                .replace("{cluster}", &cluster_name)
                .replace("{year}", &year);

            Some(TopicPrediction {
                topic,
                confidence: template.base_confidence,
                reasoning,
                expected_views_range: expected_views_range.clone(),
                example_titles: template.examples.iter().map(|title| title.to_string()).collect(),
            })
        })
        .collect()
}

/// Keeps predictions at or above the threshold; the rest are discarded.
pub fn guaranteed_topics(predictions: Vec<TopicPrediction>, min_confidence: u8) -> Vec<TopicPrediction> {
    let mut kept: Vec<TopicPrediction> = predictions
        .into_iter()
        .filter(|prediction| prediction.confidence >= min_confidence)
        .collect();
    kept.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    kept
}

fn phrase_label(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::Authenticity => "an honest, first-person",
        Phrase::Superlative => "a \"best of\"",
        Phrase::Completeness => "a complete-guide",
        Phrase::Comparison => "a head-to-head comparison",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
