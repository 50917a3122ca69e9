//! Validation of untyped analysis requests.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "items": [{ "id": "...", "title": "...", "publishedAt": "2025-01-01T00:00:00Z",
//!               "duration": 420, "viewCount": 1000, "likeCount": 40, "commentCount": 5,
//!               "tags": ["ai"], "description": "..." }],
//!   "channel": { "subscriberCount": 1200, "viewCount": 90000, "videoCount": 40 },
//!   "marketSignals": { "competitors": true, "audience": {...}, "trends": null },
//!   "now": "2025-01-02T00:00:00Z"
//! }
//! ```
//!
//! Numeric fields that are present but null, negative or not numbers become 0.
//! Structural problems (no item array, missing aggregate keys, no timestamp)
//! are reported as [`InvalidInputError`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::error::InvalidInputError;
use crate::{
    analyze_with_config, stable_hash64, AnalysisResult, ChannelAggregates, ContentItem,
    MarketSignals,
};

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub items: Vec<ContentItem>,
    pub aggregates: ChannelAggregates,
    pub market: Option<MarketSignals>,
    pub now: Option<DateTime<Utc>>,
}

impl AnalysisRequest {
    pub fn from_value(value: &Value) -> Result<Self, InvalidInputError> {
        let root = value.as_object().ok_or(InvalidInputError::NotAnObject)?;

        let items = root
            .get("items")
            .and_then(Value::as_array)
            .ok_or(InvalidInputError::ItemsNotArray)?
            .iter()
            .enumerate()
            .map(|(index, item)| parse_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let aggregates = parse_aggregates(field(root, &["channel", "channelAggregates"]))?;

        let market = match field(root, &["marketSignals", "market_signals"]) {
            None | Some(Value::Null) => None,
            Some(Value::Object(signals)) => Some(parse_market(signals)),
            Some(_) => return Err(InvalidInputError::MarketSignalsNotObject),
        };

        let now = match root.get("now") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(parse_rfc3339(raw).ok_or_else(|| {
                InvalidInputError::InvalidNow(raw.clone())
            })?),
            Some(other) => Some(
                parse_timestamp(other).ok_or_else(|| InvalidInputError::InvalidNow(other.to_string()))?,
            ),
        };

        Ok(Self {
            items,
            aggregates,
            market,
            now,
        })
    }

    pub fn analyze(&self, config: &AnalysisConfig) -> AnalysisResult {
        analyze_with_config(
            &self.items,
            &self.aggregates,
            self.market.as_ref(),
            self.now,
            config,
        )
    }
}

pub fn analyze_json(value: &Value, config: &AnalysisConfig) -> Result<AnalysisResult, InvalidInputError> {
    Ok(AnalysisRequest::from_value(value)?.analyze(config))
}

fn parse_item(index: usize, value: &Value) -> Result<ContentItem, InvalidInputError> {
    let object = value
        .as_object()
        .ok_or(InvalidInputError::ItemNotObject { index })?;

    let published_at = match field(object, &["publishedAt", "published_at", "publishTime"]) {
        None | Some(Value::Null) => return Err(InvalidInputError::MissingTimestamp { index }),
        Some(raw) => parse_timestamp(raw).ok_or_else(|| InvalidInputError::InvalidTimestamp {
            index,
            value: raw.to_string(),
        })?,
    };

    let title = field(object, &["title"])
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let id = field(object, &["id", "videoId", "video_id"])
        .and_then(|raw| match raw {
            Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| {
            let payload = format!("{}:{}", title, published_at.to_rfc3339());
            format!("video_{:x}", stable_hash64(&payload))
        });

    let description = field(object, &["description"])
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ContentItem {
        view_count: count_field(object, &["viewCount", "view_count", "views"], &id),
        like_count: count_field(object, &["likeCount", "like_count", "likes"], &id),
        comment_count: count_field(object, &["commentCount", "comment_count", "comments"], &id),
        duration_seconds: duration_field(object),
        tags: parse_tags(field(object, &["tags"])),
        id,
        title,
        published_at,
        description,
    })
}

fn parse_aggregates(value: Option<&Value>) -> Result<ChannelAggregates, InvalidInputError> {
    let object = value
        .and_then(Value::as_object)
        .ok_or(InvalidInputError::AggregatesNotObject)?;

    let required = |keys: &[&str], name: &'static str| -> Result<u64, InvalidInputError> {
        let raw = field(object, keys).ok_or(InvalidInputError::MissingAggregate(name))?;
        Ok(coerce_count(raw).unwrap_or_else(|| {
            warn!(field = name, value = %raw, "coercing unreadable channel counter to 0");
            0
        }))
    };

    Ok(ChannelAggregates {
        subscriber_count: required(&["subscriberCount", "subscriber_count"], "subscriberCount")?,
        view_count: required(&["viewCount", "view_count"], "viewCount")?,
        video_count: required(&["videoCount", "video_count"], "videoCount")?,
    })
}

fn parse_market(object: &Map<String, Value>) -> MarketSignals {
    let present = |keys: &[&str]| field(object, keys).map(is_present).unwrap_or(false);
    MarketSignals {
        competitors: present(&["competitors", "competitorData"]),
        audience: present(&["audience", "audienceData"]),
        trends: present(&["trends", "trendData"]),
        business_profile: present(&["businessProfile", "business_profile"]),
    }
}

/// A signal counts as present unless it is null, `false` or empty.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(values) => !values.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Number(_) => true,
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn count_field(object: &Map<String, Value>, keys: &[&str], id: &str) -> u64 {
    match field(object, keys) {
        None => 0,
        Some(raw) => coerce_count(raw).unwrap_or_else(|| {
            warn!(item = id, field = keys[0], value = %raw, "coercing unreadable counter to 0");
            0
        }),
    }
}

/// Non-negative whole count from a number or numeric string.
fn coerce_count(value: &Value) -> Option<u64> {
    let number = coerce_f64(value)?;
    if number < 0.0 {
        return None;
    }
    Some(number.floor() as u64)
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn duration_field(object: &Map<String, Value>) -> f64 {
    match field(object, &["duration", "durationSeconds", "duration_seconds"]) {
        None => 0.0,
        Some(Value::String(text)) if text.trim_start().starts_with('P') => {
            parse_iso8601_duration(text).unwrap_or(0.0)
        }
        Some(raw) => coerce_f64(raw).filter(|seconds| *seconds >= 0.0).unwrap_or(0.0),
    }
}

/// Parses the `PT#H#M#S` form used by video platform APIs.
pub fn parse_iso8601_duration(text: &str) -> Option<f64> {
    let rest = text.trim().strip_prefix('P')?;
    let mut seconds = 0.0;
    let mut number = String::new();
    let mut in_time = false;

    for ch in rest.chars() {
        match ch {
            'T' => in_time = true,
            '0'..='9' | '.' => number.push(ch),
            unit => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                seconds += match (in_time, unit) {
                    (false, 'D') => value * 86_400.0,
                    (true, 'H') => value * 3_600.0,
                    (true, 'M') => value * 60.0,
                    (true, 'S') => value,
                    _ => return None,
                };
            }
        }
    }

    if !number.is_empty() {
        return None;
    }
    Some(seconds)
}

fn parse_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(tags)) => tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_rfc3339(text),
        Value::Number(number) => {
            let seconds = number.as_i64().or_else(|| number.as_f64().map(|value| value as i64))?;
            DateTime::from_timestamp(seconds, 0)
        }
        _ => None,
    }
}

fn parse_rfc3339(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
