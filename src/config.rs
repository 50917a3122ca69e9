use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::tiers::ThresholdTable;

/// Point tables summed into the 0-100 performance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    pub view_velocity: ThresholdTable,
    pub engagement_rate: ThresholdTable,
    pub comment_velocity: ThresholdTable,
    pub recency_hours: ThresholdTable,
    pub max_score: f64,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            view_velocity: ThresholdTable::above(
                &[(1000.0, 40.0), (500.0, 30.0), (100.0, 20.0), (50.0, 10.0)],
                0.0,
            ),
            engagement_rate: ThresholdTable::above(
                &[(5.0, 35.0), (3.0, 25.0), (2.0, 15.0), (1.0, 10.0)],
                0.0,
            ),
            comment_velocity: ThresholdTable::above(&[(10.0, 15.0), (5.0, 10.0), (1.0, 5.0)], 0.0),
            recency_hours: ThresholdTable::below(&[(24.0, 10.0), (72.0, 5.0)], 0.0),
            max_score: 100.0,
        }
    }
}

/// Floors an item has to clear for one classification tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierFloor {
    pub min_score: f64,
    pub min_view_velocity: f64,
    pub min_engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub viral: TierFloor,
    pub trending: TierFloor,
    pub rising: TierFloor,
    pub stable_min_score: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            viral: TierFloor {
                min_score: 80.0,
                min_view_velocity: 1000.0,
                min_engagement_rate: 4.0,
            },
            trending: TierFloor {
                min_score: 60.0,
                min_view_velocity: 300.0,
                min_engagement_rate: 2.5,
            },
            rising: TierFloor {
                min_score: 40.0,
                min_view_velocity: 100.0,
                min_engagement_rate: 1.5,
            },
            stable_min_score: 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub multipliers: ThresholdTable,
    pub max_confidence: u8,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            multipliers: ThresholdTable::above(&[(80.0, 5.0), (60.0, 3.0), (40.0, 2.0)], 1.2),
            max_confidence: 95,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub top_performer_ratio: f64,
    pub guaranteed_min_confidence: u8,
    pub top_tokens: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            top_performer_ratio: 1.2,
            guaranteed_min_confidence: 85,
            top_tokens: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    pub engagement: f64,
    pub consistency: f64,
    pub growth: f64,
    pub market_alignment: f64,
    pub content_quality: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            engagement: 0.30,
            consistency: 0.20,
            growth: 0.20,
            market_alignment: 0.15,
            content_quality: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    pub top_reasons: usize,
    pub top_topics: usize,
    pub max_viral_candidates: usize,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            top_reasons: 5,
            top_topics: 3,
            max_viral_candidates: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub scoring: ScoringTables,
    pub classification: ClassificationConfig,
    pub projection: ProjectionConfig,
    pub patterns: PatternConfig,
    pub health: HealthWeights,
    pub trends: TrendsConfig,
}

impl AnalysisConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml(&contents)?
            } else {
                AnalysisConfig::default()
            }
        } else {
            AnalysisConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|err| format!("failed to serialize config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| format!("failed to create config dir: {}", err))?;
            }
        }
        let payload = self.to_toml()?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies `TRENDS_*` overrides read through `lookup`. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TRENDS_GUARANTEED_MIN_CONFIDENCE") {
            if let Ok(value) = value.trim().parse::<u8>() {
                self.patterns.guaranteed_min_confidence = value.min(100);
            }
        }
        if let Some(value) = lookup("TRENDS_TOP_PERFORMER_RATIO") {
            if let Ok(value) = value.trim().parse::<f64>() {
                if value.is_finite() && value > 0.0 {
                    self.patterns.top_performer_ratio = value;
                }
            }
        }
        if let Some(value) = lookup("TRENDS_MAX_VIRAL_CANDIDATES") {
            if let Ok(value) = value.trim().parse::<usize>() {
                self.trends.max_viral_candidates = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("TRENDS_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/trends.toml")))
}
