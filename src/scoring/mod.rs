pub mod classifier;
pub mod normalizer;
pub mod pipeline;
pub mod projection;
pub mod reasons;

pub use classifier::{TrendClassification, TrendClassifier};
pub use normalizer::{normalize, NormalizedMetrics, RetentionSignal, ShareProjection};
pub use pipeline::{rank_by_score, ScoredItem, ScoringPipeline};
pub use projection::{PeakProjection, PeakProjector};
pub use reasons::{attribute, Impact, TrendReason};
