use thiserror::Error;

/// Contract violations raised while validating an untyped analysis request.
///
/// Everything else in the pipeline is total: malformed numbers are coerced to
/// zero and empty batches degrade to fallback values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("request must be a JSON object")]
    NotAnObject,

    #[error("`items` must be an array of video records")]
    ItemsNotArray,

    #[error("item {index} must be an object")]
    ItemNotObject { index: usize },

    #[error("item {index} is missing a publish timestamp")]
    MissingTimestamp { index: usize },

    #[error("item {index} has an unreadable publish timestamp: {value}")]
    InvalidTimestamp { index: usize, value: String },

    #[error("channel aggregates must be an object")]
    AggregatesNotObject,

    #[error("channel aggregates are missing required key `{0}`")]
    MissingAggregate(&'static str),

    #[error("`marketSignals` must be an object when present")]
    MarketSignalsNotObject,

    #[error("`now` is not a valid RFC 3339 timestamp: {0}")]
    InvalidNow(String),
}
