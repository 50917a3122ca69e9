use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use channel_trends::synthetic::DEFAULT_BATCH_LEN;
use channel_trends::AnalysisResult;

const MAX_DEMO_ITEMS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ApiDemoRequest {
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub now: Option<DateTime<Utc>>,
}

impl ApiDemoRequest {
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(42)
    }

    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_BATCH_LEN).min(MAX_DEMO_ITEMS)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalysisResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl ApiAnalysisResponse {
    pub fn from_result(result: AnalysisResult, request_id: String) -> Self {
        Self { request_id, result }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}
