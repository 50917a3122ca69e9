use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{ApiAnalysisResponse, ApiDemoRequest, ApiError};
use channel_trends::config::AnalysisConfig;
use channel_trends::synthetic::generate_batch;
use channel_trends::{analyze_with_config, AnalysisRequest};

#[derive(Clone)]
struct AppState {
    config: Arc<AnalysisConfig>,
}

type ApiResult = Result<Json<ApiAnalysisResponse>, (StatusCode, Json<ApiError>)>;

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let (config, config_path) = AnalysisConfig::load(args.config)?;
    if let Some(path) = config_path.filter(|path| path.exists()) {
        info!(path = %path.display(), "loaded analysis config");
    }
    let state = AppState {
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/demo", post(demo_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    info!(%addr, "listening");

    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(document): Json<serde_json::Value>,
) -> ApiResult {
    let request_id = generate_request_id();
    let request = AnalysisRequest::from_value(&document).map_err(|err| {
        warn!(request_id = %request_id, error = %err, "rejected analysis request");
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: err.to_string(),
            }),
        )
    })?;

    let result = request.analyze(&state.config);
    Ok(Json(ApiAnalysisResponse::from_result(result, request_id)))
}

async fn demo_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiDemoRequest>,
) -> ApiResult {
    let request_id = generate_request_id();
    let now = request.now.unwrap_or_else(chrono::Utc::now);
    let (items, aggregates) = generate_batch(request.seed(), request.count(), now);
    let result = analyze_with_config(&items, &aggregates, None, Some(now), &state.config);
    Ok(Json(ApiAnalysisResponse::from_result(result, request_id)))
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
