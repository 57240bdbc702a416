//! HTTP endpoint server using Axum

use axum::{
    extract::{DefaultBodyLimit, Multipart, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::{AppConfig, MarketConfig};
use crate::metrics::Metrics;
use crate::models::{AnalysisResult, MarketCoin, SentimentData, Timeframe};
use crate::services::image::encode_bytes;
use crate::services::{
    ChartAnalyzer, ChartImages, CoinGeckoClient, GeminiClient, GenerativeModel,
    MarketDataProvider, SentimentFetcher,
};

pub const SERVICE_NAME: &str = "chartscope";
pub const ANALYSIS_FAILURE_NOTICE: &str = "Failed to analyze the chart. Please try again.";
pub const SETUP_FAILURE_NOTICE: &str =
    "Chart analysis is not configured on this server. Retrying will not help; contact the operator.";
pub const NO_CHART_NOTICE: &str = "Upload at least one chart (15m or 1h) to analyze.";

/// Screenshots from phones can be large; allow well above axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub analyzer: Arc<ChartAnalyzer>,
    pub sentiment: Arc<SentimentFetcher>,
    pub market: Arc<dyn MarketDataProvider>,
    pub market_config: Arc<MarketConfig>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Always answers 200; failures surface as the neutral fallback record.
async fn get_sentiment(State(state): State<AppState>) -> Json<SentimentData> {
    state.metrics.sentiment_requests_total.inc();
    Json(state.sentiment.fetch_market_sentiment().await)
}

fn timeframe_for_field(name: &str) -> Option<Timeframe> {
    match name {
        "chart_15m" | "file15m" => Some(Timeframe::FifteenMinutes),
        "chart_1h" | "file1h" => Some(Timeframe::OneHour),
        _ => None,
    }
}

/// Analyze one or two uploaded charts
///
/// Multipart fields: `chart_15m`, `chart_1h` (files) and `context` (text).
async fn analyze_charts(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut images = ChartImages::new();
    let mut context = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed analysis upload");
        api_error(StatusCode::BAD_REQUEST, "Malformed multipart upload")
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "context" {
            context = field.text().await.map_err(|e| {
                warn!(error = %e, "Unreadable context field");
                api_error(StatusCode::BAD_REQUEST, "Unreadable context field")
            })?;
            continue;
        }

        let Some(timeframe) = timeframe_for_field(&name) else {
            continue;
        };
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("chart-{}", timeframe.label()));
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            warn!(error = %e, field = %name, "Unreadable chart upload");
            api_error(StatusCode::BAD_REQUEST, "Unreadable chart upload")
        })?;
        if bytes.is_empty() {
            continue;
        }
        images.insert(
            timeframe,
            encode_bytes(&bytes, content_type.as_deref(), &file_name),
        );
    }

    if images.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, NO_CHART_NOTICE));
    }

    state.metrics.chart_analyses_total.inc();
    let start = Instant::now();
    let outcome = state.analyzer.analyze(&images, &context).await;
    state
        .metrics
        .chart_analysis_duration_seconds
        .observe(start.elapsed().as_secs_f64());

    match outcome {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            state.metrics.chart_analysis_failures_total.inc();
            error!(
                error = %e,
                configuration = e.is_configuration(),
                retryable = e.is_retryable(),
                "Chart analysis failed"
            );
            if e.is_configuration() {
                Err(api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SETUP_FAILURE_NOTICE,
                ))
            } else {
                Err(api_error(StatusCode::BAD_GATEWAY, ANALYSIS_FAILURE_NOTICE))
            }
        }
    }
}

async fn top_coins(State(state): State<AppState>) -> Result<Json<Vec<MarketCoin>>, StatusCode> {
    state
        .market
        .top_coins(state.market_config.top_coins_limit)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "Fetching top coins failed");
            StatusCode::BAD_GATEWAY
        })
}

async fn watchlist_coins(
    State(state): State<AppState>,
) -> Result<Json<Vec<MarketCoin>>, StatusCode> {
    state
        .market
        .coins_by_ids(&state.market_config.watchlist)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "Fetching watchlist failed");
            StatusCode::BAD_GATEWAY
        })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/sentiment", get(get_sentiment))
        .route("/api/analyze", post(analyze_charts))
        .route("/api/market/top", get(top_coins))
        .route("/api/market/watchlist", get(watchlist_coins))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire the services from configuration. A missing credential fails here,
/// before the listener is bound.
pub fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(&config.gemini)?);
    let market: Arc<dyn MarketDataProvider> =
        Arc::new(CoinGeckoClient::new(config.market.api_base.clone()));

    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: Arc::new(Metrics::new().map_err(|e| e.to_string())?),
        start_time: Arc::new(Instant::now()),
        analyzer: Arc::new(ChartAnalyzer::new(model.clone(), &config.gemini)),
        sentiment: Arc::new(SentimentFetcher::new(model, &config.gemini)),
        market,
        market_config: Arc::new(config.market.clone()),
    })
}

pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let port = config.port;
    let state = build_state(&config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
