//! HTTP routes and handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use calibrant_core::{ConfidenceTier, Error};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/model-info", get(model_info))
        .route("/predict", post(predict))
        .route("/temperature", put(set_temperature))
        .route("/metrics", get(render_metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Prediction request body
#[derive(Debug, Deserialize)]
struct PredictRequest {
    text: String,
}

/// Prediction response body
#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_class: String,
    confidence: f32,
    probabilities: BTreeMap<String, f32>,
    uncertainty: f32,
    confidence_tier: ConfidenceTier,
    latency_us: u64,
}

#[derive(Debug, Deserialize)]
struct TemperatureUpdate {
    temperature: f32,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "model": state.classifier.name(),
        "model_loaded": true,
        "device": state.device,
    }))
}

async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    let labels = state.classifier.labels();
    Json(json!({
        "model": state.classifier.name(),
        "num_classes": labels.len(),
        "labels": labels.labels(),
        "temperature": state.temperature().get(),
        "device": state.device,
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    metrics::counter!("calibrant_requests_total", "endpoint" => "predict").increment(1);

    // snapshot once so a concurrent temperature update cannot split this
    // request's scoring
    let temperature = state.temperature();
    let prediction = state.classifier.classify(&request.text, temperature).await?;

    metrics::histogram!("calibrant_prediction_latency_us").record(prediction.latency_us as f64);
    debug!(
        label = %prediction.label,
        confidence = prediction.confidence,
        uncertainty = prediction.uncertainty,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        predicted_class: prediction.label,
        confidence: prediction.confidence,
        probabilities: prediction.probabilities.into_iter().collect(),
        uncertainty: prediction.uncertainty,
        confidence_tier: prediction.tier,
        latency_us: prediction.latency_us,
    }))
}

async fn set_temperature(
    State(state): State<AppState>,
    Json(update): Json<TemperatureUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let new = state.set_temperature(update.temperature)?;
    Ok(Json(json!({ "temperature": new.get() })))
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// JSON error responses with status codes mapped from the core error taxonomy
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            metrics::counter!("calibrant_errors_total").increment(1);
            error!("prediction failed: {err}");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
