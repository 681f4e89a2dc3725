//! HTTP routes over an injected, already-initialized model

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fare_core::vocab::{allowed_values, Category, City};
use fare_core::{FareCoreError, TrainedModel};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::audit::{AuditEntry, AuditSink, NoopAuditLog};
use crate::schemas::{
    HealthResponse, MetadataDefaults, MetadataResponse, PredictRequest, PredictResponse,
    RootResponse, RouteMedianQuery, RouteMedianResponse,
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<TrainedModel>,
    pub audit: Arc<dyn AuditSink>,
    pub web_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(model: Arc<TrainedModel>) -> Self {
        Self {
            model,
            audit: Arc::new(NoopAuditLog),
            web_dir: None,
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_web_dir(mut self, web_dir: impl Into<PathBuf>) -> Self {
        self.web_dir = Some(web_dir.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unprocessable<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<FareCoreError> for ApiError {
    fn from(err: FareCoreError) -> Self {
        match err {
            FareCoreError::InvalidTrip(message) => Self::unprocessable(message),
            other => {
                error!("Prediction failed: {}", other);
                Self::internal(format!("prediction failed: {other}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handle_root))
        .route("/api/health", get(handle_health))
        .route("/api/metadata", get(handle_metadata))
        .route("/api/route-median", get(handle_route_median))
        .route("/api/predict", post(handle_predict));

    if let Some(web_dir) = &state.web_dir {
        if web_dir.exists() {
            info!("Serving web UI from {:?}", web_dir);
            router = router.nest_service(
                "/ui",
                ServeDir::new(web_dir).append_index_html_on_directories(true),
            );
        } else {
            warn!("Web UI directory {:?} does not exist", web_dir);
        }
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Flight Price Predictor API. Open /ui/ for the web app.".to_string(),
        endpoints: ["/api/metadata", "/api/predict", "/ui/"]
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_version: state.model.version.clone(),
        has_pipeline: true,
    })
}

async fn handle_metadata(State(state): State<AppState>) -> Json<MetadataResponse> {
    let allowed: BTreeMap<String, Vec<String>> = allowed_values()
        .into_iter()
        .map(|(field, values)| (field.to_string(), values))
        .collect();
    Json(MetadataResponse {
        allowed,
        defaults: MetadataDefaults {
            global_duration_median: state.model.route_stats.global_median(),
        },
    })
}

async fn handle_route_median(
    State(state): State<AppState>,
    Query(query): Query<RouteMedianQuery>,
) -> Json<RouteMedianResponse> {
    let stats = &state.model.route_stats;
    let route_median = match (
        City::from_label(&query.source_city),
        City::from_label(&query.destination_city),
    ) {
        (Some(source), Some(destination)) => stats.route_median(source, destination),
        _ => None,
    };
    Json(RouteMedianResponse {
        source_city: query.source_city,
        destination_city: query.destination_city,
        route_median,
        global_median: stats.global_median(),
    })
}

async fn handle_predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(rejection.status(), rejection.body_text())
    })?;
    let input = request.validate().map_err(ApiError::unprocessable)?;

    let result = state.model.predict(&input)?;
    debug!(
        "Prediction {:.2} for {} -> {}",
        result.predicted_price, request.source_city, request.destination_city
    );

    let entry = AuditEntry::new(&request, &result);
    let audit = Arc::clone(&state.audit);
    tokio::task::spawn_blocking(move || audit.record(&entry));

    Ok(Json(PredictResponse {
        predicted_price: result.predicted_price,
        lower_bound: result.lower_bound,
        upper_bound: result.upper_bound,
        top_contributors: result.top_contributors,
        assumptions_used: result.assumptions_used,
        echo: request,
    }))
}
