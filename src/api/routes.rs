use crate::api::infra::{deserialize_optional_date, AppState};
use crate::error::AppError;
use crate::screening::{
    AnalysisReport, DiagnosticEngine, PatientIntake, Recommendation, RuleMatch,
};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalysisResponse {
    pub(crate) patient: String,
    pub(crate) symptom_count: usize,
    pub(crate) matches: Vec<RuleMatch>,
    pub(crate) recommendation: Recommendation,
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportRequest {
    #[serde(flatten)]
    pub(crate) intake: PatientIntake,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) generated_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VocabularyQuery {
    #[serde(default)]
    pub(crate) q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct VocabularyResponse {
    pub(crate) entries: Vec<String>,
}

/// Router builder exposing the screening endpoints.
pub fn screening_router(engine: Arc<DiagnosticEngine>) -> Router {
    Router::new()
        .route("/api/v1/screening/analyze", post(analyze_endpoint))
        .route("/api/v1/screening/report", post(report_endpoint))
        .route(
            "/api/v1/screening/vocabulary/symptoms",
            get(symptom_vocabulary_endpoint),
        )
        .route(
            "/api/v1/screening/vocabulary/risk-factors",
            get(risk_factor_vocabulary_endpoint),
        )
        .with_state(engine)
}

pub(crate) fn with_service_routes(engine: Arc<DiagnosticEngine>) -> Router {
    screening_router(engine)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analyze_endpoint(
    State(engine): State<Arc<DiagnosticEngine>>,
    Json(intake): Json<PatientIntake>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let analysis = engine.analyze(intake)?;

    Ok(Json(AnalysisResponse {
        patient: analysis.patient.full_name(),
        symptom_count: analysis.patient.symptom_count,
        message: analysis.message().to_string(),
        recommendation: analysis.recommendation,
        matches: analysis.matches,
    }))
}

pub(crate) async fn report_endpoint(
    State(engine): State<Arc<DiagnosticEngine>>,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ReportRequest {
        intake,
        generated_on,
    } = request;

    let analysis = engine.analyze(intake)?;
    let generated_on = generated_on.unwrap_or_else(|| Local::now().date_naive());
    let report = AnalysisReport::new(&analysis, generated_on).render();

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report,
    ))
}

pub(crate) async fn symptom_vocabulary_endpoint(
    State(engine): State<Arc<DiagnosticEngine>>,
    Query(query): Query<VocabularyQuery>,
) -> Json<VocabularyResponse> {
    let entries = engine.knowledge().search_symptoms(&query.q);
    Json(VocabularyResponse {
        entries: entries.into_iter().map(str::to_string).collect(),
    })
}

pub(crate) async fn risk_factor_vocabulary_endpoint(
    State(engine): State<Arc<DiagnosticEngine>>,
    Query(query): Query<VocabularyQuery>,
) -> Json<VocabularyResponse> {
    let entries = engine.knowledge().search_risk_factors(&query.q);
    Json(VocabularyResponse {
        entries: entries.into_iter().map(str::to_string).collect(),
    })
}
