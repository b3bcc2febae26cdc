//! RPC request handlers.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use safereg_assessor::{Assessor, ReportPage, SubmissionPlan, SubmissionRequest};
use safereg_types::{Address, Assessment, Degradation, PrivacyReport, Report, Timestamp, Verdict};
use serde::Serialize;
use std::sync::Arc;

use crate::error::RpcError;
use crate::pagination::PaginationParams;

pub type AppState = Arc<Assessor>;

// ── Assessment ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckResponse {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub verdict: Verdict,
    pub cached: bool,
}

pub async fn check_address(
    State(assessor): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CheckResponse>, RpcError> {
    let result = assessor.check(&address).await?;
    Ok(Json(CheckResponse {
        verdict: result.assessment.verdict(),
        assessment: result.assessment,
        cached: result.cached,
    }))
}

// ── Privacy ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PrivacyResponse {
    pub address: Address,
    #[serde(flatten)]
    pub report: PrivacyReport,
    /// Set when chain observations failed and defaults were returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Degradation>,
}

pub async fn privacy_analysis(
    State(assessor): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<PrivacyResponse>, RpcError> {
    let parsed = Address::parse(&address).map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    let result = assessor.privacy(&address).await?;
    let degraded = result.reason().map(|reason| Degradation::PrivacyFallback {
        reason: reason.to_string(),
    });
    Ok(Json(PrivacyResponse {
        address: parsed,
        report: result.into_value(),
        degraded,
    }))
}

// ── Reports ──────────────────────────────────────────────────────────────

pub async fn recent_reports(
    State(assessor): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ReportPage>, RpcError> {
    let page = assessor
        .recent_reports(params.limit, params.offset())
        .await?;
    Ok(Json(page))
}

pub async fn report_by_id(
    State(assessor): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Report>, RpcError> {
    Ok(Json(assessor.report(id).await?))
}

pub async fn prepare_submission(
    State(assessor): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Json<SubmissionPlan>, RpcError> {
    Ok(Json(assessor.prepare_submission(&request)?))
}

// ── Service ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: Timestamp,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Timestamp::now(),
    })
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<Address>,
    pub endpoints: Vec<&'static str>,
}

pub async fn info(State(assessor): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "safereg",
        version: env!("CARGO_PKG_VERSION"),
        registry: assessor.registry_address(),
        endpoints: vec![
            "GET /api/check/:address",
            "GET /api/privacy/:address",
            "GET /api/reports?limit=&offset=",
            "GET /api/reports/:id",
            "POST /api/reports",
            "GET /health",
            "GET /metrics",
        ],
    })
}

pub async fn metrics(State(assessor): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        assessor.metrics().encode(),
    )
}
