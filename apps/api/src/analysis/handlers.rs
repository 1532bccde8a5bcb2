//! Axum route handlers for the Analysis API.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::dimension_map::DimensionMap;
use crate::analysis::impact::{summarize, AnalysisSummary};
use crate::analysis::normalizer::{
    calculate_overall_score, extract_numeric_scores, normalize_all, DimensionScore, RawDimension,
};
use crate::analysis::session::{DimensionEvent, EventOutcome, SessionProgress};
use crate::analysis::weights::DimensionWeights;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub dimensions: DimensionMap<RawDimension>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub dimensions: DimensionMap<DimensionScore>,
    pub scores: DimensionMap<f64>,
    pub overall_score: i64,
}

#[derive(Debug, Deserialize)]
pub struct ImpactRequest {
    #[serde(default)]
    pub dimensions: DimensionMap<RawDimension>,
    /// Overrides the standard weighting table for this request only.
    pub weights: Option<HashMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub occupation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetailResponse {
    pub session_id: Uuid,
    pub occupation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub progress: SessionProgress,
    pub summary: AnalysisSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/normalize
///
/// Normalizes a full set of dimension results without ranking them.
pub async fn handle_normalize(
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let dimensions = &request.dimensions;
    Ok(Json(NormalizeResponse {
        dimensions: normalize_all(dimensions),
        scores: extract_numeric_scores(dimensions),
        overall_score: calculate_overall_score(dimensions),
    }))
}

/// POST /api/v1/analysis/impact
///
/// Scores a full set of dimension results and ranks improvement opportunities.
pub async fn handle_impact(
    State(state): State<AppState>,
    Json(request): Json<ImpactRequest>,
) -> Result<Json<AnalysisSummary>, AppError> {
    let custom = request
        .weights
        .map(DimensionWeights::from_entries)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let weights = custom.as_ref().unwrap_or(state.weights.as_ref());

    Ok(Json(summarize(
        &request.dimensions,
        weights,
        state.config.quick_win_limit,
    )))
}

/// POST /api/v1/analysis/sessions
///
/// Opens a session that accumulates dimension results as the backend streams them.
pub async fn handle_create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    // An absent body opens an unnamed session; a present one must be valid JSON.
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid session request: {e}")))?
    };
    let occupation = request
        .occupation
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    let session = state.sessions.create(occupation).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    ))
}

/// POST /api/v1/analysis/sessions/:id/events
///
/// Applies one dimension-completion event. Re-sending a dimension replaces it.
pub async fn handle_apply_event(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(event): Json<DimensionEvent>,
) -> Result<Json<EventOutcome>, AppError> {
    if event.dimension.trim().is_empty() {
        return Err(AppError::Validation(
            "dimension cannot be empty".to_string(),
        ));
    }

    let outcome = state.sessions.apply_event(session_id, event).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/analysis/sessions/:id
///
/// Scores the session's current snapshot, complete or not.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let summary = summarize(
        &session.snapshot(),
        &state.weights,
        state.config.quick_win_limit,
    );

    Ok(Json(SessionDetailResponse {
        session_id: session.id,
        progress: session.progress(),
        occupation: session.occupation,
        created_at: session.created_at,
        updated_at: session.updated_at,
        summary,
    }))
}

/// DELETE /api/v1/analysis/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
