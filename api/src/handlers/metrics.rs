//! Proficiency, SAT, and enrollment handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use braindiff_core::domain::{
    EnrollmentSummary, MetricScope, ProficiencyRecord, SatRecord, Subject,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Proficiency query parameters
#[derive(Debug, Deserialize)]
pub struct ProficiencyQuery {
    pub scope: MetricScope,
    pub entity_id: String,
    pub subject: Option<Subject>,
    pub year: Option<i32>,
}

/// SAT query parameters
#[derive(Debug, Deserialize)]
pub struct SatQuery {
    pub scope: MetricScope,
    pub entity_id: String,
    pub year: Option<i32>,
}

/// Proficiency series for a state, district, or school
pub async fn get_proficiency(
    State(state): State<AppState>,
    Query(query): Query<ProficiencyQuery>,
) -> ApiResult<Json<Vec<ProficiencyRecord>>> {
    let records = state
        .store
        .proficiency_series(query.scope, &query.entity_id, query.subject, query.year)
        .await?;

    Ok(Json(records))
}

/// SAT series for a state or district
///
/// SAT results are not collected per school, so school scope is rejected.
pub async fn get_sat(
    State(state): State<AppState>,
    Query(query): Query<SatQuery>,
) -> ApiResult<Json<Vec<SatRecord>>> {
    if query.scope == MetricScope::School {
        return Err(ApiError::Validation(
            "SAT results are reported at state or district scope".to_string(),
        ));
    }

    let records = state
        .store
        .sat_series(query.scope, &query.entity_id, query.year)
        .await?;

    Ok(Json(records))
}

/// Enrollment rollups per state
pub async fn get_enrollment(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EnrollmentSummary>>> {
    Ok(Json(state.store.enrollment_summary().await?))
}
