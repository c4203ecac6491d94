//! State, district, and school handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use braindiff_core::domain::{District, School, State as UsState, Viewport};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Map viewport query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ViewportQuery {
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
}

impl ViewportQuery {
    /// Resolve into a viewport: either all four bounds are given or none
    pub fn into_viewport(self) -> ApiResult<Option<Viewport>> {
        match (self.min_lat, self.max_lat, self.min_lon, self.max_lon) {
            (None, None, None, None) => Ok(None),
            (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => {
                if min_lat > max_lat || min_lon > max_lon {
                    return Err(ApiError::Validation(
                        "viewport bounds are inverted".to_string(),
                    ));
                }
                Ok(Some(Viewport {
                    min_lat,
                    max_lat,
                    min_lon,
                    max_lon,
                }))
            }
            _ => Err(ApiError::BadRequest(
                "viewport requires all four bounds".to_string(),
            )),
        }
    }
}

/// List all states
pub async fn list_states(State(state): State<AppState>) -> ApiResult<Json<Vec<UsState>>> {
    Ok(Json(state.store.list_states().await?))
}

/// List districts of a state, optionally restricted to the visible map area
pub async fn list_districts(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ViewportQuery>,
) -> ApiResult<Json<Vec<District>>> {
    let viewport = query.into_viewport()?;
    let code = code.to_ascii_uppercase();

    let districts = state.store.list_districts(&code, viewport).await?;
    Ok(Json(districts))
}

/// Get one district by slug
pub async fn get_district(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<District>> {
    match state.store.district_by_slug(&slug).await? {
        Some(district) => Ok(Json(district)),
        None => Err(ApiError::NotFound(format!("District {} not found", slug))),
    }
}

/// List schools of a district identified by slug
pub async fn list_district_schools(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Vec<School>>> {
    let district = match state.store.district_by_slug(&slug).await? {
        Some(district) => district,
        None => return Err(ApiError::NotFound(format!("District {} not found", slug))),
    };

    let schools = state.store.list_schools(&district.nces_id).await?;
    Ok(Json(schools))
}

/// Get one school by slug
pub async fn get_school(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<School>> {
    match state.store.school_by_slug(&slug).await? {
        Some(school) => Ok(Json(school)),
        None => Err(ApiError::NotFound(format!("School {} not found", slug))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::handlers::test_support::{test_config, MockStore};

    fn sample_district() -> District {
        District {
            nces_id: "0803360".to_string(),
            state_code: "CO".to_string(),
            name: "Denver Public Schools".to_string(),
            slug: "denver-public-schools".to_string(),
            enrollment: 88_000,
            latitude: 39.74,
            longitude: -104.99,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_viewport_empty() {
        let query = ViewportQuery::default();
        assert!(query.into_viewport().unwrap().is_none());
    }

    #[test]
    fn test_into_viewport_complete() {
        let query = ViewportQuery {
            min_lat: Some(38.0),
            max_lat: Some(40.0),
            min_lon: Some(-106.0),
            max_lon: Some(-104.0),
        };
        let viewport = query.into_viewport().unwrap().unwrap();
        assert!(viewport.contains(39.0, -105.0));
    }

    #[test]
    fn test_into_viewport_partial_is_rejected() {
        let query = ViewportQuery {
            min_lat: Some(38.0),
            ..Default::default()
        };
        assert!(matches!(
            query.into_viewport(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_into_viewport_inverted_is_rejected() {
        let query = ViewportQuery {
            min_lat: Some(40.0),
            max_lat: Some(38.0),
            min_lon: Some(-106.0),
            max_lon: Some(-104.0),
        };
        assert!(matches!(
            query.into_viewport(),
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_districts_uppercases_state_code() {
        let mut mock = MockStore::new();
        mock.expect_list_districts()
            .with(eq("CO"), eq(None))
            .returning(|_, _| Ok(vec![]));

        let state = AppState::with_store(Arc::new(mock), test_config());
        let response = list_districts(
            State(state),
            Path("co".to_string()),
            Query(ViewportQuery::default()),
        )
        .await;

        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_get_district_missing_is_not_found() {
        let mut mock = MockStore::new();
        mock.expect_district_by_slug()
            .with(eq("nowhere"))
            .returning(|_| Ok(None));

        let state = AppState::with_store(Arc::new(mock), test_config());
        let result = get_district(State(state), Path("nowhere".to_string())).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_district_schools_resolves_slug_first() {
        let mut mock = MockStore::new();
        mock.expect_district_by_slug()
            .with(eq("denver-public-schools"))
            .returning(|_| Ok(Some(sample_district())));
        mock.expect_list_schools()
            .with(eq("0803360"))
            .returning(|_| Ok(vec![]));

        let state = AppState::with_store(Arc::new(mock), test_config());
        let result =
            list_district_schools(State(state), Path("denver-public-schools".to_string())).await;

        assert!(result.is_ok());
    }
}
