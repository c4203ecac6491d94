//! API handlers

pub mod geo;
pub mod metrics;

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use braindiff_core::domain::{
        District, EnrollmentSummary, MetricScope, ProficiencyRecord, SatRecord, School, State,
        Subject, Viewport,
    };
    use braindiff_core::{adapter::AnalyticsStore, Result};
    use mockall::mock;

    use crate::config::AppConfig;

    mock! {
        pub Store {}

        #[async_trait]
        impl AnalyticsStore for Store {
            async fn list_states(&self) -> Result<Vec<State>>;
            async fn list_districts(
                &self,
                state_code: &str,
                viewport: Option<Viewport>,
            ) -> Result<Vec<District>>;
            async fn district_by_slug(&self, slug: &str) -> Result<Option<District>>;
            async fn list_schools(&self, district_nces_id: &str) -> Result<Vec<School>>;
            async fn school_by_slug(&self, slug: &str) -> Result<Option<School>>;
            async fn proficiency_series(
                &self,
                scope: MetricScope,
                entity_id: &str,
                subject: Option<Subject>,
                school_year: Option<i32>,
            ) -> Result<Vec<ProficiencyRecord>>;
            async fn sat_series(
                &self,
                scope: MetricScope,
                entity_id: &str,
                school_year: Option<i32>,
            ) -> Result<Vec<SatRecord>>;
            async fn enrollment_summary(&self) -> Result<Vec<EnrollmentSummary>>;
        }
    }

    pub fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "postgres://localhost/braindiff_test".to_string(),
            cors_origin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await;
        assert_eq!(response.status, "ok");
    }
}
