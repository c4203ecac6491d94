//! Database access abstraction for the analytics store

use async_trait::async_trait;

use crate::domain::{
    District, EnrollmentSummary, MetricScope, ProficiencyRecord, SatRecord, School, State, Subject,
    Viewport,
};
use crate::error::Result;

pub mod postgres;

pub use postgres::PostgresStore;

/// Read-side access to the analytics tables
///
/// The dashboard is read-only; ingestion happens out of band. Every method
/// converts the raw database failure into a [`crate::CoreError`] at this
/// boundary.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// List all states with map coordinates
    async fn list_states(&self) -> Result<Vec<State>>;

    /// List districts of a state, optionally restricted to a map viewport
    async fn list_districts(
        &self,
        state_code: &str,
        viewport: Option<Viewport>,
    ) -> Result<Vec<District>>;

    /// Fetch one district by its URL slug
    async fn district_by_slug(&self, slug: &str) -> Result<Option<District>>;

    /// List schools belonging to a district
    async fn list_schools(&self, district_nces_id: &str) -> Result<Vec<School>>;

    /// Fetch one school by its URL slug
    async fn school_by_slug(&self, slug: &str) -> Result<Option<School>>;

    /// Proficiency series for an entity, optionally filtered by subject and year
    async fn proficiency_series(
        &self,
        scope: MetricScope,
        entity_id: &str,
        subject: Option<Subject>,
        school_year: Option<i32>,
    ) -> Result<Vec<ProficiencyRecord>>;

    /// SAT series for an entity, optionally filtered by year
    async fn sat_series(
        &self,
        scope: MetricScope,
        entity_id: &str,
        school_year: Option<i32>,
    ) -> Result<Vec<SatRecord>>;

    /// Enrollment rollups per state
    async fn enrollment_summary(&self) -> Result<Vec<EnrollmentSummary>>;
}

/// Maintenance operations on the database's schemas
#[async_trait]
pub trait SchemaAdmin: Send + Sync {
    /// List droppable (non-system) schemas
    async fn list_schemas(&self) -> Result<Vec<String>>;

    /// Check whether a schema exists
    async fn schema_exists(&self, name: &str) -> Result<bool>;

    /// Drop a schema and everything in it
    async fn drop_schema(&self, name: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub TestAdmin {}

        #[async_trait]
        impl SchemaAdmin for TestAdmin {
            async fn list_schemas(&self) -> Result<Vec<String>>;
            async fn schema_exists(&self, name: &str) -> Result<bool>;
            async fn drop_schema(&self, name: &str) -> Result<()>;
        }
    }

    #[tokio::test]
    async fn test_mock_schema_admin() {
        let mut mock = MockTestAdmin::new();
        mock.expect_schema_exists()
            .with(mockall::predicate::eq("analytics"))
            .returning(|_| Ok(true));

        let result = mock.schema_exists("analytics").await;
        assert!(result.unwrap());
    }
}
