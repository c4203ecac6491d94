//! PostgreSQL analytics store implementation

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::{info, warn};

use crate::adapter::{AnalyticsStore, SchemaAdmin};
use crate::domain::{
    District, EnrollmentSummary, MetricScope, ProficiencyRecord, SatRecord, School, State, Subject,
    Viewport,
};
use crate::error::{CoreError, Result};
use crate::outcome::Outcome;

/// Schemas that must never be dropped
const SYSTEM_SCHEMAS: [&str; 2] = ["pg_catalog", "information_schema"];

/// Postgres maximum identifier length
const MAX_IDENTIFIER_LEN: usize = 63;

/// PostgreSQL-backed store for analytics reads and schema maintenance
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and build a store
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = Outcome::of(PgPool::connect(database_url))
            .await
            .context("connecting to database")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Check a schema name against Postgres identifier rules
///
/// Names are spliced into DDL statements, so anything outside the
/// unquoted-identifier alphabet is rejected up front.
pub fn validate_schema_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
        return Err(CoreError::InvalidSchemaName(name.to_string()));
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_lowercase() && first != '_' {
        return Err(CoreError::InvalidSchemaName(name.to_string()));
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(CoreError::InvalidSchemaName(name.to_string()));
    }

    Ok(())
}

/// Whether a schema belongs to Postgres itself
pub fn is_system_schema(name: &str) -> bool {
    SYSTEM_SCHEMAS.contains(&name) || name.starts_with("pg_")
}

fn district_from_row(row: &sqlx::postgres::PgRow) -> District {
    District {
        nces_id: row.get("nces_id"),
        state_code: row.get("state_code"),
        name: row.get("name"),
        slug: row.get("slug"),
        enrollment: row.get("enrollment"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        updated_at: row.get("updated_at"),
    }
}

fn school_from_row(row: &sqlx::postgres::PgRow) -> School {
    School {
        nces_id: row.get("nces_id"),
        district_nces_id: row.get("district_nces_id"),
        name: row.get("name"),
        slug: row.get("slug"),
        level: row.get("level"),
        enrollment: row.get("enrollment"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl AnalyticsStore for PostgresStore {
    async fn list_states(&self) -> Result<Vec<State>> {
        let query = r#"
            SELECT code, name, latitude, longitude, updated_at
            FROM states
            ORDER BY name
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| State {
                code: row.get("code"),
                name: row.get("name"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }

    async fn list_districts(
        &self,
        state_code: &str,
        viewport: Option<Viewport>,
    ) -> Result<Vec<District>> {
        let rows = if let Some(viewport) = viewport {
            let query = r#"
                SELECT nces_id, state_code, name, slug, enrollment,
                       latitude, longitude, updated_at
                FROM districts
                WHERE state_code = $1
                    AND latitude BETWEEN $2 AND $3
                    AND longitude BETWEEN $4 AND $5
                ORDER BY name
            "#;
            sqlx::query(query)
                .bind(state_code)
                .bind(viewport.min_lat)
                .bind(viewport.max_lat)
                .bind(viewport.min_lon)
                .bind(viewport.max_lon)
                .fetch_all(&self.pool)
                .await?
        } else {
            let query = r#"
                SELECT nces_id, state_code, name, slug, enrollment,
                       latitude, longitude, updated_at
                FROM districts
                WHERE state_code = $1
                ORDER BY name
            "#;
            sqlx::query(query)
                .bind(state_code)
                .fetch_all(&self.pool)
                .await?
        };

        Ok(rows.iter().map(district_from_row).collect())
    }

    async fn district_by_slug(&self, slug: &str) -> Result<Option<District>> {
        let query = r#"
            SELECT nces_id, state_code, name, slug, enrollment,
                   latitude, longitude, updated_at
            FROM districts
            WHERE slug = $1
        "#;

        let row = sqlx::query(query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(district_from_row))
    }

    async fn list_schools(&self, district_nces_id: &str) -> Result<Vec<School>> {
        let query = r#"
            SELECT nces_id, district_nces_id, name, slug, level, enrollment,
                   latitude, longitude, updated_at
            FROM schools
            WHERE district_nces_id = $1
            ORDER BY name
        "#;

        let rows = sqlx::query(query)
            .bind(district_nces_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(school_from_row).collect())
    }

    async fn school_by_slug(&self, slug: &str) -> Result<Option<School>> {
        let query = r#"
            SELECT nces_id, district_nces_id, name, slug, level, enrollment,
                   latitude, longitude, updated_at
            FROM schools
            WHERE slug = $1
        "#;

        let row = sqlx::query(query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(school_from_row))
    }

    async fn proficiency_series(
        &self,
        scope: MetricScope,
        entity_id: &str,
        subject: Option<Subject>,
        school_year: Option<i32>,
    ) -> Result<Vec<ProficiencyRecord>> {
        let query = r#"
            SELECT scope, entity_id, subject, school_year,
                   proficient_share, tested_count
            FROM proficiency
            WHERE scope = $1
                AND entity_id = $2
                AND ($3::subject IS NULL OR subject = $3)
                AND ($4::int IS NULL OR school_year = $4)
            ORDER BY school_year, subject
        "#;

        let rows = Outcome::of(
            sqlx::query(query)
                .bind(scope)
                .bind(entity_id)
                .bind(subject)
                .bind(school_year)
                .fetch_all(&self.pool),
        )
        .await
        .context("loading proficiency series")?;

        Ok(rows
            .iter()
            .map(|row| ProficiencyRecord {
                scope: row.get("scope"),
                entity_id: row.get("entity_id"),
                subject: row.get("subject"),
                school_year: row.get("school_year"),
                proficient_share: row.get("proficient_share"),
                tested_count: row.get("tested_count"),
            })
            .collect())
    }

    async fn sat_series(
        &self,
        scope: MetricScope,
        entity_id: &str,
        school_year: Option<i32>,
    ) -> Result<Vec<SatRecord>> {
        let query = r#"
            SELECT scope, entity_id, school_year,
                   participation_rate, mean_erw, mean_math
            FROM sat_results
            WHERE scope = $1
                AND entity_id = $2
                AND ($3::int IS NULL OR school_year = $3)
            ORDER BY school_year
        "#;

        let rows = Outcome::of(
            sqlx::query(query)
                .bind(scope)
                .bind(entity_id)
                .bind(school_year)
                .fetch_all(&self.pool),
        )
        .await
        .context("loading SAT series")?;

        Ok(rows
            .iter()
            .map(|row| SatRecord {
                scope: row.get("scope"),
                entity_id: row.get("entity_id"),
                school_year: row.get("school_year"),
                participation_rate: row.get("participation_rate"),
                mean_erw: row.get("mean_erw"),
                mean_math: row.get("mean_math"),
            })
            .collect())
    }

    async fn enrollment_summary(&self) -> Result<Vec<EnrollmentSummary>> {
        let query = r#"
            SELECT d.state_code,
                   COUNT(DISTINCT d.nces_id) AS district_count,
                   COUNT(s.nces_id) AS school_count,
                   COALESCE(SUM(s.enrollment), 0)::bigint AS total_enrollment
            FROM districts d
            LEFT JOIN schools s ON s.district_nces_id = d.nces_id
            GROUP BY d.state_code
            ORDER BY d.state_code
        "#;

        let rows = Outcome::of(sqlx::query(query).fetch_all(&self.pool))
            .await
            .context("aggregating enrollment")?;

        Ok(rows
            .iter()
            .map(|row| EnrollmentSummary {
                state_code: row.get("state_code"),
                district_count: row.get("district_count"),
                school_count: row.get("school_count"),
                total_enrollment: row.get("total_enrollment"),
            })
            .collect())
    }
}

#[async_trait]
impl SchemaAdmin for PostgresStore {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT schema_name
            FROM information_schema.schemata
            WHERE schema_name NOT IN ('pg_catalog', 'information_schema')
                AND schema_name NOT LIKE 'pg_%'
            ORDER BY schema_name
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("schema_name")).collect())
    }

    async fn schema_exists(&self, name: &str) -> Result<bool> {
        let query =
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)";
        let row = sqlx::query(query).bind(name).fetch_one(&self.pool).await?;

        Ok(row.get::<bool, _>(0))
    }

    async fn drop_schema(&self, name: &str) -> Result<()> {
        validate_schema_name(name)?;
        if is_system_schema(name) {
            return Err(CoreError::Validation(format!(
                "refusing to drop system schema {}",
                name
            )));
        }

        if !self.schema_exists(name).await? {
            warn!("Schema {} does not exist, nothing to drop", name);
            return Err(CoreError::SchemaNotFound(name.to_string()));
        }

        let statement = format!("DROP SCHEMA \"{}\" CASCADE", name);
        Outcome::of(sqlx::query(&statement).execute(&self.pool))
            .await
            .context(format!("dropping schema {}", name))?;

        info!("Dropped schema {}", name);
        Ok(())
    }
}
