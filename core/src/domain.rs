//! Domain models for the Braindiff analytics service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Academic subject covered by proficiency assessments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subject", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Math,
    Reading,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Reading => "reading",
        }
    }
}

/// School level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "school_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SchoolLevel {
    Elementary,
    Middle,
    High,
    Other,
}

/// Scope a metric row is aggregated at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "metric_scope", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetricScope {
    State,
    District,
    School,
}

impl MetricScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricScope::State => "state",
            MetricScope::District => "district",
            MetricScope::School => "school",
        }
    }
}

/// A US state as shown on the dashboard map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// Two-letter USPS code
    pub code: String,
    pub name: String,
    /// Geographic center used for map focus
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

/// A school district
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    /// Seven-digit NCES district identifier
    pub nces_id: String,
    pub state_code: String,
    pub name: String,
    /// Human-friendly URL slug
    pub slug: String,
    pub enrollment: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

/// A single school
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    /// Twelve-digit NCES school identifier
    pub nces_id: String,
    pub district_nces_id: String,
    pub name: String,
    /// Human-friendly URL slug
    pub slug: String,
    pub level: SchoolLevel,
    pub enrollment: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

/// Proficiency assessment result for one scope, subject, and school year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProficiencyRecord {
    pub scope: MetricScope,
    /// State code, district NCES id, or school NCES id depending on scope
    pub entity_id: String,
    pub subject: Subject,
    /// Year the school year ends in, e.g. 2024 for 2023-24
    pub school_year: i32,
    /// Share of tested students at or above proficient, 0..=1
    pub proficient_share: f64,
    pub tested_count: i64,
}

/// SAT performance for one scope and school year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatRecord {
    pub scope: MetricScope,
    pub entity_id: String,
    pub school_year: i32,
    /// Share of eligible students who took the test, 0..=1
    pub participation_rate: f64,
    /// Mean evidence-based reading and writing score, 200..=800
    pub mean_erw: i32,
    /// Mean math section score, 200..=800
    pub mean_math: i32,
}

/// Per-state enrollment rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    pub state_code: String,
    pub district_count: i64,
    pub school_count: i64,
    pub total_enrollment: i64,
}

/// Map viewport bounding box for geographic filtering
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Viewport {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Viewport {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Generate a URL slug from an entity name
pub fn entity_slug(name: &str) -> String {
    slug::slugify(name)
}
