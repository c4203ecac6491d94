//! CLI configuration

use anyhow::{Context, Result};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Analytics database URL
    pub database_url: String,
}

impl CliConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is required")?,
        })
    }
}
