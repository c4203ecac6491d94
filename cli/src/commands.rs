//! Maintenance command logic

use tracing::{error, info, warn};

use braindiff_core::adapter::SchemaAdmin;
use braindiff_core::outcome::Outcome;
use braindiff_core::Result;

/// Drop command options
#[derive(Debug, Clone, Copy, Default)]
pub struct DropOptions {
    /// Allow dropping the public schema
    pub force: bool,
}

/// What happened to one requested schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropStatus {
    Dropped,
    /// Blank entry, never attempted
    Skipped,
    Failed,
}

/// Aggregated result of a drop run
#[derive(Debug, Default)]
pub struct DropReport {
    pub results: Vec<(String, DropStatus)>,
}

impl DropReport {
    fn record(&mut self, name: &str, status: DropStatus) {
        self.results.push((name.to_string(), status));
    }

    pub fn dropped(&self) -> usize {
        self.count(DropStatus::Dropped)
    }

    pub fn failed(&self) -> usize {
        self.count(DropStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(DropStatus::Skipped)
    }

    fn count(&self, status: DropStatus) -> usize {
        self.results.iter().filter(|(_, s)| *s == status).count()
    }

    /// Process status: 0 when every attempted drop succeeded
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 {
            1
        } else {
            0
        }
    }
}

/// Drop the named schemas one by one, aggregating per-schema status.
///
/// Blank names are skipped with a warning and never reach the database.
/// An empty target list is a no-op. Dropping `public` requires the force
/// option; system schemas are always refused by the store.
pub async fn drop_schemas<A: SchemaAdmin>(
    admin: &A,
    targets: &[String],
    options: DropOptions,
) -> DropReport {
    let mut report = DropReport::default();

    if targets.is_empty() {
        info!("No schemas requested, nothing to drop");
        return report;
    }

    for name in targets {
        let name = name.trim();

        if name.is_empty() {
            warn!("Skipping blank schema name");
            report.record(name, DropStatus::Skipped);
            continue;
        }

        if name == "public" && !options.force {
            error!("Refusing to drop schema public without --force");
            report.record(name, DropStatus::Failed);
            continue;
        }

        match Outcome::of(admin.drop_schema(name)).await {
            Outcome::Ok(()) => {
                info!("Schema {} dropped", name);
                report.record(name, DropStatus::Dropped);
            }
            Outcome::Err(e) => {
                error!("Failed to drop schema {}: {}", name, e);
                report.record(name, DropStatus::Failed);
            }
        }
    }

    info!(
        "Drop run finished: {} dropped, {} failed, {} skipped",
        report.dropped(),
        report.failed(),
        report.skipped()
    );

    report
}

/// Print the droppable schemas of the target database
pub async fn list_schemas<A: SchemaAdmin>(admin: &A) -> Result<()> {
    let schemas = admin.list_schemas().await?;

    if schemas.is_empty() {
        println!("(no schemas)");
        return Ok(());
    }

    for name in schemas {
        println!("{}", name);
    }

    Ok(())
}
