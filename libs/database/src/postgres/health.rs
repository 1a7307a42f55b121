use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` and report how long the round trip took
pub async fn check_health(db: &DatabaseConnection) -> Result<Duration, DatabaseError> {
    let start = Instant::now();

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await?
        .ok_or_else(|| DatabaseError::HealthCheckFailed("SELECT 1 returned no row".into()))?;

    let elapsed = start.elapsed();
    debug!(elapsed_ms = elapsed.as_millis() as u64, "PostgreSQL health check passed");
    Ok(elapsed)
}
