//! Health reporting for `grpc.health.v1.Health`
//!
//! The service is reported as serving only while both stores answer.

use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;
use rpc::users::v1::user_service_server::SERVICE_NAME;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;
use tracing::{info, warn};

pub const CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Connections checked on every tick
#[derive(Clone)]
pub struct HealthChecks {
    db: DatabaseConnection,
    redis: ConnectionManager,
}

impl HealthChecks {
    pub fn new(db: DatabaseConnection, redis: ConnectionManager) -> Self {
        Self { db, redis }
    }

    pub async fn status(&self) -> ServingStatus {
        let (db, redis) = tokio::join!(
            database::postgres::check_health(&self.db),
            database::redis::check_health(&self.redis)
        );

        if let Err(e) = &db {
            warn!(error = %e, "PostgreSQL check failed");
        }
        if let Err(e) = &redis {
            warn!(error = %e, "Redis check failed");
        }

        if db.is_ok() && redis.is_ok() {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        }
    }
}

/// Report `status` for the user service and for the empty name k8s checks use.
pub async fn report(reporter: &HealthReporter, status: ServingStatus) {
    for name in [SERVICE_NAME, ""] {
        reporter.set_service_status(name, status).await;
    }
}

/// Re-check every `interval` and report changes; runs until cancelled.
pub async fn watch<F, Fut>(reporter: HealthReporter, interval: Duration, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ServingStatus>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut current = ServingStatus::Serving;

    loop {
        ticker.tick().await;
        let status = check().await;
        if status != current {
            info!(?status, "Health status changed");
            report(&reporter, status).await;
            current = status;
        }
    }
}
