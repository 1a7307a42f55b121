//! gRPC server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Postgres connection and migrations
//! - Redis connection for event publishing
//! - Service wiring
//! - Health check service (grpc.health.v1.Health)
//! - Graceful shutdown on SIGINT/SIGTERM

use core_config::{Environment, EventStreamConfig, FromEnv, GrpcServerConfig};
use database::postgres::{self, PostgresConfig};
use domain_users::{EventPublisher, PgUserRepository, StreamEventPublisher, UserRepository, UserService};
use event_stream::StreamProducer;
use eyre::{Result, WrapErr};
use migration::Migrator;
use rpc::users::v1::user_service_server::UserServiceServer;
use std::future::Future;
use std::net::SocketAddr;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tonic_health::server::health_reporter;
use tracing::{error, info};

use crate::health::{self, HealthChecks, CHECK_INTERVAL};
use crate::service::UsersServiceImpl;

const APP_NAME: &str = "zerg_users";

/// Run the gRPC server
///
/// 1. Sets up structured logging (JSON for prod, pretty for dev)
/// 2. Connects to Postgres with retry and applies migrations
/// 3. Connects to Redis for the event publisher
/// 4. Serves until SIGINT/SIGTERM
///
/// # Errors
///
/// Returns an error if configuration is invalid, a store is unreachable
/// after retrying, migrations fail, or the server cannot bind.
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let db_config = PostgresConfig::from_env().wrap_err("Failed to load database configuration")?;
    let stream_config =
        EventStreamConfig::from_env().wrap_err("Failed to load event stream configuration")?;
    let grpc_config = GrpcServerConfig::from_env().wrap_err("Failed to load gRPC configuration")?;
    let addr = grpc_config
        .socket_addr()
        .wrap_err_with(|| format!("Failed to parse server address: {}", grpc_config.address()))?;

    info!("Connecting to database...");
    let migrate = db_config.run_migrations;
    let db = postgres::connect_from_config_with_retry(db_config, None)
        .await
        .wrap_err("Failed to connect to database")?;
    if migrate {
        postgres::run_migrations::<Migrator>(&db, APP_NAME)
            .await
            .wrap_err("Failed to run migrations")?;
    }

    info!("Connecting to Redis...");
    let redis = database::redis::connect_with_retry(&stream_config.uri, None)
        .await
        .wrap_err("Failed to connect to Redis")?;
    let producer = StreamProducer::new(redis.clone()).with_max_length(stream_config.max_length);

    let service = UserService::new(
        PgUserRepository::new(db.clone()),
        StreamEventPublisher::new(producer),
    );

    serve(
        addr,
        UsersServiceImpl::new(service),
        Some(HealthChecks::new(db, redis)),
        shutdown_signal(),
    )
    .await
}

/// Serve `users` plus the health service on `addr` until `shutdown` resolves.
///
/// Without `checks` the service is reported as serving for its whole lifetime.
pub async fn serve<R, P, S>(
    addr: SocketAddr,
    users: UsersServiceImpl<R, P>,
    checks: Option<HealthChecks>,
    shutdown: S,
) -> Result<()>
where
    R: UserRepository + 'static,
    P: EventPublisher + 'static,
    S: Future<Output = ()> + Send,
{
    let (reporter, health_service) = health_reporter();
    health::report(&reporter, ServingStatus::Serving).await;

    let watcher = checks.map(|checks| {
        tokio::spawn(health::watch(reporter.clone(), CHECK_INTERVAL, move || {
            let checks = checks.clone();
            async move { checks.status().await }
        }))
    });

    info!(%addr, "UserService listening (zstd compression, grpc.health.v1 enabled)");

    let result = Server::builder()
        .add_service(health_service)
        .add_service(
            UserServiceServer::new(users)
                .accept_compressed(CompressionEncoding::Zstd)
                .send_compressed(CompressionEncoding::Zstd),
        )
        .serve_with_shutdown(addr, shutdown)
        .await
        .wrap_err("gRPC server failed");

    if let Some(watcher) = watcher {
        watcher.abort();
    }
    info!("UserService stopped");
    result
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM signal, shutting down gracefully"),
    }
}
