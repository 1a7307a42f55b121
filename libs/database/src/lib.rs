//! Connection helpers for the stores behind the user service
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL pool, migrations and health check via SeaORM
//! - `redis` (default) - Redis `ConnectionManager` and health check
//! - `config` - `core_config::FromEnv` for `PostgresConfig`
//! - `all` - All of the above
//!
//! # Examples
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "zerg_users").await?;
//!
//! let events = database::redis::connect_with_retry("redis://127.0.0.1:6379", None).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
