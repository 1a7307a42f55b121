//! Users gRPC Service
//!
//! A microservice for managing users via gRPC, publishing an event to Redis
//! Streams after every successful mutation.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   ↓ (gRPC with Zstd compression)
//! UsersServiceImpl (service.rs)
//!   ↓ (request validation, proto ↔ domain conversions, error → status mapping)
//! UserService (domain layer)
//!   ↓                      ↓
//! PgUserRepository    StreamEventPublisher
//!   ↓                      ↓
//! PostgreSQL          Redis Streams
//! ```
//!
//! ## Modules
//!
//! - `server`: Server initialization and lifecycle
//! - `service`: gRPC service implementation (UsersServiceImpl)
//! - `validation`: Request shape checks
//! - `conversions`: Proto ↔ domain mapping
//! - `health`: Store checks driving `grpc.health.v1`

pub mod conversions;
pub mod health;
pub mod server;
pub mod service;
pub mod validation;

// Re-export for convenience
pub use server::{run, serve};
pub use service::UsersServiceImpl;
