//! Users Domain
//!
//! Domain layer of the user service: the user model and its update field
//! mask, persistence behind [`UserRepository`], event publication behind
//! [`EventPublisher`], and the [`UserService`] rules tying them together.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ UserService │  ← default page size, fetch-before-delete, best-effort events
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼───┐ ┌─▼──────────────┐
//! │ Repo │ │ EventPublisher │  ← Postgres / in-memory, Redis Streams / in-memory
//! └──────┘ └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{InMemoryEventPublisher, InMemoryUserRepository, User, UserService};
//!
//! # async fn example() -> domain_users::UserResult<()> {
//! let service = UserService::new(InMemoryUserRepository::new(), InMemoryEventPublisher::new());
//!
//! let mut user = User::new("Ada", "Lovelace", "ada", "s3cret", "ada@example.com", "GBR");
//! service.create_user(&mut user).await?;
//! assert!(!user.id.is_nil());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use events::{
    EventPublisher, InMemoryEventPublisher, PublishError, PublishReceipt, StreamEventPublisher,
    UserCreatedTopic, UserDeletedTopic, UserEvent, UserUpdatedTopic,
};
pub use models::{FieldMask, User, UserField, UserFilter};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{DEFAULT_LIMIT, UserService};
