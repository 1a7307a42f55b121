//! Redis connection used by the event publisher

mod connector;
mod health;

pub use connector::{connect, connect_with_retry};
pub use health::check_health;

// Re-export redis types for convenience
pub use redis::aio::ConnectionManager;
pub use redis::{Client, RedisResult};
