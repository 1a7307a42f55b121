//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `TestDataBuilder`: Per-test user attributes that never collide (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `postgres` (default): Enables PostgreSQL test infrastructure
//! - `redis`: Enables Redis test infrastructure
//! - `all`: Enables all database test infrastructure
//!
//! # Usage
//!
//! ## PostgreSQL Testing
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("my_test");
//!
//!     let email = data.email("primary");
//!     let nickname = data.nickname("primary");
//! }
//! ```
//!
//! ## Redis Testing
//!
//! Add `features = ["redis"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["redis"] }
//! ```
//!
//! Then in your tests:
//!
//! ```rust,ignore
//! use test_utils::TestRedis;
//!
//! #[tokio::test]
//! async fn my_stream_test() {
//!     let redis = TestRedis::new().await;
//!     let manager = redis.connection_manager().await;
//!     let mut conn = redis.connection();
//!
//!     let len: i64 = redis::cmd("XLEN").arg("user-created_v1").query_async(&mut conn).await.unwrap();
//!     assert_eq!(len, 0);
//! }
//! ```

use uuid::Uuid;

// Conditionally compile database modules based on features
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "redis")]
mod redis;

// Re-export based on enabled features
#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Seeded source of user attributes.
///
/// Seeding from the test name keeps values stable across runs while keeping
/// tests that share a database clear of the unique email constraint.
pub struct TestDataBuilder {
    seed: u64,
}

/// ISO 3166-1 alpha-3 codes handed out by [`TestDataBuilder::country`]
const COUNTRIES: [&str; 4] = ["DEU", "FRA", "GBR", "USA"];

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let data = TestDataBuilder::from_test_name("test_create_user");
    /// assert_eq!(data.email("a"), TestDataBuilder::from_test_name("test_create_user").email("a"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Email unique to this test and `label`
    pub fn email(&self, label: &str) -> String {
        format!("{}.{:x}@example.com", label, self.seed)
    }

    /// Nickname unique to this test and `label`
    pub fn nickname(&self, label: &str) -> String {
        format!("{}-{:x}", label, self.seed)
    }

    /// A valid country code, rotating with `index`
    pub fn country(&self, index: usize) -> &'static str {
        COUNTRIES[index % COUNTRIES.len()]
    }

    /// An id no insert will ever be assigned: stores generate v4/v7 ids and
    /// this one has its version nibble cleared.
    pub fn unknown_id(&self) -> Uuid {
        let mut bytes = Uuid::from_u64_pair(self.seed, !self.seed).into_bytes();
        bytes[6] &= 0x0f;
        Uuid::from_bytes(bytes)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Unwrap `value`, naming `context` when it is missing
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
