//! Disposable Redis for stream publishing tests

use redis::Client;
use redis::aio::{ConnectionManager, MultiplexedConnection};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

const IMAGE_TAG: &str = "8-alpine";

/// The container is stopped and removed when this is dropped.
///
/// ```no_run
/// use test_utils::TestRedis;
///
/// # async fn example() {
/// let redis = TestRedis::new().await;
/// let manager = redis.connection_manager().await;
/// // hand `manager` to a StreamProducer, then inspect with `stream_len`
/// assert_eq!(redis.stream_len("user-created_v1").await, 0);
/// # }
/// ```
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    client: Client,
    connection: MultiplexedConnection,
    pub connection_string: String,
}

impl TestRedis {
    pub async fn new() -> Self {
        let container = Redis::default()
            .with_tag(IMAGE_TAG)
            .start()
            .await
            .expect("Failed to start Redis container");

        let host_port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let connection_string = format!("redis://127.0.0.1:{host_port}");

        let client =
            Client::open(connection_string.clone()).expect("Failed to create Redis client");

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to connect to Redis");

        tracing::info!(port = host_port, "Test Redis ready");

        Self {
            _container: container,
            client,
            connection,
            connection_string,
        }
    }

    /// Multiplexed connection for issuing commands in assertions
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Reconnecting manager, the type producers hold
    pub async fn connection_manager(&self) -> ConnectionManager {
        self.client
            .get_connection_manager()
            .await
            .expect("Failed to create Redis connection manager")
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// `XLEN` of `stream`; 0 when it does not exist yet
    pub async fn stream_len(&self, stream: &str) -> i64 {
        let mut conn = self.connection();
        redis::cmd("XLEN")
            .arg(stream)
            .query_async(&mut conn)
            .await
            .expect("XLEN failed")
    }
}
