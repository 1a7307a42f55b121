use crate::{ConfigError, FromEnv, env_parse, env_required};

/// Default approximate cap on entries kept per event stream
pub const DEFAULT_MAX_LENGTH: i64 = 100_000;

/// Redis Streams connection used for publishing domain events
#[derive(Clone, Debug)]
pub struct EventStreamConfig {
    pub uri: String,
    /// Passed to `XADD MAXLEN ~`
    pub max_length: i64,
}

impl EventStreamConfig {
    pub fn new(uri: String) -> Self {
        Self {
            uri,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl FromEnv for EventStreamConfig {
    /// Requires REDIS_URL to be set (no default).
    /// EVENT_STREAM_MAX_LENGTH defaults to 100000.
    fn from_env() -> Result<Self, ConfigError> {
        let uri = env_required("REDIS_URL")?;
        let max_length = env_parse("EVENT_STREAM_MAX_LENGTH", &DEFAULT_MAX_LENGTH.to_string())?;

        if max_length <= 0 {
            return Err(ConfigError::ParseError {
                key: "EVENT_STREAM_MAX_LENGTH".to_string(),
                details: format!("must be positive, got {max_length}"),
            });
        }

        Ok(Self { uri, max_length })
    }
}
