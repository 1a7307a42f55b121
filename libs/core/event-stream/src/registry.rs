//! Stream definitions and entry field names.

use strum::{AsRefStr, Display};

/// Field names written into every stream entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKey {
    /// JSON-encoded event payload.
    Event,
    /// Discriminator naming the kind of event.
    EventType,
    /// RFC 3339 time the producer appended the entry.
    PublishedAt,
}

/// Static description of a topic.
///
/// ```rust,ignore
/// pub struct UserCreatedTopic;
///
/// impl StreamDef for UserCreatedTopic {
///     const STREAM_NAME: &'static str = "user-created_v1";
/// }
/// ```
pub trait StreamDef: Send + Sync {
    /// The Redis stream key.
    const STREAM_NAME: &'static str;

    fn stream_name() -> &'static str {
        Self::STREAM_NAME
    }
}
