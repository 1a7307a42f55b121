//! Redis Streams producer for domain events.
//!
//! Each topic is a Redis stream. Publishing an event appends one entry with
//! `XADD <topic> MAXLEN ~ <n> * event <json> event_type <type> published_at <rfc3339>`;
//! the returned entry id is the event's position in the topic.
//!
//! ```rust,ignore
//! use event_stream::{StreamDef, StreamProducer};
//!
//! struct OrderPlaced;
//!
//! impl StreamDef for OrderPlaced {
//!     const STREAM_NAME: &'static str = "order-placed_v1";
//! }
//!
//! let producer = StreamProducer::new(redis);
//! let entry_id = producer
//!     .send(OrderPlaced::STREAM_NAME, "order_placed", &event)
//!     .await?;
//! ```

mod error;
mod producer;
mod registry;

pub use error::StreamError;
pub use producer::StreamProducer;
pub use registry::{MessageKey, StreamDef};
