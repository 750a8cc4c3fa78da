//! # Fanout
//!
//! A pull-based, multi-consumer event queue for single-threaded tick loops.
//!
//! ## Core Concepts
//!
//! - **Queue**: A shared append-only buffer; one producer-facing `push`
//! - **Cursors**: Per-subscriber read positions, each consuming at its own pace
//! - **Compaction**: The buffer is trimmed down to the slowest cursor
//! - **Late subscription**: A cursor only observes events pushed after it
//!
//! ## Example
//!
//! ```
//! use fanout::EventQueue;
//!
//! let queue = EventQueue::new();
//!
//! // Nobody is listening yet, so this event is dropped.
//! queue.push("boot");
//! assert_eq!(queue.len(), 0);
//!
//! let cursor = queue.subscribe();
//!
//! queue.push("tick");
//! queue.push("tock");
//!
//! assert_eq!(queue.next(&cursor), Some("tick"));
//!
//! for event in queue.read(&cursor) {
//!     assert_eq!(event, "tock");
//! }
//!
//! assert_eq!(queue.next(&cursor), None);
//! ```

pub mod cursor;
pub mod drain;
pub mod queue;

// Re-exports
pub use cursor::{Cursor, CursorId};
pub use drain::Drain;
pub use queue::{EventQueue, QueueStats};
