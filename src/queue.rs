//! Shared event buffer with per-cursor read positions.

use crate::cursor::{Cursor, CursorId};
use crate::drain::Drain;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Point-in-time counters for a queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueStats {
    /// Events accepted by `push` over the queue's lifetime (drops excluded).
    pub published: u64,
    /// Events currently held in the buffer.
    pub retained: usize,
    /// Events trimmed from the head over the queue's lifetime, by
    /// compaction or `clear`.
    pub reclaimed: u64,
    /// Live cursors.
    pub subscribers: usize,
}

/// Buffer and cursor table, guarded together by a single lock because
/// compaction touches both.
struct Inner<E> {
    /// Retained events; the front element sits at logical offset `base`.
    events: VecDeque<E>,

    /// Logical offset of the front of `events`. Monotonically increasing;
    /// never rewound, not even by `clear`.
    base: u64,

    /// Read position of every live cursor, as an absolute logical offset.
    /// Invariant: `base <= position <= base + events.len()`.
    cursors: HashMap<CursorId, u64>,

    /// Next cursor id to allocate.
    next_id: u64,
}

impl<E> Inner<E> {
    /// Logical offset one past the newest buffered event. Also the total
    /// number of events ever accepted, since `base` only ever advances past
    /// accepted events.
    fn head(&self) -> u64 {
        self.base + self.events.len() as u64
    }

    /// Minimum position across live cursors; the head when there are none,
    /// so that an unconsumable buffer is fully trimmable.
    fn watermark(&self) -> u64 {
        self.cursors.values().copied().min().unwrap_or_else(|| self.head())
    }

    /// Trim every event below the watermark. Returns the number removed.
    fn shrink(&mut self) -> usize {
        let trim = (self.watermark() - self.base) as usize;
        if trim > 0 {
            self.events.drain(..trim);
            self.base += trim as u64;
        }
        trim
    }

    /// Clone out the event at `id`'s position and advance the cursor.
    /// `None` if the cursor is unknown or already at the head.
    fn consume_one(&mut self, id: CursorId) -> Option<E>
    where
        E: Clone,
    {
        let base = self.base;
        let pos = self.cursors.get_mut(&id)?;
        let event = self.events.get((*pos - base) as usize)?.clone();
        *pos += 1;
        Some(event)
    }
}

/// A pull-based, multi-consumer event queue.
///
/// A single producer-facing [`push`](Self::push) appends events; every
/// subscriber consumes the events published after its own
/// [`subscribe`](Self::subscribe), at its own pace, through a [`Cursor`].
/// Consuming through one cursor never affects what another cursor will
/// observe, only how much of the shared buffer stays retained: the buffer
/// is compacted down to the slowest cursor after every consuming call.
///
/// Every operation is total — there is no error case. Consuming past the
/// newest event yields `None`, unsubscribing twice is a no-op, and pushing
/// with no subscribers silently discards the event (nobody could ever read
/// it, so buffering it would only leak).
///
/// All state sits behind one lock covering the buffer and every cursor
/// position together, so the queue can be shared by reference. The intended
/// use is still a single-threaded tick loop; the queue provides mutual
/// exclusion, not cross-thread delivery semantics.
pub struct EventQueue<E> {
    inner: RwLock<Inner<E>>,
}

impl<E> EventQueue<E> {
    /// Create an empty queue with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                events: VecDeque::new(),
                base: 0,
                cursors: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Register a new consumer.
    ///
    /// The cursor starts at the current head: it only ever observes events
    /// pushed after this call. Subscribers must keep consuming (or
    /// [`unsubscribe`](Self::unsubscribe)) or the buffer grows without
    /// bound behind them.
    pub fn subscribe(&self) -> Cursor {
        let mut inner = self.inner.write();

        let id = CursorId(inner.next_id);
        inner.next_id += 1;

        let position = inner.head();
        inner.cursors.insert(id, position);

        debug!(cursor = %id, position, "subscribed");

        Cursor::new(id)
    }

    /// Remove a consumer.
    ///
    /// The cursor stops influencing compaction immediately; whatever it was
    /// pinning is trimmed before this returns. Unsubscribing a cursor that
    /// was never registered here (or already removed via a duplicate
    /// handle) is a no-op.
    pub fn unsubscribe(&self, cursor: Cursor) {
        let mut inner = self.inner.write();

        if inner.cursors.remove(&cursor.id()).is_some() {
            let trimmed = inner.shrink();
            debug!(cursor = %cursor.id(), trimmed, "unsubscribed");
        }
    }

    /// Push an event to the tail of the queue.
    ///
    /// When no cursors are registered the event is discarded instead of
    /// buffered, since nothing could ever consume it.
    pub fn push(&self, event: E) {
        let mut inner = self.inner.write();

        if inner.cursors.is_empty() {
            trace!("no subscribers, event dropped");
            return;
        }

        inner.events.push_back(event);
    }

    /// Trim all events that every live cursor has already read.
    ///
    /// Runs automatically after every consuming call; exposed for callers
    /// that want to reclaim memory at a specific point (e.g. the end of a
    /// frame). Returns the number of events removed, `0` when the slowest
    /// cursor pins the whole buffer. With no cursors at all the entire
    /// buffer is trimmed.
    pub fn shrink(&self) -> usize {
        let trimmed = self.inner.write().shrink();
        if trimmed > 0 {
            trace!(trimmed, "compacted");
        }
        trimmed
    }

    /// Discard all buffered events and re-arm every cursor at the new head.
    ///
    /// Afterwards each cursor behaves as if freshly subscribed to an empty
    /// queue: it sees nothing until new events are pushed, including events
    /// it had not yet read before the call.
    pub fn clear(&self) {
        let mut inner = self.inner.write();

        let dropped = inner.events.len();
        inner.base += dropped as u64;
        inner.events.clear();

        let head = inner.head();
        for position in inner.cursors.values_mut() {
            *position = head;
        }

        debug!(dropped, "cleared");
    }

    /// Number of events currently held in the buffer.
    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    /// Whether the buffer currently holds no events.
    pub fn is_empty(&self) -> bool {
        self.inner.read().events.is_empty()
    }

    /// Number of live cursors.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().cursors.len()
    }

    /// Point-in-time counters.
    pub fn stats(&self) -> QueueStats {
        let inner = self.inner.read();
        QueueStats {
            published: inner.head(),
            retained: inner.events.len(),
            reclaimed: inner.base,
            subscribers: inner.cursors.len(),
        }
    }

    /// Upper bound for a drain starting now.
    pub(crate) fn drain_bound(&self) -> u64 {
        self.inner.read().head()
    }
}

impl<E: Clone> EventQueue<E> {
    /// Consume the next unread event for `cursor`, if there is one.
    ///
    /// The cursor advances only when an event is returned; a miss leaves it
    /// in place so a later push is not skipped. The queue is compacted
    /// after every call, hit or miss.
    ///
    /// A cursor unknown to this queue (unsubscribed, or obtained from a
    /// different queue) is inert: always a miss, never a panic.
    pub fn next(&self, cursor: &Cursor) -> Option<E> {
        let mut inner = self.inner.write();
        let event = inner.consume_one(cursor.id());
        inner.shrink();
        event
    }

    /// Lazily drain every event unread by `cursor` at the time of this
    /// call, in publish order.
    ///
    /// The upper bound is captured on entry: events pushed while the drain
    /// is in progress are yielded by the *next* drain, not this one. The
    /// cursor advances as each item is pulled, and the queue is compacted
    /// exactly once per drain — when iteration completes, or when an
    /// abandoned iterator is dropped.
    ///
    /// ```
    /// use fanout::EventQueue;
    ///
    /// let queue = EventQueue::new();
    /// let cursor = queue.subscribe();
    ///
    /// queue.push(2);
    /// queue.push(3);
    ///
    /// let events: Vec<i32> = queue.read(&cursor).collect();
    /// assert_eq!(events, vec![2, 3]);
    /// ```
    pub fn read(&self, cursor: &Cursor) -> Drain<'_, E> {
        Drain::new(self, cursor.id(), self.drain_bound())
    }

    /// Pull one event for a drain, respecting its frozen upper bound.
    pub(crate) fn drain_next(&self, id: CursorId, end: u64) -> Option<E> {
        let mut inner = self.inner.write();
        let position = *inner.cursors.get(&id)?;
        if position >= end {
            return None;
        }
        inner.consume_one(id)
    }

    /// Snapshot of the retained buffer, oldest first.
    ///
    /// This is a copy; holding it does not pin the queue.
    pub fn events(&self) -> Vec<E> {
        self.inner.read().events.iter().cloned().collect()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
