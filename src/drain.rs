//! Lazy draining iterator over a cursor's unread events.

use crate::cursor::CursorId;
use crate::queue::EventQueue;
use std::iter::FusedIterator;

/// Iterator returned by [`EventQueue::read`].
///
/// Single-pass and non-restartable: each pulled item advances the cursor,
/// so the positions it yields are consumed for good. The upper bound is the
/// buffer head at the time of the `read` call; the queue is compacted once
/// per drain, either on exhaustion or on drop.
pub struct Drain<'a, E> {
    queue: &'a EventQueue<E>,
    cursor: CursorId,
    /// Logical offset one past the last event this drain may yield.
    end: u64,
    /// Set once the single compaction has run.
    done: bool,
}

impl<'a, E> Drain<'a, E> {
    pub(crate) fn new(queue: &'a EventQueue<E>, cursor: CursorId, end: u64) -> Self {
        Self {
            queue,
            cursor,
            end,
            done: false,
        }
    }
}

impl<E: Clone> Iterator for Drain<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        if self.done {
            return None;
        }

        match self.queue.drain_next(self.cursor, self.end) {
            Some(event) => Some(event),
            None => {
                self.done = true;
                self.queue.shrink();
                None
            }
        }
    }
}

impl<E: Clone> FusedIterator for Drain<'_, E> {}

impl<E> Drop for Drain<'_, E> {
    fn drop(&mut self) {
        // An abandoned drain still owes the queue its one compaction.
        if !self.done {
            self.done = true;
            self.queue.shrink();
        }
    }
}
