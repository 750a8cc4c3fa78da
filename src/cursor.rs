//! Cursor handles for queue consumers.

use std::fmt;

/// Unique identifier for a cursor within its queue.
///
/// Ids are allocated from a per-queue counter and never reused, so a stale
/// id (e.g. after [`unsubscribe`](crate::EventQueue::unsubscribe)) can never
/// alias a later subscriber.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CursorId(pub u64);

impl fmt::Debug for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CursorId({})", self.0)
    }
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a registered consumer of an [`EventQueue`](crate::EventQueue).
///
/// Obtained from [`subscribe`](crate::EventQueue::subscribe) and retained by
/// the consumer for the lifetime of its interest. The read position itself
/// lives inside the queue; the handle is only the key to it, so all
/// advancement happens through queue methods.
///
/// Two cursors are equal only if they identify the same subscription —
/// handles at the same position are not interchangeable.
///
/// Dropping a cursor without calling
/// [`unsubscribe`](crate::EventQueue::unsubscribe) leaves the subscription
/// registered. A registered cursor that never consumes pins the buffer
/// forever; unsubscribing (or consuming regularly) is the caller's
/// responsibility.
#[derive(Debug, PartialEq, Eq)]
pub struct Cursor {
    id: CursorId,
}

impl Cursor {
    pub(crate) fn new(id: CursorId) -> Self {
        Self { id }
    }

    /// The identifier of this cursor.
    pub fn id(&self) -> CursorId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_identity_is_id_based() {
        let a = Cursor::new(CursorId(1));
        let b = Cursor::new(CursorId(1));
        let c = Cursor::new(CursorId(2));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn cursor_id_formatting() {
        let id = CursorId(7);
        assert_eq!(format!("{:?}", id), "CursorId(7)");
        assert_eq!(format!("{}", id), "7");
    }
}
