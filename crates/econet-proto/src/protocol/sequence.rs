//! Thread-safe allocator for request correlation ids.
//!
//! The protocol leaves id choice to the caller; the only requirement is that
//! two requests in flight on the same channel never share an id.  A
//! monotonically increasing counter satisfies that for the lifetime of a
//! channel without any bookkeeping.
//!
//! The counter uses `AtomicU64`, so several tasks holding the same client can
//! allocate ids concurrently without a lock.

use std::sync::atomic::{AtomicU64, Ordering};

use super::messages::RequestId;

/// A monotonically increasing source of [`RequestId`]s.
///
/// Ids start at 1 and wrap around at `u64::MAX` without panicking.
///
/// # Examples
///
/// ```rust
/// use econet_proto::RequestIdCounter;
///
/// let ids = RequestIdCounter::new();
/// assert_eq!(ids.next(), 1);
/// assert_eq!(ids.next(), 2);
/// ```
#[derive(Debug)]
pub struct RequestIdCounter {
    inner: AtomicU64,
}

impl RequestIdCounter {
    /// Creates a counter whose first id is 1.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(1),
        }
    }

    /// Returns the next id and atomically advances the counter.
    ///
    /// `Relaxed` ordering is enough: ids only need to be unique, they do not
    /// publish any other memory.
    pub fn next(&self) -> RequestId {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the id the next call to [`next`](Self::next) will hand out.
    pub fn peek(&self) -> RequestId {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for RequestIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_request_id_counter_starts_at_one() {
        // Arrange
        let ids = RequestIdCounter::new();

        // Act
        let first = ids.next();

        // Assert
        assert_eq!(first, 1);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let ids = RequestIdCounter::new();
        assert_eq!(ids.peek(), 1);
        assert_eq!(ids.peek(), 1);
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn test_request_id_counter_wraps_at_u64_max() {
        // Arrange – start one step before overflow
        let ids = RequestIdCounter {
            inner: AtomicU64::new(u64::MAX),
        };

        // Act
        let before_wrap = ids.next();
        let after_wrap = ids.next();

        // Assert
        assert_eq!(before_wrap, u64::MAX);
        assert_eq!(after_wrap, 0);
    }

    #[test]
    fn test_concurrent_allocation_yields_unique_ids() {
        // Arrange
        let ids = Arc::new(RequestIdCounter::new());

        // Act – four threads allocate 250 ids each
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..250).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                // Assert – no id is handed out twice
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
