//! Record id generation

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of ids for records created without one
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

/// Millisecond-timestamp ids.
///
/// Two requests in the same millisecond would collide on the raw clock, so
/// each id is at least one greater than the previous one handed out.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: AtomicI64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev + 1)
    }
}

/// Deterministic ids counting up from a starting value
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}
