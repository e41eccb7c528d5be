//! Cancellable delayed tasks driven by the event loop clock.
//!
//! Timestamps are milliseconds since the loop started. A [`Debouncer`]
//! holds at most one pending value; queueing again re-arms the deadline.

/// A single re-armable deadline carrying a value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Arm (or re-arm) the deadline, replacing any pending value.
    pub fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Take the pending value once its delay has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*queued_at) >= self.delay_ms {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds left until the pending value becomes ready.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        let (_, queued_at) = self.pending.as_ref()?;
        Some(
            queued_at
                .saturating_add(self.delay_ms)
                .saturating_sub(now_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_before_delay() {
        let mut debouncer = Debouncer::new(150);
        debouncer.queue("a", 1_000);
        assert_eq!(debouncer.take_ready(1_149), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(1_150), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_requeue_rearms_deadline_and_keeps_latest_value() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue(1, 0);
        debouncer.queue(2, 80);
        assert_eq!(debouncer.take_ready(120), None);
        assert_eq!(debouncer.take_ready(180), Some(2));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut debouncer = Debouncer::new(50);
        debouncer.queue((), 10);
        assert_eq!(debouncer.cancel(), Some(()));
        assert_eq!(debouncer.take_ready(1_000), None);
    }

    #[test]
    fn test_remaining_ms_counts_down() {
        let mut debouncer = Debouncer::new(50);
        assert_eq!(debouncer.remaining_ms(0), None);
        debouncer.queue((), 100);
        assert_eq!(debouncer.remaining_ms(120), Some(30));
        assert_eq!(debouncer.remaining_ms(500), Some(0));
    }
}
