use tokio::time::{Duration, Instant};

/// Quiet-period timer for query recomputation.
///
/// Every change pushes the deadline back to `last_change + window`; there is
/// never more than one pending deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    dirty: bool,
    last_change: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            dirty: false,
            last_change: None,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the timer for a change observed at `now`
    pub fn record(&mut self, now: Instant) {
        self.last_change = Some(now);
        self.dirty = true;
    }

    pub fn cancel(&mut self) {
        self.dirty = false;
        self.last_change = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.dirty {
            return None;
        }
        self.last_change.map(|last| last + self.window)
    }

    /// Consume the pending deadline if it has passed at `now`
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_deadline() {
            Some(deadline) if deadline <= now => {
                self.cancel();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_debouncer_has_no_deadline() {
        let debouncer = Debouncer::new(Duration::from_millis(75));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[test]
    fn record_generates_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(75));
        debouncer.record(start);
        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(75))
        );
    }

    #[test]
    fn later_change_pushes_deadline_back() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(75));
        debouncer.record(start);
        debouncer.record(start + Duration::from_millis(10));

        assert!(!debouncer.take_due(start + Duration::from_millis(80)));
        assert!(debouncer.take_due(start + Duration::from_millis(85)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn nothing_is_due_before_the_window_elapses() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_secs(5));
        debouncer.record(start);

        assert!(!debouncer.take_due(start));
        assert!(!debouncer.take_due(start + Duration::from_millis(4_999)));
        assert!(debouncer.is_pending());
        assert!(debouncer.take_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn cancel_drops_pending_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(75));
        debouncer.record(start);
        debouncer.cancel();
        assert!(!debouncer.take_due(start + Duration::from_secs(1)));
    }
}
