use std::time::Duration;

/// Quiet period after the last resize notification, matching the page's 150 ms timer.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Collapses a burst of resize notifications into a single recompute.
///
/// Time is supplied by the caller as a monotonic offset, so the debouncer never reads a clock.
#[derive(Clone, Copy, Debug)]
pub struct ResizeDebouncer {
    window: Duration,
    last: Option<Duration>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a resize at `now`; restarts the quiet period.
    pub fn notify(&mut self, now: Duration) {
        self.last = Some(now);
    }

    /// `true` exactly once per burst, when the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) >= self.window => {
                self.last = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/resize.rs"]
mod tests;
