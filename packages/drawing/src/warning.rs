//! Transient warning shown when a click is rejected for being too far
//! zoomed out.

/// A re-triggerable warning with a fixed timeout.
///
/// Triggering while active restarts the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomWarning {
    timeout_ms: u64,
    active_until_ms: Option<u64>,
}

impl ZoomWarning {
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            active_until_ms: None,
        }
    }

    /// Shows the warning at `now_ms`, returning when it will clear.
    pub const fn trigger(&mut self, now_ms: u64) -> u64 {
        let until = now_ms.saturating_add(self.timeout_ms);
        self.active_until_ms = Some(until);
        until
    }

    /// Keeps the warning shown until `until_ms`.
    pub const fn extend_to(&mut self, until_ms: u64) {
        self.active_until_ms = Some(until_ms);
    }

    #[must_use]
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.active_until_ms.is_some_and(|until| now_ms < until)
    }

    pub const fn clear(&mut self) {
        self.active_until_ms = None;
    }

    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}
