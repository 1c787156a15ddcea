// Cooperative cancellation shared between the caller and the search workers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation flag with an optional deadline
///
/// Clones share the same flag, so one clone can be handed to a signal handler
/// while the search polls another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also counts as cancelled once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().child_with_timeout(Some(timeout))
    }

    /// Shares this token's flag, optionally adding a deadline measured from now
    ///
    /// An existing earlier deadline is kept.
    pub fn child_with_timeout(&self, timeout: Option<Duration>) -> Self {
        let deadline = match (self.deadline, timeout.map(|t| Instant::now() + t)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self
                .deadline
                .map_or(false, |deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancellationToken::new();
        let handler_side = token.clone();
        assert!(!token.is_cancelled());

        handler_side.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_deadline() {
        let expired = CancellationToken::with_timeout(Duration::ZERO);
        assert!(expired.is_cancelled());

        let distant = CancellationToken::with_timeout(Duration::from_secs(3600));
        assert!(!distant.is_cancelled());
    }

    #[test]
    fn test_child_keeps_earlier_deadline() {
        let parent = CancellationToken::with_timeout(Duration::ZERO);
        let child = parent.child_with_timeout(Some(Duration::from_secs(3600)));
        assert!(child.is_cancelled());

        let plain = CancellationToken::new();
        let child = plain.child_with_timeout(None);
        assert!(!child.is_cancelled());
        plain.cancel();
        assert!(child.is_cancelled());
    }
}
