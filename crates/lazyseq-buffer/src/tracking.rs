//! Backlog peak tracking for the retaining buffers.
//!
//! Keep this cheap: it is updated under the buffer lock on every fan-out.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct PeakTracker {
    peak: AtomicUsize,
    crossings: AtomicUsize,
    warn_at: Option<usize>,
}

impl PeakTracker {
    pub fn new(warn_at: Option<usize>) -> Self {
        Self {
            peak: AtomicUsize::new(0),
            crossings: AtomicUsize::new(0),
            warn_at,
        }
    }

    /// Record a new retained-element count; updates the peak if higher.
    ///
    /// Returns true the first time the count moves past the warning
    /// threshold (once per peak, not once per call).
    pub fn record(&self, retained: usize, what: &'static str) -> bool {
        let mut cur = self.peak.load(Ordering::Relaxed);
        while retained > cur {
            match self
                .peak
                .compare_exchange(cur, retained, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(observed) => cur = observed,
            }
        }
        let crossed = matches!(self.warn_at, Some(limit) if retained > limit && cur <= limit);
        if crossed {
            self.crossings.fetch_add(1, Ordering::Relaxed);
        }
        #[cfg(feature = "tracing")]
        {
            if crossed {
                tracing::warn!(retained, limit = ?self.warn_at, what, "buffer backlog over threshold");
            } else {
                tracing::trace!(retained, peak = self.peak(), what, "buffer backlog");
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = what;
        crossed
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Times the threshold was crossed. Not reset by `clear`.
    pub fn crossings(&self) -> usize {
        self.crossings.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.peak.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_and_threshold() {
        let t = PeakTracker::new(Some(2));
        assert!(!t.record(1, "test"));
        assert!(!t.record(2, "test"));
        assert!(t.record(3, "test"));
        // Already past the threshold; no second warning.
        assert!(!t.record(4, "test"));
        assert!(!t.record(1, "test"));
        assert_eq!(t.peak(), 4);

        assert_eq!(t.crossings(), 1);

        t.clear();
        assert_eq!(t.peak(), 0);
        assert!(t.record(5, "test"));
        assert_eq!(t.crossings(), 2);
    }
}
