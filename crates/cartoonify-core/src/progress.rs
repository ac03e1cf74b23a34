//! Synthetic progress estimate for long-running jobs
//!
//! The processing service reports no progress, so this is a capped linear
//! approximation advanced by a local timer. It never exceeds
//! [`ESTIMATE_CAP`] until the job actually succeeds.

/// Highest value the estimate reaches before the job completes
pub const ESTIMATE_CAP: u8 = 95;

/// Value reported once the job has succeeded
pub const COMPLETE: u8 = 100;

/// Percentage in `[0, 100]`, non-decreasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ProgressEstimate(u8);

impl ProgressEstimate {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Advance by `step`, saturating at [`ESTIMATE_CAP`].
    ///
    /// Returns `true` if the value changed.
    pub fn advance(&mut self, step: u8) -> bool {
        if self.0 >= ESTIMATE_CAP {
            return false;
        }
        let next = self.0.saturating_add(step).min(ESTIMATE_CAP);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    /// Jump to 100
    pub fn complete(&mut self) {
        self.0 = COMPLETE;
    }

    pub fn is_capped(&self) -> bool {
        self.0 >= ESTIMATE_CAP
    }

    pub fn is_complete(&self) -> bool {
        self.0 == COMPLETE
    }

    /// Fraction for gauge widgets
    pub fn ratio(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(ProgressEstimate::new().value(), 0);
    }

    #[test]
    fn test_advance_caps_at_95() {
        let mut p = ProgressEstimate::new();
        for _ in 0..100 {
            p.advance(5);
        }
        assert_eq!(p.value(), ESTIMATE_CAP);
        assert!(p.is_capped());
        assert!(!p.advance(5));
    }

    #[test]
    fn test_uneven_step_is_clamped() {
        let mut p = ProgressEstimate::new();
        for _ in 0..10 {
            p.advance(10);
        }
        assert_eq!(p.value(), 95);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut p = ProgressEstimate::new();
        let mut last = p.value();
        for step in [1, 7, 0, 3, 40, 60, 2] {
            p.advance(step);
            assert!(p.value() >= last);
            last = p.value();
        }
    }

    #[test]
    fn test_complete_sets_100() {
        let mut p = ProgressEstimate::new();
        p.advance(5);
        p.complete();
        assert_eq!(p.value(), 100);
        assert!(p.is_complete());
        assert!((p.ratio() - 1.0).abs() < f64::EPSILON);
    }
}
