//! Due-date and fine rules applied by the circulation engine.

use chrono::{DateTime, Duration, Utc};

use super::DomainError;

/// Default per-day fine, in the library's currency unit.
pub const DEFAULT_FINE_PER_DAY: f64 = 1.0;

/// Longest loan period accepted from configuration (about a century).
pub const MAX_LOAN_PERIOD_DAYS: i64 = 36_500;

/// How long a loan lasts and what a late return costs.
///
/// When `loan_period_days` is `None` no due date is recorded on new borrowings
/// and every return carries a fine of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPolicy {
    pub loan_period_days: Option<i64>,
    pub fine_per_day: f64,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: None,
            fine_per_day: DEFAULT_FINE_PER_DAY,
        }
    }
}

impl LoanPolicy {
    /// Policy with due-date tracking switched on.
    pub fn with_due_dates(loan_period_days: i64, fine_per_day: f64) -> Self {
        Self {
            loan_period_days: Some(loan_period_days),
            fine_per_day,
        }
    }

    pub fn tracks_due_dates(&self) -> bool {
        self.loan_period_days.is_some()
    }

    /// Due date for a loan issued at `issued_at`, if due dates are tracked.
    ///
    /// A period that does not fit in a calendar date is an `Internal` error.
    pub fn due_date(&self, issued_at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, DomainError> {
        let Some(days) = self.loan_period_days else {
            return Ok(None);
        };

        Duration::try_days(days)
            .and_then(|period| issued_at.checked_add_signed(period))
            .map(Some)
            .ok_or_else(|| {
                DomainError::Internal(format!("loan period of {} days is out of range", days))
            })
    }

    /// Fine owed for returning at `returned_at` a loan due at `due_at`.
    ///
    /// Only whole days count: returning 23 hours late is free, 25 hours late
    /// costs one day.
    pub fn fine_for(&self, due_at: Option<DateTime<Utc>>, returned_at: DateTime<Utc>) -> f64 {
        let Some(due_at) = due_at else {
            return 0.0;
        };

        let days_late = (returned_at - due_at).num_days().max(0);
        days_late as f64 * self.fine_per_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn no_due_date_without_loan_period() {
        let policy = LoanPolicy::default();
        assert!(!policy.tracks_due_dates());
        assert_eq!(policy.due_date(at(1, 10)).unwrap(), None);
    }

    #[test]
    fn due_date_adds_loan_period() {
        let policy = LoanPolicy::with_due_dates(14, 1.0);
        assert_eq!(policy.due_date(at(1, 10)).unwrap(), Some(at(15, 10)));
    }

    #[test]
    fn longest_configurable_period_still_has_a_due_date() {
        let policy = LoanPolicy::with_due_dates(MAX_LOAN_PERIOD_DAYS, 1.0);
        assert!(policy.due_date(at(1, 10)).unwrap().is_some());
    }

    #[test]
    fn oversized_period_is_an_error() {
        let policy = LoanPolicy::with_due_dates(i64::MAX / 100_000, 1.0);
        assert!(matches!(
            policy.due_date(Utc::now()),
            Err(DomainError::Internal(_))
        ));
    }

    #[test]
    fn returning_on_due_date_is_free() {
        let policy = LoanPolicy::with_due_dates(14, 1.0);
        assert_eq!(policy.fine_for(Some(at(15, 10)), at(15, 10)), 0.0);
    }

    #[test]
    fn returning_early_is_free() {
        let policy = LoanPolicy::with_due_dates(14, 1.0);
        assert_eq!(policy.fine_for(Some(at(15, 10)), at(3, 9)), 0.0);
    }

    #[test]
    fn whole_days_late_are_charged() {
        let policy = LoanPolicy::with_due_dates(14, 1.0);
        assert_eq!(policy.fine_for(Some(at(10, 10)), at(13, 10)), 3.0);
        // partial days are not charged
        assert_eq!(policy.fine_for(Some(at(10, 10)), at(13, 20)), 3.0);
        assert_eq!(policy.fine_for(Some(at(10, 10)), at(11, 9)), 0.0);
    }

    #[test]
    fn rate_scales_the_fine() {
        let policy = LoanPolicy::with_due_dates(7, 0.5);
        assert_eq!(policy.fine_for(Some(at(1, 0)), at(5, 0)), 2.0);
    }

    #[test]
    fn untracked_loans_never_accrue_fines() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.fine_for(None, at(30, 0)), 0.0);
    }
}
