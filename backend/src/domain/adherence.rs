//! Adherence rate calculation.

use std::fmt;

use crate::domain::UserId;

/// Percentage of consumption records against the number of medicines.
///
/// The rate is deliberately not clamped: a user who logs more doses than they
/// have medicines reports more than 100%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdherenceRate(f64);

impl AdherenceRate {
    /// `100 * consumption_records / medicines`, or `0` without medicines.
    ///
    /// # Examples
    /// ```
    /// use medtrack::domain::AdherenceRate;
    ///
    /// assert_eq!(AdherenceRate::compute(0, 5).percent(), 0.0);
    /// assert_eq!(AdherenceRate::compute(2, 1).percent(), 50.0);
    /// assert_eq!(AdherenceRate::compute(1, 3).to_string(), "300.0%");
    /// ```
    #[must_use]
    pub fn compute(medicines: usize, consumption_records: usize) -> Self {
        if medicines == 0 {
            return Self(0.0);
        }
        Self(100.0 * as_f64(consumption_records) / as_f64(medicines))
    }

    #[must_use]
    pub const fn percent(self) -> f64 {
        self.0
    }
}

fn as_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

impl fmt::Display for AdherenceRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Adherence figures for one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdherenceReport {
    pub user_id: UserId,
    pub medicines: usize,
    pub consumption_records: usize,
    pub rate: AdherenceRate,
}

impl AdherenceReport {
    pub fn new(user_id: UserId, medicines: usize, consumption_records: usize) -> Self {
        Self {
            user_id,
            medicines,
            consumption_records,
            rate: AdherenceRate::compute(medicines, consumption_records),
        }
    }

    /// Human-readable summary, e.g. `User adherence rate: 100.0%`.
    pub fn message(&self) -> String {
        format!("User adherence rate: {}", self.rate)
    }
}
