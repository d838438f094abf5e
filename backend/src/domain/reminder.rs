//! Reminder timestamps. Nothing is stored or delivered; callers get the
//! computed instant back.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{MedicineId, UserId};

/// Offset requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOffset {
    /// Dose reminder, `hours_before` on the wire.
    Hours(i64),
    /// Refill reminder, `days_before` on the wire.
    Days(i64),
}

impl ReminderOffset {
    fn delta(self) -> Option<TimeDelta> {
        match self {
            Self::Hours(hours) => TimeDelta::try_hours(hours),
            Self::Days(days) => TimeDelta::try_days(days),
        }
    }

    /// `now + offset`, or `None` if the result is out of range.
    pub fn fire_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_add_signed(self.delta()?)
    }
}

/// Computed reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub user_id: UserId,
    pub medicine_id: MedicineId,
    pub offset: ReminderOffset,
    pub fire_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .expect("valid now")
    }

    #[rstest]
    #[case(ReminderOffset::Hours(2), Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0))]
    #[case(ReminderOffset::Hours(-2), Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0))]
    #[case(ReminderOffset::Days(3), Utc.with_ymd_and_hms(2024, 1, 4, 12, 0, 0))]
    fn fire_at_adds_offset(
        #[case] offset: ReminderOffset,
        #[case] expected: chrono::LocalResult<DateTime<Utc>>,
    ) {
        assert_eq!(offset.fire_at(now()), expected.single());
    }

    #[rstest]
    #[case(ReminderOffset::Hours(i64::MAX))]
    #[case(ReminderOffset::Days(i64::MIN))]
    fn fire_at_rejects_out_of_range(#[case] offset: ReminderOffset) {
        assert!(offset.fire_at(now()).is_none());
    }
}
