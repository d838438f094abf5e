//! Calendar calculations over medicine schedules: expiry windows and
//! overdue dose slots.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{ConsumptionRecord, Medicine, MedicineId};

const SECONDS_PER_DAY: i64 = 86_400;
const MILLIS_PER_DAY: i64 = SECONDS_PER_DAY * 1_000;

/// Default look-ahead used by the expiring-medicines report.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;

/// Whole days from `now` until `end`, floored.
///
/// A course ending later today yields `0`; one that ended yesterday yields a
/// negative number.
pub fn days_until(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (end - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Whether the medicine's course ends within `window_days` of `now`.
///
/// Medicines without an end date never expire. Courses that have already
/// ended are included.
pub fn expires_within(medicine: &Medicine, now: DateTime<Utc>, window_days: i64) -> bool {
    medicine
        .end_date()
        .is_some_and(|end| days_until(end, now) <= window_days)
}

/// A scheduled dose slot for today that is due and not yet covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueDose {
    pub medicine_id: MedicineId,
    pub medicine_name: String,
    pub scheduled_at: DateTime<Utc>,
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Slots for `medicine` that fall within today (UTC) and are due by `now`.
///
/// A day holds exactly `frequency` slots, spaced `24h / frequency` apart and
/// anchored on the start date's time of day. Each slot offset is derived from
/// the anchor on its own, so rounding never accumulates across slots or days.
/// Slots before the start date or after the end date are skipped.
pub fn due_slots_today(medicine: &Medicine, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let per_day = i64::from(medicine.frequency().get());
    if per_day == 0 {
        return Vec::new();
    }
    let day_start = start_of_day(now);
    let start = medicine.start_date();
    let end = medicine.end_date();
    let anchor = (start - start_of_day(start)).num_milliseconds();

    let mut slots: Vec<DateTime<Utc>> = (0..per_day)
        .map(|k| {
            let offset = (anchor + k * MILLIS_PER_DAY / per_day).rem_euclid(MILLIS_PER_DAY);
            day_start + TimeDelta::milliseconds(offset)
        })
        .filter(|slot| *slot >= start && *slot <= now && end.is_none_or(|end| *slot <= end))
        .collect();
    slots.sort_unstable();
    slots
}

/// Due slots today that are not covered by today's consumption records.
///
/// Each record for a medicine covers one slot, earliest first.
pub fn overdue_doses(
    medicines: &[Medicine],
    taken_today: &[ConsumptionRecord],
    now: DateTime<Utc>,
) -> Vec<OverdueDose> {
    medicines
        .iter()
        .flat_map(|medicine| {
            let covered = taken_today
                .iter()
                .filter(|record| record.medicine_id() == medicine.id())
                .count();
            due_slots_today(medicine, now)
                .into_iter()
                .skip(covered)
                .map(|scheduled_at| OverdueDose {
                    medicine_id: medicine.id(),
                    medicine_name: medicine.name().as_ref().to_owned(),
                    scheduled_at,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dosage, DosesPerDay, MedicineDraft, MedicineName, UserId};
    use chrono::TimeZone;
    use rstest::rstest;

    fn ts(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn medicine(
        id: i64,
        frequency: i64,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Medicine {
        Medicine::new(
            MedicineId::new(id).expect("id"),
            MedicineDraft {
                id: None,
                name: MedicineName::new(format!("Med {id}")).expect("name"),
                dosage: Dosage::new("1 tablet").expect("dosage"),
                frequency: DosesPerDay::new(frequency).expect("frequency"),
                start_date: start,
                end_date: end,
                notes: None,
            },
        )
        .expect("valid medicine")
    }

    fn taken(medicine_id: i64, at: DateTime<Utc>) -> ConsumptionRecord {
        ConsumptionRecord::new(
            UserId::new(1).expect("user"),
            MedicineId::new(medicine_id).expect("medicine"),
            at,
            None,
        )
    }

    #[rstest]
    #[case(ts(10, 12, 0), 0)]
    #[case(ts(10, 23, 59), 0)]
    #[case(ts(11, 12, 0), 1)]
    #[case(ts(9, 12, 0), -1)]
    #[case(ts(10, 11, 0), -1)]
    fn days_until_floors(#[case] end: DateTime<Utc>, #[case] expected: i64) {
        assert_eq!(days_until(end, ts(10, 12, 0)), expected);
    }

    #[rstest]
    #[case(Some(ts(10, 12, 0)), true)]
    #[case(Some(ts(17, 12, 0)), true)]
    #[case(Some(ts(18, 12, 0)), false)]
    #[case(Some(ts(1, 12, 0)), true)]
    #[case(None, false)]
    fn expiry_window(#[case] end: Option<DateTime<Utc>>, #[case] expected: bool) {
        let med = medicine(1, 1, ts(1, 8, 0), end);
        assert_eq!(
            expires_within(&med, ts(10, 12, 0), DEFAULT_EXPIRY_WINDOW_DAYS),
            expected
        );
    }

    #[rstest]
    fn as_needed_medicines_have_no_slots() {
        let med = medicine(1, 0, ts(1, 8, 0), None);
        assert!(due_slots_today(&med, ts(10, 23, 0)).is_empty());
    }

    #[rstest]
    fn slots_are_anchored_on_start_time() {
        let med = medicine(1, 3, ts(1, 6, 0), None);
        let slots = due_slots_today(&med, ts(10, 15, 0));
        assert_eq!(slots, vec![ts(10, 6, 0), ts(10, 14, 0)]);
    }

    #[rstest]
    fn slots_wrap_from_previous_day() {
        // 20:00 start every 8 hours gives 04:00, 12:00, 20:00 today.
        let med = medicine(1, 3, ts(1, 20, 0), None);
        let slots = due_slots_today(&med, ts(10, 23, 0));
        assert_eq!(slots, vec![ts(10, 4, 0), ts(10, 12, 0), ts(10, 20, 0)]);
    }

    #[rstest]
    fn slots_respect_start_and_end() {
        let starts_today = medicine(1, 4, ts(10, 9, 0), None);
        assert_eq!(
            due_slots_today(&starts_today, ts(10, 16, 0)),
            vec![ts(10, 9, 0), ts(10, 15, 0)]
        );

        let ends_today = medicine(2, 4, ts(1, 0, 0), Some(ts(10, 7, 0)));
        assert_eq!(
            due_slots_today(&ends_today, ts(10, 23, 0)),
            vec![ts(10, 0, 0), ts(10, 6, 0)]
        );

        let not_started = medicine(3, 4, ts(11, 0, 0), None);
        assert!(due_slots_today(&not_started, ts(10, 23, 0)).is_empty());
    }

    #[rstest]
    #[case(5)]
    #[case(7)]
    #[case(9)]
    #[case(11)]
    fn uneven_frequencies_fit_exactly_into_a_day(#[case] frequency: i64) {
        let med = medicine(1, frequency, ts(10, 0, 0), None);
        let end_of_day = Utc
            .with_ymd_and_hms(2024, 6, 10, 23, 59, 59)
            .single()
            .expect("valid timestamp");

        let slots = due_slots_today(&med, end_of_day);

        assert_eq!(slots.len(), usize::try_from(frequency).expect("small"));
        assert_eq!(slots.first(), Some(&ts(10, 0, 0)));
        let min_gap = TimeDelta::milliseconds(MILLIS_PER_DAY / frequency);
        assert!(slots.windows(2).all(|pair| pair[1] - pair[0] >= min_gap));
    }

    #[rstest]
    #[case(7, 3)]
    #[case(7, 25)]
    #[case(5, 17)]
    fn slots_keep_the_same_times_every_day(#[case] frequency: i64, #[case] days_later: i64) {
        let med = medicine(1, frequency, ts(1, 9, 30), None);
        let day_two_close = ts(2, 23, 59);
        let later_close = day_two_close + TimeDelta::days(days_later);

        let expected: Vec<DateTime<Utc>> = due_slots_today(&med, day_two_close)
            .into_iter()
            .map(|slot| slot + TimeDelta::days(days_later))
            .collect();

        assert_eq!(expected.len(), usize::try_from(frequency).expect("small"));
        assert!(expected.contains(&(ts(2, 9, 30) + TimeDelta::days(days_later))));
        assert_eq!(due_slots_today(&med, later_close), expected);
    }

    #[rstest]
    fn records_cover_earliest_slots() {
        let meds = vec![medicine(1, 3, ts(1, 6, 0), None)];
        let records = vec![taken(1, ts(10, 7, 0))];

        let overdue = overdue_doses(&meds, &records, ts(10, 15, 0));

        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].scheduled_at, ts(10, 14, 0));
        assert_eq!(overdue[0].medicine_name, "Med 1");
    }

    #[rstest]
    fn records_for_other_medicines_do_not_cover() {
        let meds = vec![
            medicine(1, 1, ts(1, 6, 0), None),
            medicine(2, 1, ts(1, 7, 0), None),
        ];
        let records = vec![taken(2, ts(10, 7, 5))];

        let overdue = overdue_doses(&meds, &records, ts(10, 9, 0));

        let ids: Vec<i64> = overdue.iter().map(|d| d.medicine_id.get()).collect();
        assert_eq!(ids, vec![1]);
    }
}
