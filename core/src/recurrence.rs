//! Recurrence calculator.
//!
//! Pure calendar arithmetic, performed in UTC date terms so that successor
//! due dates never drift across timezones.

use crate::types::RecurrenceType;
use chrono::{Days, Months, NaiveDate};

/// Compute the next occurrence's due date from a recurrence policy and a
/// base date.
///
/// - `Daily` → the following day.
/// - `Weekly` → seven days later.
/// - `Monthly` → the same calendar day next month, clamped to the last valid
///   day of the target month (Jan 31 → Feb 28/29).
/// - `None` → the base date unchanged.
///
/// The additions are checked; at the edge of chrono's supported range the
/// base date is returned unchanged rather than wrapping.
#[must_use]
pub fn next_due_date(recurrence_type: RecurrenceType, base_date: NaiveDate) -> NaiveDate {
    match recurrence_type {
        RecurrenceType::None => base_date,
        RecurrenceType::Daily => base_date.checked_add_days(Days::new(1)).unwrap_or(base_date),
        RecurrenceType::Weekly => base_date.checked_add_days(Days::new(7)).unwrap_or(base_date),
        RecurrenceType::Monthly => base_date
            .checked_add_months(Months::new(1))
            .unwrap_or(base_date),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_advances_one_day() {
        assert_eq!(
            next_due_date(RecurrenceType::Daily, date(2025, 1, 10)),
            date(2025, 1, 11)
        );
        assert_eq!(
            next_due_date(RecurrenceType::Daily, date(2024, 12, 31)),
            date(2025, 1, 1)
        );
    }

    #[test]
    fn weekly_advances_seven_days() {
        assert_eq!(
            next_due_date(RecurrenceType::Weekly, date(2025, 1, 10)),
            date(2025, 1, 17)
        );
        assert_eq!(
            next_due_date(RecurrenceType::Weekly, date(2025, 2, 26)),
            date(2025, 3, 5)
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_shorter_month() {
        // Leap year
        assert_eq!(
            next_due_date(RecurrenceType::Monthly, date(2024, 1, 31)),
            date(2024, 2, 29)
        );
        // Non-leap year
        assert_eq!(
            next_due_date(RecurrenceType::Monthly, date(2025, 1, 31)),
            date(2025, 2, 28)
        );
        assert_eq!(
            next_due_date(RecurrenceType::Monthly, date(2025, 3, 31)),
            date(2025, 4, 30)
        );
    }

    #[test]
    fn monthly_rolls_over_december() {
        assert_eq!(
            next_due_date(RecurrenceType::Monthly, date(2024, 12, 15)),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn none_returns_base_unchanged() {
        let base = date(2025, 6, 1);
        assert_eq!(next_due_date(RecurrenceType::None, base), base);
    }

    proptest! {
        #[test]
        fn recurring_next_date_is_strictly_later(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            recurrence in prop_oneof![
                Just(RecurrenceType::Daily),
                Just(RecurrenceType::Weekly),
                Just(RecurrenceType::Monthly),
            ],
        ) {
            let base = date(year, month, day);
            prop_assert!(next_due_date(recurrence, base) > base);
        }

        #[test]
        fn monthly_always_yields_a_valid_date_from_month_ends(
            year in 1990i32..2100,
            month in 1u32..=12,
        ) {
            // Start from the last day of the month, the clamping-sensitive case.
            let first = date(year, month, 1);
            let last = next_due_date(RecurrenceType::Monthly, first)
                .checked_sub_days(Days::new(1))
                .unwrap();
            let next = next_due_date(RecurrenceType::Monthly, last);
            prop_assert!(next > last);
        }
    }
}
