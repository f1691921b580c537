//! Recurrence expansion
//!
//! Pure, deterministic expansion of a rule into occurrence dates. The
//! iterator is lazy and restartable: it is rebuilt from the rule alone and
//! never backed by storage, so materialization can re-run it at any time.

use chrono::{Datelike, NaiveDate};

use crate::types::{Frequency, RecurringRule};

/// Ordered, deduplicated occurrence dates over the rule's full range.
pub fn occurrences(rule: &RecurringRule) -> Occurrences {
    occurrences_between(rule, rule.start_date, rule.end_date)
}

/// Occurrence dates restricted to `[from, to]` intersected with the rule's
/// own range. An empty intersection yields an empty iterator.
pub fn occurrences_between(rule: &RecurringRule, from: NaiveDate, to: NaiveDate) -> Occurrences {
    let start = rule.start_date.max(from);
    let end = rule.end_date.min(to);
    Occurrences {
        cursor: if start <= end { Some(start) } else { None },
        end,
        frequency: rule.frequency,
        days_of_week: rule.days_of_week.clone(),
        // MONTHLY anchors on the rule's start day-of-month, clamped to
        // shorter months.
        anchor_day: rule.start_date.day(),
    }
}

/// Lazy walk over candidate dates.
pub struct Occurrences {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    frequency: Frequency,
    days_of_week: Vec<u8>,
    anchor_day: u32,
}

impl Occurrences {
    fn matches(&self, date: NaiveDate) -> bool {
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => {
                let weekday = date.weekday().number_from_monday() as u8;
                self.days_of_week.contains(&weekday)
            }
            Frequency::Monthly => {
                let target = self.anchor_day.min(days_in_month(date.year(), date.month()));
                date.day() == target
            }
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(date) = self.cursor {
            if date > self.end {
                self.cursor = None;
                return None;
            }
            self.cursor = date.succ_opt();
            if self.matches(date) {
                return Some(date);
            }
        }
        None
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeSlot;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(
        frequency: Frequency,
        start: NaiveDate,
        end: NaiveDate,
        days_of_week: Vec<u8>,
    ) -> RecurringRule {
        RecurringRule {
            id: 1,
            user_id: 1,
            room_id: 1,
            meeting_title: "Recurring".to_string(),
            description: None,
            start_date: start,
            end_date: end,
            slot: TimeSlot::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ),
            frequency,
            days_of_week,
            attendees_count: None,
            bookings_created: 0,
            created_at: 0,
        }
    }

    #[test]
    fn test_daily_covers_every_date() {
        let r = rule(Frequency::Daily, date(2024, 1, 1), date(2024, 1, 5), vec![]);
        let dates: Vec<_> = occurrences(&r).collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], date(2024, 1, 1));
        assert_eq!(dates[4], date(2024, 1, 5));
    }

    #[test]
    fn test_weekly_picks_selected_weekdays() {
        // 2024-01-01 is a Monday; Mon+Wed over two weeks -> 4 dates.
        let r = rule(
            Frequency::Weekly,
            date(2024, 1, 1),
            date(2024, 1, 14),
            vec![1, 3],
        );
        let dates: Vec<_> = occurrences(&r).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 3),
                date(2024, 1, 8),
                date(2024, 1, 10),
            ]
        );
    }

    #[test]
    fn test_monthly_uses_start_day_of_month() {
        let r = rule(Frequency::Monthly, date(2024, 1, 15), date(2024, 4, 30), vec![]);
        let dates: Vec<_> = occurrences(&r).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 15),
                date(2024, 2, 15),
                date(2024, 3, 15),
                date(2024, 4, 15),
            ]
        );
    }

    #[test]
    fn test_monthly_clamps_to_short_months() {
        // Day 31 anchors; February 2024 has 29 days, April has 30.
        let r = rule(Frequency::Monthly, date(2024, 1, 31), date(2024, 4, 30), vec![]);
        let dates: Vec<_> = occurrences(&r).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
            ]
        );
    }

    #[test]
    fn test_expansion_is_restartable() {
        let r = rule(Frequency::Daily, date(2024, 1, 1), date(2024, 1, 3), vec![]);
        let first: Vec<_> = occurrences(&r).collect();
        let second: Vec<_> = occurrences(&r).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_between_clamps_to_intersection() {
        let r = rule(Frequency::Daily, date(2024, 1, 1), date(2024, 1, 31), vec![]);
        let dates: Vec<_> = occurrences_between(&r, date(2024, 1, 10), date(2024, 1, 12)).collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], date(2024, 1, 10));

        // Disjoint window yields nothing.
        let none: Vec<_> = occurrences_between(&r, date(2024, 3, 1), date(2024, 3, 10)).collect();
        assert!(none.is_empty());
    }
}
