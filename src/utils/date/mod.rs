// Date utility functions
// Week windows for the scheduling grid

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Column index of `date` in a week that starts on `first_day`.
pub fn weekday_index(date: NaiveDate, first_day: Weekday) -> u8 {
    let day = date.weekday().num_days_from_monday();
    let first = first_day.num_days_from_monday();
    ((day + 7 - first) % 7) as u8
}

/// Seven consecutive dates starting on the configured first weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start: NaiveDate,
    first_day: Weekday,
}

impl WeekWindow {
    /// The week that contains `date`.
    pub fn containing(date: NaiveDate, first_day: Weekday) -> Self {
        let offset = weekday_index(date, first_day) as i64;
        Self {
            start: date - Duration::days(offset),
            first_day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the week (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn first_day(&self) -> Weekday {
        self.first_day
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
            first_day: self.first_day,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
            first_day: self.first_day,
        }
    }

    /// Date shown in column `day`; indices past the week pin to its last day.
    pub fn date_for_day(&self, day: u8) -> NaiveDate {
        self.start + Duration::days(day.min(6) as i64)
    }

    pub fn day_index(&self, date: NaiveDate) -> Option<u8> {
        self.contains(date).then(|| (date - self.start).num_days() as u8)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..7).map(move |offset| start + Duration::days(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_index_sunday_first() {
        // 2025-03-02 is a Sunday
        assert_eq!(weekday_index(ymd(2025, 3, 2), Weekday::Sun), 0);
        assert_eq!(weekday_index(ymd(2025, 3, 8), Weekday::Sun), 6);
    }

    #[test]
    fn test_weekday_index_monday_first() {
        assert_eq!(weekday_index(ymd(2025, 3, 2), Weekday::Mon), 6);
        assert_eq!(weekday_index(ymd(2025, 3, 3), Weekday::Mon), 0);
    }

    #[test]
    fn test_week_containing_midweek_date() {
        let week = WeekWindow::containing(ymd(2025, 3, 5), Weekday::Sun);
        assert_eq!(week.start(), ymd(2025, 3, 2));
        assert_eq!(week.end(), ymd(2025, 3, 8));
        assert_eq!(week.date_for_day(2), ymd(2025, 3, 4));
        assert_eq!(week.day_index(ymd(2025, 3, 5)), Some(3));
        assert_eq!(week.day_index(ymd(2025, 3, 9)), None);
    }

    #[test]
    fn test_week_navigation_across_year() {
        let week = WeekWindow::containing(ymd(2025, 1, 1), Weekday::Mon);
        assert_eq!(week.start(), ymd(2024, 12, 30));
        assert_eq!(week.previous().start(), ymd(2024, 12, 23));
        assert_eq!(week.next().start(), ymd(2025, 1, 6));
    }

    #[test]
    fn test_dates_yields_seven_days() {
        let week = WeekWindow::containing(ymd(2024, 2, 28), Weekday::Sun);
        let dates: Vec<_> = week.dates().collect();
        assert_eq!(dates.len(), 7);
        assert!(dates.contains(&ymd(2024, 2, 29)));
        assert_eq!(dates[6], week.end());
    }

    #[test]
    fn test_date_for_day_pins_to_week() {
        let week = WeekWindow::containing(ymd(2025, 3, 5), Weekday::Sun);
        assert_eq!(week.date_for_day(9), week.end());
    }
}
