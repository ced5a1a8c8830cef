//! Calendar timestamps as reported by the modem.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// A date and time built from the modem's raw fields.
///
/// The raw fields are kept even if they do not form a real calendar date, so
/// an invalid timestamp can still be displayed. `DateTime::default()` is the
/// all-zero, invalid timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTime {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    naive: Option<NaiveDateTime>,
}

impl DateTime {
    pub fn new(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let naive = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
            .and_then(|d| d.and_hms_opt(hour, minute, second));

        DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
            naive,
        }
    }

    /// Whether the fields form a real calendar date and time of day.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.naive.is_some()
    }

    pub fn naive(&self) -> Option<NaiveDateTime> {
        self.naive
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    /// Signed number of seconds from `self` to `other`, i.e. positive if
    /// `other` is later. Zero if either timestamp is invalid.
    pub fn diff_in_seconds(&self, other: &DateTime) -> i64 {
        match (self.naive, other.naive) {
            (Some(from), Some(to)) => to.signed_duration_since(from).num_seconds(),
            _ => 0,
        }
    }

    pub fn to_date_time_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_invalid() {
        let dt = DateTime::default();
        assert!(!dt.is_valid());
        assert_eq!(dt.to_date_time_string(), "0000-00-00 00:00:00");
    }

    #[test]
    fn test_valid_date() {
        let dt = DateTime::new(2023, 3, 20, 18, 38, 5);
        assert!(dt.is_valid());
        assert_eq!(dt.to_string(), "2023-03-20 18:38:05");
    }

    #[test]
    fn test_invalid_calendar_fields() {
        assert!(!DateTime::new(2023, 2, 30, 0, 0, 0).is_valid());
        assert!(!DateTime::new(2023, 13, 1, 0, 0, 0).is_valid());
        assert!(!DateTime::new(2023, 1, 1, 24, 0, 0).is_valid());
        assert!(!DateTime::new(2000, 0, 0, 0, 0, 0).is_valid());
        assert!(!DateTime::new(u32::MAX, 1, 1, 0, 0, 0).is_valid());
    }

    #[test]
    fn test_diff_in_seconds_is_signed() {
        let a = DateTime::new(2023, 3, 20, 23, 59, 50);
        let b = DateTime::new(2023, 3, 21, 0, 0, 20);
        assert_eq!(a.diff_in_seconds(&b), 30);
        assert_eq!(b.diff_in_seconds(&a), -30);
        assert_eq!(a.diff_in_seconds(&a), 0);
    }

    #[test]
    fn test_diff_with_invalid_is_zero() {
        let a = DateTime::new(2023, 3, 20, 18, 38, 5);
        assert_eq!(a.diff_in_seconds(&DateTime::default()), 0);
    }
}
