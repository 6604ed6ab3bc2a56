//! Day-of-year and hour-of-day newtypes for the Gregorian calendar.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::CalendarError;

/// Day-of-year in the Gregorian calendar (1..=366).
///
/// Day 366 only occurs in leap years; climatologies indexed by day-of-year
/// carry all 366 entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfYear(u16);

impl DayOfYear {
    /// Creates a `DayOfYear` from an integer label, as stored in climatology
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDayOfYear`] if `doy` is not in 1..=366.
    pub fn new(doy: i64) -> Result<Self, CalendarError> {
        match u16::try_from(doy) {
            Ok(d) if (1..=366).contains(&d) => Ok(Self(d)),
            _ => Err(CalendarError::InvalidDayOfYear { doy }),
        }
    }

    /// Day-of-year of a timestamp (January 1 is day 1).
    pub fn of(time: NaiveDateTime) -> Self {
        // chrono ordinals are always 1..=366.
        Self(time.ordinal() as u16)
    }

    /// Returns the inner day-of-year value (1..=366).
    pub fn get(self) -> u16 {
        self.0
    }
}

/// Hour of the day (0..=23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Creates an `HourOfDay` from an integer label.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidHour`] if `hour` is not in 0..=23.
    pub fn new(hour: i64) -> Result<Self, CalendarError> {
        match u8::try_from(hour) {
            Ok(h) if h <= 23 => Ok(Self(h)),
            _ => Err(CalendarError::InvalidHour { hour }),
        }
    }

    /// Hour of a timestamp, truncating minutes and seconds.
    pub fn of(time: NaiveDateTime) -> Self {
        Self(time.hour() as u8)
    }

    /// Returns the inner hour value (0..=23).
    pub fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn new_valid() {
        assert_eq!(DayOfYear::new(1).unwrap().get(), 1);
        assert_eq!(DayOfYear::new(366).unwrap().get(), 366);
        assert_eq!(HourOfDay::new(0).unwrap().get(), 0);
        assert_eq!(HourOfDay::new(23).unwrap().get(), 23);
    }

    #[test]
    fn new_invalid() {
        assert_eq!(
            DayOfYear::new(0).unwrap_err(),
            CalendarError::InvalidDayOfYear { doy: 0 }
        );
        assert_eq!(
            DayOfYear::new(367).unwrap_err(),
            CalendarError::InvalidDayOfYear { doy: 367 }
        );
        assert_eq!(
            HourOfDay::new(24).unwrap_err(),
            CalendarError::InvalidHour { hour: 24 }
        );
        assert_eq!(
            HourOfDay::new(-1).unwrap_err(),
            CalendarError::InvalidHour { hour: -1 }
        );
        assert_eq!(
            DayOfYear::new(70_000).unwrap_err(),
            CalendarError::InvalidDayOfYear { doy: 70_000 }
        );
    }

    #[test]
    fn of_timestamp() {
        assert_eq!(DayOfYear::of(at(2021, 1, 1, 0)).get(), 1);
        assert_eq!(DayOfYear::of(at(2021, 3, 1, 0)).get(), 60);
        // Leap year shifts March 1 by one.
        assert_eq!(DayOfYear::of(at(2020, 3, 1, 0)).get(), 61);
        assert_eq!(DayOfYear::of(at(2020, 12, 31, 0)).get(), 366);
        assert_eq!(HourOfDay::of(at(2020, 6, 1, 18)).get(), 18);
    }

    #[test]
    fn ord_trait() {
        assert!(DayOfYear::new(1).unwrap() < DayOfYear::new(2).unwrap());
        assert!(HourOfDay::new(6).unwrap() < HourOfDay::new(12).unwrap());
    }
}
