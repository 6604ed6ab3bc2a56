//! Error types for the tempest-calendar crate.

use chrono::{NaiveDateTime, TimeDelta};

/// Error type for all fallible operations in the tempest-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range 1..=366.
    #[error("invalid day of year: {doy} (must be 1..=366)")]
    InvalidDayOfYear {
        /// The invalid day-of-year value that was provided.
        doy: i64,
    },

    /// Returned when an hour is outside the valid range 0..=23.
    #[error("invalid hour: {hour} (must be 0..=23)")]
    InvalidHour {
        /// The invalid hour that was provided.
        hour: i64,
    },

    /// Returned when adding a lead time to an initialisation time overflows.
    #[error("valid time overflows: {init} + {lead}")]
    TimeOverflow {
        /// Initialisation time.
        init: NaiveDateTime,
        /// Lead time.
        lead: TimeDelta,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_day_of_year() {
        let err = CalendarError::InvalidDayOfYear { doy: 0 };
        assert_eq!(err.to_string(), "invalid day of year: 0 (must be 1..=366)");
    }

    #[test]
    fn error_invalid_hour() {
        let err = CalendarError::InvalidHour { hour: 24 };
        assert_eq!(err.to_string(), "invalid hour: 24 (must be 0..=23)");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_partial_eq() {
        let a = CalendarError::InvalidHour { hour: 30 };
        let b = CalendarError::InvalidHour { hour: 30 };
        assert_eq!(a, b);
        assert_ne!(a, CalendarError::InvalidHour { hour: 31 });
    }
}
