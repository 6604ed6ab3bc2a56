//! Valid-time arithmetic and climatology keys.

use chrono::{NaiveDateTime, TimeDelta};

use crate::doy::{DayOfYear, HourOfDay};
use crate::error::CalendarError;

/// Time at which a forecast applies: `init + lead`.
///
/// # Errors
///
/// Returns [`CalendarError::TimeOverflow`] if the sum leaves chrono's range.
pub fn valid_time(init: NaiveDateTime, lead: TimeDelta) -> Result<NaiveDateTime, CalendarError> {
    init.checked_add_signed(lead)
        .ok_or(CalendarError::TimeOverflow { init, lead })
}

/// Valid times for every `(init, lead)` pair, row-major over `inits`.
pub fn valid_times(
    inits: &[NaiveDateTime],
    leads: &[TimeDelta],
) -> Result<Vec<NaiveDateTime>, CalendarError> {
    let mut out = Vec::with_capacity(inits.len() * leads.len());
    for &init in inits {
        for &lead in leads {
            out.push(valid_time(init, lead)?);
        }
    }
    Ok(out)
}

/// Position in a (day-of-year, hour) climatology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClimatologyKey {
    day_of_year: DayOfYear,
    hour: HourOfDay,
}

impl ClimatologyKey {
    /// Creates a key from its parts.
    pub fn new(day_of_year: DayOfYear, hour: HourOfDay) -> Self {
        Self { day_of_year, hour }
    }

    /// Key of a timestamp.
    pub fn of(time: NaiveDateTime) -> Self {
        Self::new(DayOfYear::of(time), HourOfDay::of(time))
    }

    /// Day-of-year component.
    pub fn day_of_year(self) -> DayOfYear {
        self.day_of_year
    }

    /// Hour component.
    pub fn hour(self) -> HourOfDay {
        self.hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn valid_time_adds_lead() {
        let t = valid_time(midnight(2020, 12, 31), TimeDelta::hours(30)).unwrap();
        assert_eq!(t, midnight(2021, 1, 1) + TimeDelta::hours(6));
    }

    #[test]
    fn valid_time_overflow() {
        let err = valid_time(NaiveDateTime::MAX, TimeDelta::hours(1)).unwrap_err();
        assert!(matches!(err, CalendarError::TimeOverflow { .. }));
    }

    #[test]
    fn valid_times_row_major() {
        let inits = [midnight(2020, 1, 1), midnight(2020, 1, 2)];
        let leads = [TimeDelta::zero(), TimeDelta::hours(6)];
        let times = valid_times(&inits, &leads).unwrap();
        assert_eq!(times.len(), 4);
        assert_eq!(times[1], midnight(2020, 1, 1) + TimeDelta::hours(6));
        assert_eq!(times[2], midnight(2020, 1, 2));
    }

    #[test]
    fn key_of_timestamp() {
        let key = ClimatologyKey::of(midnight(2020, 2, 1) + TimeDelta::hours(12));
        assert_eq!(key.day_of_year().get(), 32);
        assert_eq!(key.hour().get(), 12);
    }
}
