//! # tempest-calendar
//!
//! Calendar arithmetic for climatology lookups.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["init_time"] -->|"valid_time(init, lead)"| B["valid time"]
//!     L["lead_time"] --> B
//!     B -->|"ClimatologyKey::of()"| C["(DayOfYear, HourOfDay)"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::{NaiveDate, TimeDelta};
//! use tempest_calendar::{ClimatologyKey, valid_time};
//!
//! let init = NaiveDate::from_ymd_opt(2020, 2, 28).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let valid = valid_time(init, TimeDelta::hours(24)).unwrap(); // Feb 29, 12 UTC
//! let key = ClimatologyKey::of(valid);
//! assert_eq!(key.day_of_year().get(), 60);
//! assert_eq!(key.hour().get(), 12);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Day-of-year and hour-of-day newtypes |
//! | `valid_time` | Valid-time arithmetic and climatology keys |
//! | `error` | Error types |

mod doy;
mod error;
mod valid_time;

pub use doy::{DayOfYear, HourOfDay};
pub use error::CalendarError;
pub use valid_time::{ClimatologyKey, valid_time, valid_times};
