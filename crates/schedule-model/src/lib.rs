//! Schedule data model for thermostat schedules
//!
//! Value objects (time of day, day sets, modes), the schedule entity,
//! typed field updates and the display formatters shared by the editor
//! and the API.

pub mod days;
pub mod error;
pub mod format;
pub mod mode;
pub mod schedule;
pub mod time;

pub use days::{DaySet, Weekday};
pub use error::ModelError;
pub use format::{format_days, format_status, format_time, StatusLabel, StatusTone};
pub use mode::{FanMode, ScheduleMode, SetpointBounds, SetpointField};
pub use schedule::{ConflictDescriptor, Schedule, ScheduleId, ScheduleUpdate};
pub use time::{Hour, Minute, Period, TimeOfDay};
