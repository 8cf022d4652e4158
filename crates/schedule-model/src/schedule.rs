//! The schedule entity and the typed updates that edit it

use crate::days::{DaySet, Weekday};
use crate::mode::{
    FanMode, ScheduleMode, SetpointField, DEFAULT_AUTO_COOL_TEMP, DEFAULT_AUTO_HEAT_TEMP,
    DEFAULT_COOL_TEMP, DEFAULT_HEAT_TEMP,
};
use crate::time::{Hour, Minute, Period, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable schedule identifier assigned by the container
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl From<String> for ScheduleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ScheduleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A thermostat schedule rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Container-assigned identifier, never reassigned
    pub id: ScheduleId,
    #[serde(default)]
    pub mode: Option<ScheduleMode>,
    /// Single setpoint for heat and cool modes
    #[serde(default)]
    pub temperature: Option<i32>,
    /// Heat setpoint for auto mode
    #[serde(default)]
    pub heat_temp: Option<i32>,
    /// Cool setpoint for auto mode
    #[serde(default)]
    pub cool_temp: Option<i32>,
    #[serde(default)]
    pub days: DaySet,
    #[serde(default)]
    pub time: TimeOfDay,
    #[serde(default)]
    pub fan_mode: Option<FanMode>,
    /// Active (true) or paused (false)
    #[serde(default)]
    pub enabled: bool,
    /// Has been committed at least once
    #[serde(default)]
    pub saved: bool,
    /// Saved schedule with uncommitted edits
    #[serde(default)]
    pub is_draft: bool,
}

impl Schedule {
    /// A fresh, unsaved schedule with nothing selected
    #[must_use]
    pub fn new(id: ScheduleId) -> Self {
        Self {
            id,
            mode: None,
            temperature: None,
            heat_temp: None,
            cool_temp: None,
            days: DaySet::EMPTY,
            time: TimeOfDay::UNSET,
            fan_mode: None,
            enabled: true,
            saved: false,
            is_draft: false,
        }
    }

    /// Mode, days, a complete time and a fan mode are all chosen
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.mode.is_some()
            && !self.days.is_empty()
            && self.time.is_complete()
            && self.fan_mode.is_some()
    }

    /// Whether any editable field differs from `snapshot`
    ///
    /// `enabled` is an immediate action and never counts, nor do the
    /// bookkeeping flags.
    #[must_use]
    pub fn differs_from(&self, snapshot: &Schedule) -> bool {
        self.mode != snapshot.mode
            || self.temperature != snapshot.temperature
            || self.heat_temp != snapshot.heat_temp
            || self.cool_temp != snapshot.cool_temp
            || self.days != snapshot.days
            || self.time != snapshot.time
            || self.fan_mode != snapshot.fan_mode
    }

    #[must_use]
    pub fn setpoint(&self, field: SetpointField) -> Option<i32> {
        match field {
            SetpointField::Temperature => self.temperature,
            SetpointField::Heat => self.heat_temp,
            SetpointField::Cool => self.cool_temp,
        }
    }

    pub fn set_setpoint(&mut self, field: SetpointField, value: Option<i32>) {
        match field {
            SetpointField::Temperature => self.temperature = value,
            SetpointField::Heat => self.heat_temp = value,
            SetpointField::Cool => self.cool_temp = value,
        }
    }

    /// Select a mode, seeding defaults for setpoints that are still unset
    ///
    /// Explicit values are never overwritten. `Off` clears the single
    /// setpoint and leaves the auto pair alone.
    pub fn select_mode(&mut self, mode: Option<ScheduleMode>) {
        self.mode = mode;
        match mode {
            Some(ScheduleMode::Cool) => {
                self.temperature.get_or_insert(DEFAULT_COOL_TEMP);
            }
            Some(ScheduleMode::Heat) => {
                self.temperature.get_or_insert(DEFAULT_HEAT_TEMP);
            }
            Some(ScheduleMode::Auto) => {
                self.heat_temp.get_or_insert(DEFAULT_AUTO_HEAT_TEMP);
                self.cool_temp.get_or_insert(DEFAULT_AUTO_COOL_TEMP);
            }
            Some(ScheduleMode::Off) => self.temperature = None,
            None => {}
        }
    }

    /// Merge a single field update into this schedule
    ///
    /// No validation happens here; bounds are enforced by the editor.
    pub fn apply(&mut self, update: &ScheduleUpdate) {
        match update {
            ScheduleUpdate::Mode(mode) => self.select_mode(*mode),
            ScheduleUpdate::Temperature(value) => self.temperature = *value,
            ScheduleUpdate::HeatTemp(value) => self.heat_temp = *value,
            ScheduleUpdate::CoolTemp(value) => self.cool_temp = *value,
            ScheduleUpdate::Days(days) => self.days = *days,
            ScheduleUpdate::ToggleDay(day) => self.days.toggle(*day),
            ScheduleUpdate::Time(time) => self.time = time.normalized(),
            ScheduleUpdate::Hour(hour) => self.time.set_hour(*hour),
            ScheduleUpdate::Minute(minute) => self.time.set_minute(*minute),
            ScheduleUpdate::Period(period) => self.time.set_period(*period),
            ScheduleUpdate::TogglePeriod => self.time.toggle_period(),
            ScheduleUpdate::ClearTime => self.time.clear(),
            ScheduleUpdate::FanMode(fan_mode) => self.fan_mode = *fan_mode,
            ScheduleUpdate::Enabled(enabled) => self.enabled = *enabled,
        }
    }
}

/// A single field edit
///
/// Wire form: `{"field": "mode", "value": "cool"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ScheduleUpdate {
    Mode(Option<ScheduleMode>),
    Temperature(Option<i32>),
    HeatTemp(Option<i32>),
    CoolTemp(Option<i32>),
    Days(DaySet),
    ToggleDay(Weekday),
    Time(TimeOfDay),
    Hour(Option<Hour>),
    Minute(Option<Minute>),
    Period(Option<Period>),
    TogglePeriod,
    ClearTime,
    FanMode(Option<FanMode>),
    Enabled(bool),
}

impl ScheduleUpdate {
    /// Enable/disable edits apply immediately and never enter draft state
    #[must_use]
    pub fn is_enabled_only(&self) -> bool {
        matches!(self, ScheduleUpdate::Enabled(_))
    }

    /// The setpoint this update writes directly, if any
    #[must_use]
    pub fn setpoint_write(&self) -> Option<(SetpointField, i32)> {
        match self {
            ScheduleUpdate::Temperature(Some(v)) => Some((SetpointField::Temperature, *v)),
            ScheduleUpdate::HeatTemp(Some(v)) => Some((SetpointField::Heat, *v)),
            ScheduleUpdate::CoolTemp(Some(v)) => Some((SetpointField::Cool, *v)),
            _ => None,
        }
    }
}

/// Another commitment colliding with a schedule, supplied from outside
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDescriptor {
    pub days: DaySet,
    pub time: TimeOfDay,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_cool() -> Schedule {
        let mut schedule = Schedule::new(ScheduleId::from("s1"));
        schedule.select_mode(Some(ScheduleMode::Cool));
        schedule.days = [Weekday::Mon, Weekday::Wed, Weekday::Fri].into_iter().collect();
        schedule.time = TimeOfDay::parse("8:00 AM").unwrap();
        schedule.fan_mode = Some(FanMode::Auto);
        schedule
    }

    #[test]
    fn test_new_schedule_is_incomplete() {
        let schedule = Schedule::new(ScheduleId::generate());
        assert!(!schedule.is_complete());
        assert!(schedule.enabled);
        assert!(!schedule.saved);
    }

    #[test]
    fn test_completeness_requires_every_field() {
        assert!(complete_cool().is_complete());

        let mut no_days = complete_cool();
        no_days.days = DaySet::EMPTY;
        assert!(!no_days.is_complete());

        let mut no_fan = complete_cool();
        no_fan.fan_mode = None;
        assert!(!no_fan.is_complete());

        let mut partial_time = complete_cool();
        partial_time.time.minute = None;
        assert!(!partial_time.is_complete());

        let mut no_period = complete_cool();
        no_period.time.period = None;
        assert!(!no_period.is_complete());
    }

    #[test]
    fn test_mode_seeds_defaults_without_overwriting() {
        let mut schedule = Schedule::new(ScheduleId::from("s1"));
        schedule.select_mode(Some(ScheduleMode::Cool));
        assert_eq!(schedule.temperature, Some(73));

        schedule.temperature = Some(80);
        schedule.select_mode(Some(ScheduleMode::Heat));
        assert_eq!(schedule.temperature, Some(80));

        schedule.select_mode(Some(ScheduleMode::Auto));
        assert_eq!(schedule.heat_temp, Some(68));
        assert_eq!(schedule.cool_temp, Some(75));

        schedule.select_mode(Some(ScheduleMode::Off));
        assert_eq!(schedule.temperature, None);
        assert_eq!(schedule.heat_temp, Some(68));
    }

    #[test]
    fn test_heat_default() {
        let mut schedule = Schedule::new(ScheduleId::from("s1"));
        schedule.select_mode(Some(ScheduleMode::Heat));
        assert_eq!(schedule.temperature, Some(68));
    }

    #[test]
    fn test_differs_from_ignores_enabled_and_flags() {
        let snapshot = complete_cool();
        let mut live = snapshot.clone();
        live.enabled = false;
        live.saved = true;
        live.is_draft = true;
        assert!(!live.differs_from(&snapshot));

        live.apply(&ScheduleUpdate::Temperature(Some(74)));
        assert!(live.differs_from(&snapshot));
    }

    #[test]
    fn test_apply_time_updates() {
        let mut schedule = Schedule::new(ScheduleId::from("s1"));
        schedule.apply(&ScheduleUpdate::Hour(Some(Hour::new(7).unwrap())));
        assert_eq!(schedule.time.period, Some(Period::Am));
        schedule.apply(&ScheduleUpdate::TogglePeriod);
        assert_eq!(schedule.time.period, Some(Period::Pm));
        schedule.apply(&ScheduleUpdate::ClearTime);
        assert_eq!(schedule.time, TimeOfDay::UNSET);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(complete_cool()).unwrap();
        assert_eq!(json["fanMode"], "auto");
        assert_eq!(json["isDraft"], false);
        assert_eq!(json["days"], serde_json::json!(["mon", "wed", "fri"]));
        assert_eq!(json["time"]["hour"], "08");
    }

    #[test]
    fn test_update_wire_form() {
        let update: ScheduleUpdate =
            serde_json::from_str(r#"{"field":"mode","value":"cool"}"#).unwrap();
        assert_eq!(update, ScheduleUpdate::Mode(Some(ScheduleMode::Cool)));

        let update: ScheduleUpdate =
            serde_json::from_str(r#"{"field":"toggle_day","value":"sat"}"#).unwrap();
        assert_eq!(update, ScheduleUpdate::ToggleDay(Weekday::Sat));

        let update: ScheduleUpdate = serde_json::from_str(r#"{"field":"clear_time"}"#).unwrap();
        assert_eq!(update, ScheduleUpdate::ClearTime);

        assert!(serde_json::from_str::<ScheduleUpdate>(r#"{"field":"colour","value":1}"#).is_err());
        assert!(ScheduleUpdate::Enabled(false).is_enabled_only());
    }
}
