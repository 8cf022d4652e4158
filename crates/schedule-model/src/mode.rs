//! Climate and fan modes, setpoint fields and their bounds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Climate mode of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    Off,
    Heat,
    Cool,
    /// Keep the temperature between a heat and a cool setpoint
    Auto,
}

/// Fan behaviour while the schedule is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    Auto,
    On,
}

/// Which setpoint a temperature edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetpointField {
    /// Single setpoint used by heat and cool modes
    Temperature,
    /// Heat half of the auto pair
    Heat,
    /// Cool half of the auto pair
    Cool,
}

/// Inclusive setpoint range in °F
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetpointBounds {
    pub min: i32,
    pub max: i32,
}

impl SetpointBounds {
    pub const HEAT: SetpointBounds = SetpointBounds { min: 50, max: 85 };
    pub const COOL: SetpointBounds = SetpointBounds { min: 65, max: 90 };
    /// Union of the heat and cool ranges
    pub const ANY: SetpointBounds = SetpointBounds { min: 50, max: 90 };

    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

pub const DEFAULT_HEAT_TEMP: i32 = 68;
pub const DEFAULT_COOL_TEMP: i32 = 73;
pub const DEFAULT_AUTO_HEAT_TEMP: i32 = 68;
pub const DEFAULT_AUTO_COOL_TEMP: i32 = 75;

impl ScheduleMode {
    /// Upper-case label used in status lines
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScheduleMode::Off => "OFF",
            ScheduleMode::Heat => "HEAT",
            ScheduleMode::Cool => "COOL",
            ScheduleMode::Auto => "AUTO",
        }
    }

    /// Bounds and default for `field`, or `None` if this mode does not use it
    #[must_use]
    pub fn setpoint(self, field: SetpointField) -> Option<(SetpointBounds, i32)> {
        match (self, field) {
            (ScheduleMode::Heat, SetpointField::Temperature) => {
                Some((SetpointBounds::HEAT, DEFAULT_HEAT_TEMP))
            }
            (ScheduleMode::Cool, SetpointField::Temperature) => {
                Some((SetpointBounds::COOL, DEFAULT_COOL_TEMP))
            }
            (ScheduleMode::Auto, SetpointField::Heat) => {
                Some((SetpointBounds::HEAT, DEFAULT_AUTO_HEAT_TEMP))
            }
            (ScheduleMode::Auto, SetpointField::Cool) => {
                Some((SetpointBounds::COOL, DEFAULT_AUTO_COOL_TEMP))
            }
            _ => None,
        }
    }

    /// Setpoint fields this mode edits
    #[must_use]
    pub fn setpoint_fields(self) -> &'static [SetpointField] {
        match self {
            ScheduleMode::Off => &[],
            ScheduleMode::Heat | ScheduleMode::Cool => &[SetpointField::Temperature],
            ScheduleMode::Auto => &[SetpointField::Heat, SetpointField::Cool],
        }
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SetpointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetpointField::Temperature => f.write_str("temperature"),
            SetpointField::Heat => f.write_str("heat"),
            SetpointField::Cool => f.write_str("cool"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setpoint_per_mode() {
        assert_eq!(
            ScheduleMode::Cool.setpoint(SetpointField::Temperature),
            Some((SetpointBounds::COOL, 73))
        );
        assert_eq!(
            ScheduleMode::Heat.setpoint(SetpointField::Temperature),
            Some((SetpointBounds::HEAT, 68))
        );
        assert_eq!(
            ScheduleMode::Auto.setpoint(SetpointField::Cool),
            Some((SetpointBounds::COOL, 75))
        );
        assert_eq!(ScheduleMode::Auto.setpoint(SetpointField::Temperature), None);
        assert_eq!(ScheduleMode::Off.setpoint(SetpointField::Heat), None);
    }

    #[test]
    fn test_bounds_clamp() {
        assert_eq!(SetpointBounds::HEAT.clamp(49), 50);
        assert_eq!(SetpointBounds::HEAT.clamp(86), 85);
        assert_eq!(SetpointBounds::COOL.clamp(70), 70);
        assert!(!SetpointBounds::COOL.contains(64));
    }
}
