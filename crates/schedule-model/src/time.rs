//! Time-of-day value object (12-hour clock, quarter-hour minutes)

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hour on a 12-hour clock (1-12), serialized as a two-digit string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hour(u8);

impl Hour {
    /// Create an hour, rejecting anything outside 1-12
    pub fn new(value: u8) -> Result<Self, ModelError> {
        if (1..=12).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::InvalidHour(value.to_string()))
        }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl FromStr for Hour {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| ModelError::InvalidHour(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<String> for Hour {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hour> for String {
    fn from(hour: Hour) -> Self {
        format!("{:02}", hour.0)
    }
}

/// Minute of the hour, restricted to quarter hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Minute {
    Zero,
    Fifteen,
    Thirty,
    FortyFive,
}

impl Minute {
    /// Create a minute from its numeric value
    pub fn new(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Minute::Zero),
            15 => Ok(Minute::Fifteen),
            30 => Ok(Minute::Thirty),
            45 => Ok(Minute::FortyFive),
            _ => Err(ModelError::InvalidMinute(value.to_string())),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Minute::Zero => 0,
            Minute::Fifteen => 15,
            Minute::Thirty => 30,
            Minute::FortyFive => 45,
        }
    }
}

impl FromStr for Minute {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| ModelError::InvalidMinute(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<String> for Minute {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Minute> for String {
    fn from(minute: Minute) -> Self {
        format!("{:02}", minute.value())
    }
}

/// AM/PM half of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    /// The other half of the day
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Period::Am => Period::Pm,
            Period::Pm => Period::Am,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Am => f.write_str("AM"),
            Period::Pm => f.write_str("PM"),
        }
    }
}

impl FromStr for Period {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Period::Am),
            "PM" => Ok(Period::Pm),
            _ => Err(ModelError::InvalidPeriod(s.to_string())),
        }
    }
}

/// A time of day where each component may still be unset while editing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    #[serde(default)]
    pub hour: Option<Hour>,
    #[serde(default)]
    pub minute: Option<Minute>,
    #[serde(default)]
    pub period: Option<Period>,
}

impl TimeOfDay {
    /// A time with nothing selected
    pub const UNSET: TimeOfDay = TimeOfDay {
        hour: None,
        minute: None,
        period: None,
    };

    /// A fully specified time
    #[must_use]
    pub fn new(hour: Hour, minute: Minute, period: Period) -> Self {
        Self {
            hour: Some(hour),
            minute: Some(minute),
            period: Some(period),
        }
    }

    /// Hour and minute are both selected
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.hour.is_some() && self.minute.is_some()
    }

    /// Hour, minute and period are all selected
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_set() && self.period.is_some()
    }

    /// Nothing selected at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hour.is_none() && self.minute.is_none() && self.period.is_none()
    }

    /// Select an hour; the period falls back to AM when still unset
    pub fn set_hour(&mut self, hour: Option<Hour>) {
        self.hour = hour;
        if hour.is_some() && self.period.is_none() {
            self.period = Some(Period::Am);
        }
    }

    /// Select a minute; the period falls back to AM when still unset
    pub fn set_minute(&mut self, minute: Option<Minute>) {
        self.minute = minute;
        if minute.is_some() && self.period.is_none() {
            self.period = Some(Period::Am);
        }
    }

    pub fn set_period(&mut self, period: Option<Period>) {
        self.period = period;
    }

    /// Flip AM/PM; an unset period becomes AM
    pub fn toggle_period(&mut self) {
        self.period = Some(self.period.map_or(Period::Am, Period::flipped));
    }

    /// Reset every component to unset
    pub fn clear(&mut self) {
        *self = Self::UNSET;
    }

    /// Apply the AM default to a value received as a whole
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if (self.hour.is_some() || self.minute.is_some()) && self.period.is_none() {
            self.period = Some(Period::Am);
        }
        self
    }

    /// Parse a time such as `8:15 PM` or `08:00 am`
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let mut parts = s.split_whitespace();
        let clock = parts
            .next()
            .ok_or_else(|| ModelError::InvalidTimeFormat(s.to_string()))?;
        let period = parts.next().map(str::parse::<Period>).transpose()?;
        if parts.next().is_some() {
            return Err(ModelError::InvalidTimeFormat(s.to_string()));
        }

        let (hour, minute) = clock
            .split_once(':')
            .ok_or_else(|| ModelError::InvalidTimeFormat(s.to_string()))?;

        Ok(Self {
            hour: Some(hour.parse()?),
            minute: Some(minute.parse()?),
            period,
        }
        .normalized())
    }
}
