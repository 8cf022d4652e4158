//! Weekdays and day sets

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Day of the week, Sunday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun = 0,
    Mon = 1,
    Tue = 2,
    Wed = 3,
    Thu = 4,
    Fri = 5,
    Sat = 6,
}

impl Weekday {
    /// All days in canonical (Sunday-first) order
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Wire token (`sun`, `mon`, ...)
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        }
    }

    /// Three-letter label (`Sun`, `Mon`, ...)
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }

    #[must_use]
    pub fn full_name(self) -> &'static str {
        match self {
            Weekday::Sun => "Sunday",
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
        }
    }
}

impl FromStr for Weekday {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::InvalidWeekday(s.to_string()))
    }
}

/// A set of weekdays
///
/// Membership only: insertion order and duplicates never matter, and
/// iteration always yields days in canonical order. Serialized as a list
/// of day tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);
    /// Monday through Friday
    pub const WEEKDAYS: DaySet = DaySet(0b0011_1110);
    /// Saturday and Sunday
    pub const WEEKENDS: DaySet = DaySet(0b0100_0001);
    pub const EVERYDAY: DaySet = DaySet(0b0111_1111);

    #[must_use]
    pub fn new() -> Self {
        Self::EMPTY
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= day.bit();
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !day.bit();
    }

    /// Flip membership of a single day (weekday picker behaviour)
    pub fn toggle(&mut self, day: Weekday) {
        self.0 ^= day.bit();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Days in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(|day| self.contains(*day))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<Vec<Weekday>> for DaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<DaySet> for Vec<Weekday> {
    fn from(set: DaySet) -> Self {
        set.iter().collect()
    }
}
