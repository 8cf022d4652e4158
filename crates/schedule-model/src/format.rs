//! Display formatting for schedule summaries

use crate::days::DaySet;
use crate::mode::{ScheduleMode, DEFAULT_AUTO_COOL_TEMP, DEFAULT_AUTO_HEAT_TEMP};
use crate::schedule::Schedule;
use crate::time::TimeOfDay;
use serde::Serialize;

/// Presentation tone of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Neutral,
    Cool,
    Heat,
    Auto,
}

/// Headline describing what a schedule does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLabel {
    pub text: String,
    pub tone: StatusTone,
}

/// Summarize a day set (`Weekdays`, `Mon, Wed, Fri`, ...)
#[must_use]
pub fn format_days(days: &DaySet) -> String {
    if days.is_empty() {
        return "No days selected".to_string();
    }
    if *days == DaySet::EVERYDAY {
        return "Everyday".to_string();
    }
    if *days == DaySet::WEEKDAYS {
        return "Weekdays".to_string();
    }
    if *days == DaySet::WEEKENDS {
        return "Weekends".to_string();
    }

    days.iter()
        .map(|day| day.short_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a time as `H:MM AM`, or `No time set`
#[must_use]
pub fn format_time(time: &TimeOfDay) -> String {
    let (Some(hour), Some(minute)) = (time.hour, time.minute) else {
        return "No time set".to_string();
    };

    match time.period {
        Some(period) => format!("{}:{:02} {}", hour.get(), minute.value(), period),
        None => format!("{}:{:02}", hour.get(), minute.value()),
    }
}

/// Status headline for a schedule
#[must_use]
pub fn format_status(schedule: &Schedule) -> StatusLabel {
    let Some(mode) = schedule.mode else {
        return StatusLabel {
            text: "NO MODE SELECTED".to_string(),
            tone: StatusTone::Neutral,
        };
    };

    match mode {
        ScheduleMode::Off => StatusLabel {
            text: "OFF".to_string(),
            tone: StatusTone::Neutral,
        },
        ScheduleMode::Cool | ScheduleMode::Heat => {
            let tone = if mode == ScheduleMode::Cool {
                StatusTone::Cool
            } else {
                StatusTone::Heat
            };
            let text = match schedule.temperature {
                Some(temp) => format!("{} TO {temp}°", mode.label()),
                None => mode.label().to_string(),
            };
            StatusLabel { text, tone }
        }
        ScheduleMode::Auto => {
            let heat = schedule.heat_temp.unwrap_or(DEFAULT_AUTO_HEAT_TEMP);
            let cool = schedule.cool_temp.unwrap_or(DEFAULT_AUTO_COOL_TEMP);
            StatusLabel {
                text: format!("AUTO {heat}-{cool}°"),
                tone: StatusTone::Auto,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::days::Weekday;
    use crate::schedule::ScheduleId;

    #[test]
    fn test_format_days_named_sets() {
        assert_eq!(format_days(&DaySet::EMPTY), "No days selected");
        assert_eq!(format_days(&DaySet::EVERYDAY), "Everyday");
        assert_eq!(format_days(&DaySet::WEEKDAYS), "Weekdays");
        assert_eq!(format_days(&DaySet::WEEKENDS), "Weekends");
    }

    #[test]
    fn test_format_days_canonical_order() {
        let days: DaySet = [Weekday::Fri, Weekday::Sun, Weekday::Wed].into_iter().collect();
        assert_eq!(format_days(&days), "Sun, Wed, Fri");

        // Six days is not "Everyday"
        let mut almost = DaySet::EVERYDAY;
        almost.remove(Weekday::Sat);
        assert_eq!(format_days(&almost), "Sun, Mon, Tue, Wed, Thu, Fri");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(&TimeOfDay::UNSET), "No time set");
        assert_eq!(format_time(&TimeOfDay::parse("08:00 AM").unwrap()), "8:00 AM");
        assert_eq!(format_time(&TimeOfDay::parse("12:45 PM").unwrap()), "12:45 PM");

        let mut hour_only = TimeOfDay::UNSET;
        hour_only.set_hour(Some(crate::time::Hour::new(3).unwrap()));
        assert_eq!(format_time(&hour_only), "No time set");
    }

    #[test]
    fn test_format_status() {
        let mut schedule = Schedule::new(ScheduleId::from("s1"));
        assert_eq!(format_status(&schedule).text, "NO MODE SELECTED");

        schedule.select_mode(Some(ScheduleMode::Cool));
        let status = format_status(&schedule);
        assert_eq!(status.text, "COOL TO 73°");
        assert_eq!(status.tone, StatusTone::Cool);

        schedule.temperature = None;
        schedule.mode = Some(ScheduleMode::Heat);
        assert_eq!(format_status(&schedule).text, "HEAT");

        schedule.select_mode(Some(ScheduleMode::Heat));
        assert_eq!(format_status(&schedule).text, "HEAT TO 68°");

        schedule.select_mode(Some(ScheduleMode::Auto));
        schedule.cool_temp = Some(78);
        assert_eq!(format_status(&schedule).text, "AUTO 68-78°");

        schedule.select_mode(Some(ScheduleMode::Off));
        assert_eq!(format_status(&schedule).text, "OFF");
    }
}
