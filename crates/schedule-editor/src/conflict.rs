//! Warning text for a conflicting calendar event

use schedule_model::{format_time, ConflictDescriptor, Weekday};

/// Render the inline warning shown while a conflict blocks saving
///
/// `Monday and Friday have an event scheduled at 8:00 AM. ...`
#[must_use]
pub fn format_conflict(conflict: &ConflictDescriptor) -> String {
    let names: Vec<&str> = conflict.days.iter().map(Weekday::full_name).collect();
    let time = format_time(&conflict.time);

    let lead = match names.as_slice() {
        [] => return format!("An event is scheduled at {time}. {FOLLOW_UP}"),
        [only] => format!("{only} has"),
        [first, second] => format!("{first} and {second} have"),
        [rest @ .., last] => format!("{}, and {last} have", rest.join(", ")),
    };

    format!("{lead} an event scheduled at {time}. {FOLLOW_UP}")
}

const FOLLOW_UP: &str = "Please select a different time to continue.";
