//! Editing rules: completeness, dirtiness and the save/enable gates
//!
//! Everything here is a pure function of the live schedule, its last
//! committed snapshot and the externally supplied conflict.

use crate::error::EditError;
use schedule_model::{
    ConflictDescriptor, Schedule, ScheduleMode, ScheduleUpdate, SetpointBounds, SetpointField,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the save action is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveBlocker {
    /// Schedule is paused
    Disabled,
    /// Mode, days, time or fan mode still missing
    Incomplete,
    /// A setpoint in use lies outside the active mode's range
    SetpointOutOfRange,
    /// A conflicting event exists
    Conflict,
    /// Saved schedule without pending edits
    Unchanged,
}

impl fmt::Display for SaveBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveBlocker::Disabled => f.write_str("schedule is disabled"),
            SaveBlocker::Incomplete => f.write_str("schedule is incomplete"),
            SaveBlocker::SetpointOutOfRange => f.write_str("setpoint is out of range"),
            SaveBlocker::Conflict => f.write_str("schedule has a conflict"),
            SaveBlocker::Unchanged => f.write_str("no changes to save"),
        }
    }
}

/// Direction of a setpoint nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Up,
    Down,
}

impl Step {
    fn delta(self) -> i32 {
        match self {
            Step::Up => 1,
            Step::Down => -1,
        }
    }
}

#[must_use]
pub fn is_complete(schedule: &Schedule) -> bool {
    schedule.is_complete()
}

#[must_use]
pub fn has_conflict(conflict: Option<&ConflictDescriptor>) -> bool {
    conflict.is_some()
}

/// Saved schedule whose editable fields differ from the snapshot
#[must_use]
pub fn is_dirty(schedule: &Schedule, snapshot: Option<&Schedule>) -> bool {
    schedule.saved && snapshot.is_some_and(|snapshot| schedule.differs_from(snapshot))
}

/// First reason the save action is closed, or `None` when saving is allowed
#[must_use]
pub fn save_blocker(
    schedule: &Schedule,
    snapshot: Option<&Schedule>,
    conflict: Option<&ConflictDescriptor>,
) -> Option<SaveBlocker> {
    if !schedule.enabled {
        Some(SaveBlocker::Disabled)
    } else if !is_complete(schedule) {
        Some(SaveBlocker::Incomplete)
    } else if !setpoints_in_range(schedule) {
        Some(SaveBlocker::SetpointOutOfRange)
    } else if has_conflict(conflict) {
        Some(SaveBlocker::Conflict)
    } else if schedule.saved && !is_dirty(schedule, snapshot) {
        Some(SaveBlocker::Unchanged)
    } else {
        None
    }
}

#[must_use]
pub fn can_save(
    schedule: &Schedule,
    snapshot: Option<&Schedule>,
    conflict: Option<&ConflictDescriptor>,
) -> bool {
    save_blocker(schedule, snapshot, conflict).is_none()
}

/// Only complete schedules may be switched on or off
#[must_use]
pub fn can_toggle_enabled(schedule: &Schedule) -> bool {
    is_complete(schedule)
}

/// Switching on additionally requires the absence of a conflict
#[must_use]
pub fn can_enable(schedule: &Schedule, conflict: Option<&ConflictDescriptor>) -> bool {
    can_toggle_enabled(schedule) && !has_conflict(conflict)
}

/// Every setpoint the active mode uses is unset or within its bounds
///
/// Selecting a mode keeps explicit values, so a value written under one
/// mode may fall outside the next mode's range.
#[must_use]
pub fn setpoints_in_range(schedule: &Schedule) -> bool {
    let Some(mode) = schedule.mode else {
        return true;
    };
    mode.setpoint_fields().iter().all(|&field| {
        match (mode.setpoint(field), schedule.setpoint(field)) {
            (Some((bounds, _)), Some(value)) => bounds.contains(value),
            _ => true,
        }
    })
}

/// Reject a setpoint value outside the range of the schedule's mode
///
/// Fields the mode does not use are checked against the union range.
pub fn check_setpoint(
    mode: Option<ScheduleMode>,
    field: SetpointField,
    value: i32,
) -> Result<(), EditError> {
    let bounds = mode
        .and_then(|mode| mode.setpoint(field))
        .map_or(SetpointBounds::ANY, |(bounds, _)| bounds);

    if bounds.contains(value) {
        Ok(())
    } else {
        Err(EditError::SetpointOutOfRange {
            field,
            value,
            min: bounds.min,
            max: bounds.max,
        })
    }
}

/// Merge an update and recompute draft state against the snapshot
///
/// Enable/disable edits apply immediately and leave `is_draft` untouched.
pub fn apply_update(
    schedule: &Schedule,
    snapshot: Option<&Schedule>,
    update: &ScheduleUpdate,
) -> Result<Schedule, EditError> {
    if let Some((field, value)) = update.setpoint_write() {
        check_setpoint(schedule.mode, field, value)?;
    }

    let mut next = schedule.clone();
    next.apply(update);

    if next.saved && !update.is_enabled_only() {
        next.is_draft = is_dirty(&next, snapshot);
    }
    Ok(next)
}

/// Nudge a setpoint by one degree, clamped to the mode's range
///
/// An unset setpoint starts from the mode default.
pub fn adjust_setpoint(
    schedule: &Schedule,
    snapshot: Option<&Schedule>,
    field: SetpointField,
    step: Step,
) -> Result<Schedule, EditError> {
    let (bounds, default) = schedule
        .mode
        .and_then(|mode| mode.setpoint(field))
        .ok_or(EditError::NoSetpoint {
            mode: schedule.mode,
            field,
        })?;

    let current = schedule.setpoint(field).unwrap_or(default);
    let value = bounds.clamp(current + step.delta());

    let update = match field {
        SetpointField::Temperature => ScheduleUpdate::Temperature(Some(value)),
        SetpointField::Heat => ScheduleUpdate::HeatTemp(Some(value)),
        SetpointField::Cool => ScheduleUpdate::CoolTemp(Some(value)),
    };
    apply_update(schedule, snapshot, &update)
}

/// Mark a schedule saved and clean; returns it with its new snapshot
#[must_use]
pub fn commit(schedule: &Schedule) -> (Schedule, Schedule) {
    let mut committed = schedule.clone();
    committed.saved = true;
    committed.is_draft = false;
    let snapshot = committed.clone();
    (committed, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_model::{DaySet, FanMode, ScheduleId, TimeOfDay, Weekday};

    fn blank() -> Schedule {
        let mut schedule = Schedule::new(ScheduleId::from("s1"));
        schedule.enabled = false;
        schedule
    }

    /// Walk a blank schedule through the edits of a typical first save
    fn savable() -> Schedule {
        let mut schedule = blank();
        for update in [
            ScheduleUpdate::Mode(Some(ScheduleMode::Cool)),
            ScheduleUpdate::Days([Weekday::Mon, Weekday::Wed, Weekday::Fri].into_iter().collect()),
            ScheduleUpdate::Time(TimeOfDay::parse("08:00 AM").unwrap()),
            ScheduleUpdate::FanMode(Some(FanMode::Auto)),
            ScheduleUpdate::Enabled(true),
        ] {
            schedule = apply_update(&schedule, None, &update).unwrap();
        }
        schedule
    }

    fn conflict() -> ConflictDescriptor {
        ConflictDescriptor {
            days: [Weekday::Mon].into_iter().collect(),
            time: TimeOfDay::parse("08:00 AM").unwrap(),
        }
    }

    #[test]
    fn test_incomplete_when_any_piece_missing() {
        let base = savable();
        assert!(is_complete(&base));

        let mut no_mode = base.clone();
        no_mode.mode = None;
        assert!(!is_complete(&no_mode));

        let mut no_days = base.clone();
        no_days.days = DaySet::EMPTY;
        assert!(!is_complete(&no_days));

        let mut half_time = base;
        half_time.time.hour = None;
        assert!(!is_complete(&half_time));
    }

    #[test]
    fn test_unsaved_is_never_dirty() {
        let schedule = savable();
        let mut other = schedule.clone();
        other.temperature = Some(80);
        assert!(!is_dirty(&schedule, None));
        // Even a stray snapshot does not make an unsaved schedule dirty
        assert!(!is_dirty(&schedule, Some(&other)));
    }

    #[test]
    fn test_disabled_blocks_save() {
        let mut schedule = savable();
        schedule.enabled = false;
        assert_eq!(
            save_blocker(&schedule, None, None),
            Some(SaveBlocker::Disabled)
        );
        assert!(!can_save(&schedule, None, None));
    }

    #[test]
    fn test_conflict_blocks_save_even_when_dirty() {
        let (saved, snapshot) = commit(&savable());
        let edited = apply_update(&saved, Some(&snapshot), &ScheduleUpdate::Temperature(Some(74)))
            .unwrap();
        assert!(is_dirty(&edited, Some(&snapshot)));
        assert!(can_save(&edited, Some(&snapshot), None));

        let conflict = conflict();
        assert!(has_conflict(Some(&conflict)));
        assert_eq!(
            save_blocker(&edited, Some(&snapshot), Some(&conflict)),
            Some(SaveBlocker::Conflict)
        );
    }

    #[test]
    fn test_commit_twice_is_blocked_second_time() {
        let (saved, snapshot) = commit(&savable());
        assert!(saved.saved);
        assert!(!saved.is_draft);
        assert_eq!(
            save_blocker(&saved, Some(&snapshot), None),
            Some(SaveBlocker::Unchanged)
        );
    }

    #[test]
    fn test_update_then_commit_leaves_clean_snapshot() {
        let (saved, snapshot) = commit(&savable());
        let edited =
            apply_update(&saved, Some(&snapshot), &ScheduleUpdate::ToggleDay(Weekday::Sat))
                .unwrap();
        let (committed, snapshot) = commit(&edited);
        assert_eq!(committed, snapshot);
        assert!(!is_dirty(&committed, Some(&snapshot)));
    }

    #[test]
    fn test_scenario_a_new_schedule() {
        let schedule = blank();
        assert!(!is_complete(&schedule));
        assert!(!can_save(&schedule, None, None));
        assert!(!can_toggle_enabled(&schedule));
    }

    #[test]
    fn test_scenario_b_first_save() {
        let schedule = savable();
        assert_eq!(schedule.temperature, Some(73));
        assert!(is_complete(&schedule));
        assert!(can_save(&schedule, None, None));

        let (saved, snapshot) = commit(&schedule);
        assert!(saved.saved);
        assert!(!saved.is_draft);
        assert_eq!(snapshot, saved);
    }

    #[test]
    fn test_scenario_c_edit_and_revert() {
        let (saved, snapshot) = commit(&savable());

        let warmer =
            apply_update(&saved, Some(&snapshot), &ScheduleUpdate::Temperature(Some(74))).unwrap();
        assert!(warmer.is_draft);
        assert!(can_save(&warmer, Some(&snapshot), None));

        let reverted =
            apply_update(&warmer, Some(&snapshot), &ScheduleUpdate::Temperature(Some(73))).unwrap();
        assert!(!reverted.is_draft);
        assert!(!can_save(&reverted, Some(&snapshot), None));
    }

    #[test]
    fn test_scenario_e_disable_does_not_enter_draft() {
        let (saved, snapshot) = commit(&savable());
        let paused = apply_update(&saved, Some(&snapshot), &ScheduleUpdate::Enabled(false)).unwrap();
        assert!(!paused.is_draft);
        assert_eq!(
            save_blocker(&paused, Some(&snapshot), None),
            Some(SaveBlocker::Disabled)
        );
    }

    #[test]
    fn test_enabled_edit_keeps_existing_draft() {
        let (saved, snapshot) = commit(&savable());
        let edited =
            apply_update(&saved, Some(&snapshot), &ScheduleUpdate::FanMode(Some(FanMode::On)))
                .unwrap();
        assert!(edited.is_draft);
        let paused =
            apply_update(&edited, Some(&snapshot), &ScheduleUpdate::Enabled(false)).unwrap();
        assert!(paused.is_draft);
    }

    #[test]
    fn test_day_order_does_not_make_dirty() {
        let (saved, snapshot) = commit(&savable());
        let reordered = apply_update(
            &saved,
            Some(&snapshot),
            &ScheduleUpdate::Days([Weekday::Fri, Weekday::Wed, Weekday::Mon].into_iter().collect()),
        )
        .unwrap();
        assert!(!reordered.is_draft);
    }

    #[test]
    fn test_conflict_blocks_enable_not_disable() {
        let schedule = savable();
        let conflict = conflict();
        assert!(!can_enable(&schedule, Some(&conflict)));
        assert!(can_toggle_enabled(&schedule));
        assert!(can_enable(&schedule, None));
    }

    #[test]
    fn test_setpoint_bounds_checked_on_write() {
        let schedule = savable();
        let err = apply_update(&schedule, None, &ScheduleUpdate::Temperature(Some(64))).unwrap_err();
        assert_eq!(
            err,
            EditError::SetpointOutOfRange {
                field: SetpointField::Temperature,
                value: 64,
                min: 65,
                max: 90,
            }
        );
        assert!(apply_update(&schedule, None, &ScheduleUpdate::Temperature(Some(90))).is_ok());
    }

    #[test]
    fn test_adjust_clamps_without_wraparound() {
        let mut schedule = savable();
        schedule.temperature = Some(90);
        let up = adjust_setpoint(&schedule, None, SetpointField::Temperature, Step::Up).unwrap();
        assert_eq!(up.temperature, Some(90));

        schedule.mode = Some(ScheduleMode::Heat);
        schedule.temperature = Some(50);
        let down = adjust_setpoint(&schedule, None, SetpointField::Temperature, Step::Down).unwrap();
        assert_eq!(down.temperature, Some(50));

        // Out-of-range carry-over from another mode is pulled back into range
        schedule.temperature = Some(88);
        let down = adjust_setpoint(&schedule, None, SetpointField::Temperature, Step::Down).unwrap();
        assert_eq!(down.temperature, Some(85));
    }

    #[test]
    fn test_setpoint_carried_across_modes_blocks_save() {
        let mut schedule = savable();
        schedule = apply_update(&schedule, None, &ScheduleUpdate::Temperature(Some(90))).unwrap();
        assert!(can_save(&schedule, None, None));

        schedule = apply_update(&schedule, None, &ScheduleUpdate::Mode(Some(ScheduleMode::Heat)))
            .unwrap();
        assert_eq!(schedule.temperature, Some(90));
        assert!(!setpoints_in_range(&schedule));
        assert_eq!(
            save_blocker(&schedule, None, None),
            Some(SaveBlocker::SetpointOutOfRange)
        );

        // Auto checks each half against its own range
        schedule = apply_update(&schedule, None, &ScheduleUpdate::Mode(Some(ScheduleMode::Auto)))
            .unwrap();
        assert!(setpoints_in_range(&schedule));
        schedule.heat_temp = Some(88);
        assert_eq!(
            save_blocker(&schedule, None, None),
            Some(SaveBlocker::SetpointOutOfRange)
        );
    }

    #[test]
    fn test_adjust_auto_pair() {
        let mut schedule = savable();
        schedule = apply_update(&schedule, None, &ScheduleUpdate::Mode(Some(ScheduleMode::Auto)))
            .unwrap();
        let warmer = adjust_setpoint(&schedule, None, SetpointField::Heat, Step::Up).unwrap();
        assert_eq!(warmer.heat_temp, Some(69));
        let cooler = adjust_setpoint(&warmer, None, SetpointField::Cool, Step::Down).unwrap();
        assert_eq!(cooler.cool_temp, Some(74));

        let err = adjust_setpoint(&schedule, None, SetpointField::Temperature, Step::Up).unwrap_err();
        assert!(matches!(err, EditError::NoSetpoint { .. }));
    }

    #[test]
    fn test_adjust_unset_starts_from_default() {
        let mut schedule = blank();
        schedule.mode = Some(ScheduleMode::Cool);
        let up = adjust_setpoint(&schedule, None, SetpointField::Temperature, Step::Up).unwrap();
        assert_eq!(up.temperature, Some(74));
    }

    #[test]
    fn test_adjust_in_off_mode_fails() {
        let mut schedule = blank();
        schedule.mode = Some(ScheduleMode::Off);
        assert!(adjust_setpoint(&schedule, None, SetpointField::Temperature, Step::Up).is_err());
    }
}
