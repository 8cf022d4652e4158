//! Error types for schedule editing

use crate::rules::SaveBlocker;
use schedule_model::{ModelError, ScheduleMode, SetpointField};
use thiserror::Error;

/// Rejected edits and lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Schedule not found
    #[error("Schedule not found: {0}")]
    NotFound(String),

    /// Away mode suppresses every interactive edit
    #[error("Away mode is active")]
    AwayModeActive,

    /// Incomplete schedules cannot be enabled or disabled
    #[error("Schedule is incomplete")]
    Incomplete,

    /// A conflicting event blocks enabling
    #[error("Schedule conflicts with an existing event")]
    Conflict,

    /// Conflicting event without a complete time of day
    #[error("Conflicting event needs a complete time")]
    ConflictTimeIncomplete,

    /// Save gate is closed
    #[error("Schedule cannot be saved: {0}")]
    NotSavable(SaveBlocker),

    /// Setpoint outside the allowed range for the active mode
    #[error("{field} setpoint {value}° is outside {min}-{max}°")]
    SetpointOutOfRange {
        field: SetpointField,
        value: i32,
        min: i32,
        max: i32,
    },

    /// The active mode has no such setpoint
    #[error("No {field} setpoint in mode {}", mode_label(.mode))]
    NoSetpoint {
        mode: Option<ScheduleMode>,
        field: SetpointField,
    },

    /// Invalid raw value
    #[error("Invalid value: {0}")]
    Model(#[from] ModelError),
}

fn mode_label(mode: &Option<ScheduleMode>) -> &'static str {
    mode.map_or("unset", ScheduleMode::label)
}
