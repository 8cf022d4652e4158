//! Draft/saved state machine for a single schedule

use crate::conflict::format_conflict;
use crate::error::EditError;
use crate::rules::{self, SaveBlocker, Step};
use schedule_model::{
    format_days, format_status, format_time, ConflictDescriptor, Schedule, ScheduleUpdate,
    SetpointField, StatusLabel,
};
use serde::Serialize;
use std::time::Duration;

/// How long the "saved" confirmation stays visible
pub const SUCCESS_NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Lifecycle position of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    /// Never committed
    New,
    /// Committed, no pending edits
    SavedClean,
    /// Committed, with pending edits (draft)
    SavedDirty,
}

#[derive(Debug, Clone, Default)]
struct SuccessNotice {
    visible: bool,
    generation: u64,
}

/// Editing session for one schedule
///
/// Holds the live schedule, the snapshot captured at the last commit,
/// and the container-supplied inputs (conflict, away mode).
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    schedule: Schedule,
    snapshot: Option<Schedule>,
    conflict: Option<ConflictDescriptor>,
    away_mode: bool,
    notice: SuccessNotice,
}

/// Serializable projection of an editor for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub schedule: Schedule,
    pub state: EditorState,
    pub complete: bool,
    pub dirty: bool,
    pub can_save: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_blocker: Option<SaveBlocker>,
    pub can_toggle_enabled: bool,
    pub conflict: Option<ConflictDescriptor>,
    pub conflict_message: Option<String>,
    pub status: StatusLabel,
    pub days_label: String,
    pub time_label: String,
    pub notice_visible: bool,
    pub away_mode: bool,
}

impl ScheduleEditor {
    /// Start editing a schedule
    ///
    /// A schedule that is already saved becomes its own snapshot.
    #[must_use]
    pub fn new(mut schedule: Schedule) -> Self {
        let snapshot = if schedule.saved {
            schedule.is_draft = false;
            Some(schedule.clone())
        } else {
            None
        };

        Self {
            schedule,
            snapshot,
            conflict: None,
            away_mode: false,
            notice: SuccessNotice::default(),
        }
    }

    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Schedule> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn conflict(&self) -> Option<&ConflictDescriptor> {
        self.conflict.as_ref()
    }

    /// Replace the conflicting event; its time must be fully set
    pub fn set_conflict(
        &mut self,
        conflict: Option<ConflictDescriptor>,
    ) -> Result<(), EditError> {
        if conflict.as_ref().is_some_and(|c| !c.time.is_complete()) {
            return Err(EditError::ConflictTimeIncomplete);
        }
        self.conflict = conflict;
        Ok(())
    }

    #[must_use]
    pub fn away_mode(&self) -> bool {
        self.away_mode
    }

    pub fn set_away_mode(&mut self, active: bool) {
        self.away_mode = active;
    }

    #[must_use]
    pub fn state(&self) -> EditorState {
        if !self.schedule.saved {
            EditorState::New
        } else if self.is_dirty() {
            EditorState::SavedDirty
        } else {
            EditorState::SavedClean
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        rules::is_complete(&self.schedule)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        rules::is_dirty(&self.schedule, self.snapshot.as_ref())
    }

    #[must_use]
    pub fn save_blocker(&self) -> Option<SaveBlocker> {
        rules::save_blocker(&self.schedule, self.snapshot.as_ref(), self.conflict.as_ref())
    }

    #[must_use]
    pub fn can_save(&self) -> bool {
        self.save_blocker().is_none()
    }

    #[must_use]
    pub fn can_toggle_enabled(&self) -> bool {
        rules::can_toggle_enabled(&self.schedule)
    }

    #[must_use]
    pub fn notice_visible(&self) -> bool {
        self.notice.visible
    }

    fn ensure_interactive(&self) -> Result<(), EditError> {
        if self.away_mode {
            return Err(EditError::AwayModeActive);
        }
        Ok(())
    }

    /// Apply a single field edit
    pub fn apply(&mut self, update: &ScheduleUpdate) -> Result<(), EditError> {
        self.ensure_interactive()?;

        if let ScheduleUpdate::Enabled(enabled) = update {
            if !self.can_toggle_enabled() {
                return Err(EditError::Incomplete);
            }
            if *enabled && !rules::can_enable(&self.schedule, self.conflict.as_ref()) {
                return Err(EditError::Conflict);
            }
        }

        self.schedule = rules::apply_update(&self.schedule, self.snapshot.as_ref(), update)?;
        Ok(())
    }

    /// Apply several edits in order; on any rejection nothing changes
    pub fn apply_all(&mut self, updates: &[ScheduleUpdate]) -> Result<(), EditError> {
        let mut staged = self.clone();
        for update in updates {
            staged.apply(update)?;
        }
        *self = staged;
        Ok(())
    }

    /// Nudge a setpoint one degree up or down
    pub fn adjust(&mut self, field: SetpointField, step: Step) -> Result<(), EditError> {
        self.ensure_interactive()?;
        self.schedule =
            rules::adjust_setpoint(&self.schedule, self.snapshot.as_ref(), field, step)?;
        Ok(())
    }

    /// Commit the schedule and show the success notice
    ///
    /// Returns the notice generation to pass to [`Self::dismiss_notice`].
    pub fn commit(&mut self) -> Result<u64, EditError> {
        self.ensure_interactive()?;
        if let Some(blocker) = self.save_blocker() {
            return Err(EditError::NotSavable(blocker));
        }

        let (committed, snapshot) = rules::commit(&self.schedule);
        self.schedule = committed;
        self.snapshot = Some(snapshot);

        self.notice.generation += 1;
        self.notice.visible = true;
        Ok(self.notice.generation)
    }

    /// Hide the success notice if `generation` is still the latest one
    pub fn dismiss_notice(&mut self, generation: u64) -> bool {
        if self.notice.visible && self.notice.generation == generation {
            self.notice.visible = false;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn view(&self) -> EditorView {
        let save_blocker = self.save_blocker();
        EditorView {
            schedule: self.schedule.clone(),
            state: self.state(),
            complete: self.is_complete(),
            dirty: self.is_dirty(),
            can_save: save_blocker.is_none(),
            save_blocker,
            can_toggle_enabled: self.can_toggle_enabled(),
            conflict: self.conflict.clone(),
            conflict_message: self.conflict.as_ref().map(format_conflict),
            status: format_status(&self.schedule),
            days_label: format_days(&self.schedule.days),
            time_label: format_time(&self.schedule.time),
            notice_visible: self.notice.visible,
            away_mode: self.away_mode,
        }
    }
}
