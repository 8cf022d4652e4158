//! In-memory collection of schedule editors

use crate::editor::{EditorView, ScheduleEditor, SUCCESS_NOTICE_DURATION};
use crate::error::EditError;
use crate::rules::{self, Step};
use dashmap::DashMap;
use schedule_model::{
    ConflictDescriptor, DaySet, FanMode, Schedule, ScheduleId, ScheduleMode, ScheduleUpdate,
    SetpointField, TimeOfDay,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Where a schedule came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleOrigin {
    /// Created from scratch by the user
    #[default]
    User,
    /// Derived from a preset
    Preset,
}

/// Events emitted by the schedule book
#[derive(Debug, Clone)]
pub enum BookEvent {
    /// A schedule was created
    Created { schedule_id: ScheduleId },
    /// A schedule was edited
    Updated {
        schedule_id: ScheduleId,
        is_draft: bool,
    },
    /// A schedule was committed
    Committed { schedule_id: ScheduleId },
    /// The success notice for a commit timed out
    NoticeDismissed { schedule_id: ScheduleId },
    /// A conflict was supplied or cleared
    ConflictChanged {
        schedule_id: ScheduleId,
        conflicted: bool,
    },
    /// A schedule was deleted
    Deleted { schedule_id: ScheduleId },
    /// Away mode was switched
    AwayModeChanged { active: bool },
}

/// Request to create a new schedule
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(default)]
    pub mode: Option<ScheduleMode>,
    #[serde(default)]
    pub temperature: Option<i32>,
    #[serde(default)]
    pub heat_temp: Option<i32>,
    #[serde(default)]
    pub cool_temp: Option<i32>,
    #[serde(default)]
    pub days: DaySet,
    #[serde(default)]
    pub time: TimeOfDay,
    #[serde(default)]
    pub fan_mode: Option<FanMode>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub origin: ScheduleOrigin,
}

fn default_enabled() -> bool {
    true
}

impl Default for CreateScheduleRequest {
    fn default() -> Self {
        Self {
            mode: None,
            temperature: None,
            heat_temp: None,
            cool_temp: None,
            days: DaySet::EMPTY,
            time: TimeOfDay::UNSET,
            fan_mode: None,
            enabled: default_enabled(),
            origin: ScheduleOrigin::User,
        }
    }
}

impl CreateScheduleRequest {
    /// Build the unsaved schedule this request describes
    fn into_schedule(self, id: ScheduleId) -> Result<Schedule, EditError> {
        let setpoints = [
            (SetpointField::Temperature, self.temperature),
            (SetpointField::Heat, self.heat_temp),
            (SetpointField::Cool, self.cool_temp),
        ];

        let mut schedule = Schedule::new(id);
        for (field, value) in setpoints {
            if let Some(value) = value {
                rules::check_setpoint(self.mode, field, value)?;
            }
            schedule.set_setpoint(field, value);
        }
        schedule.select_mode(self.mode);
        schedule.days = self.days;
        schedule.time = self.time.normalized();
        schedule.fan_mode = self.fan_mode;
        schedule.enabled = self.enabled;
        Ok(schedule)
    }
}

struct BookEntry {
    editor: ScheduleEditor,
    origin: ScheduleOrigin,
    /// Creation order, newest highest
    sequence: u64,
}

/// Owner of every schedule being edited
///
/// Assigns ids, keeps creation order, carries the away-mode switch and
/// per-schedule conflicts, and runs the success-notice timers.
pub struct ScheduleBook {
    entries: Arc<DashMap<ScheduleId, BookEntry>>,
    /// Pending notice-dismiss timers (keyed by schedule ID)
    timers: Arc<DashMap<ScheduleId, JoinHandle<()>>>,
    sequence: AtomicU64,
    away_mode: AtomicBool,
    event_tx: broadcast::Sender<BookEvent>,
}

impl Default for ScheduleBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBook {
    /// Create an empty book
    #[must_use]
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(DashMap::new()),
            timers: Arc::new(DashMap::new()),
            sequence: AtomicU64::new(0),
            away_mode: AtomicBool::new(false),
            event_tx,
        }
    }

    /// Subscribe to book events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BookEvent> {
        self.event_tx.subscribe()
    }

    #[must_use]
    pub fn away_mode(&self) -> bool {
        self.away_mode.load(Ordering::SeqCst)
    }

    /// Switch away mode for every schedule; schedule data is left as is
    pub fn set_away_mode(&self, active: bool) {
        self.away_mode.store(active, Ordering::SeqCst);
        for mut entry in self.entries.iter_mut() {
            entry.editor.set_away_mode(active);
        }

        let _ = self.event_tx.send(BookEvent::AwayModeChanged { active });
        tracing::info!("Away mode {}", if active { "on" } else { "off" });
    }

    /// Create an empty schedule, enabled, with nothing selected
    pub fn create_blank(&self) -> EditorView {
        let schedule = Schedule::new(ScheduleId::generate());
        self.insert(schedule, ScheduleOrigin::User)
    }

    /// Create a schedule from explicit field values
    pub fn create(&self, request: CreateScheduleRequest) -> Result<EditorView, EditError> {
        let origin = request.origin;
        let schedule = request.into_schedule(ScheduleId::generate())?;
        Ok(self.insert(schedule, origin))
    }

    fn insert(&self, schedule: Schedule, origin: ScheduleOrigin) -> EditorView {
        let id = schedule.id.clone();
        let mut editor = ScheduleEditor::new(schedule);
        editor.set_away_mode(self.away_mode());
        let view = editor.view();

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.entries.insert(
            id.clone(),
            BookEntry {
                editor,
                origin,
                sequence,
            },
        );

        let _ = self.event_tx.send(BookEvent::Created {
            schedule_id: id.clone(),
        });
        tracing::info!("Created schedule {} ({:?})", id, origin);
        view
    }

    /// All schedules, newest first, optionally limited to one origin
    #[must_use]
    pub fn list(&self, origin: Option<ScheduleOrigin>) -> Vec<EditorView> {
        let mut entries: Vec<(u64, EditorView)> = self
            .entries
            .iter()
            .filter(|entry| origin.map_or(true, |origin| entry.origin == origin))
            .map(|entry| (entry.sequence, entry.editor.view()))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().map(|(_, view)| view).collect()
    }

    #[must_use]
    pub fn get(&self, id: &ScheduleId) -> Option<EditorView> {
        self.entries.get(id).map(|entry| entry.editor.view())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run a transition on one editor and report the resulting view
    fn with_editor<T>(
        &self,
        id: &ScheduleId,
        transition: impl FnOnce(&mut ScheduleEditor) -> Result<T, EditError>,
    ) -> Result<(T, EditorView), EditError> {
        let mut entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| EditError::NotFound(id.to_string()))?;

        let result = transition(&mut entry.editor);
        if let Err(ref e) = result {
            tracing::debug!("Rejected edit on schedule {}: {}", id, e);
        }
        let value = result?;
        Ok((value, entry.editor.view()))
    }

    /// Apply field edits to a schedule (all or nothing)
    pub fn update(
        &self,
        id: &ScheduleId,
        updates: &[ScheduleUpdate],
    ) -> Result<EditorView, EditError> {
        let ((), view) = self.with_editor(id, |editor| editor.apply_all(updates))?;
        self.notify_updated(&view);
        tracing::debug!("Applied {} update(s) to schedule {}", updates.len(), id);
        Ok(view)
    }

    /// Nudge a setpoint up or down
    pub fn adjust(
        &self,
        id: &ScheduleId,
        field: SetpointField,
        step: Step,
    ) -> Result<EditorView, EditError> {
        let ((), view) = self.with_editor(id, |editor| editor.adjust(field, step))?;
        self.notify_updated(&view);
        Ok(view)
    }

    /// Enable a schedule
    pub fn enable(&self, id: &ScheduleId) -> Result<EditorView, EditError> {
        self.update(id, &[ScheduleUpdate::Enabled(true)])
    }

    /// Disable a schedule
    pub fn disable(&self, id: &ScheduleId) -> Result<EditorView, EditError> {
        self.update(id, &[ScheduleUpdate::Enabled(false)])
    }

    fn notify_updated(&self, view: &EditorView) {
        let _ = self.event_tx.send(BookEvent::Updated {
            schedule_id: view.schedule.id.clone(),
            is_draft: view.schedule.is_draft,
        });
    }

    /// Supply or clear the conflict for a schedule
    pub fn set_conflict(
        &self,
        id: &ScheduleId,
        conflict: Option<ConflictDescriptor>,
    ) -> Result<EditorView, EditError> {
        let conflicted = conflict.is_some();
        let ((), view) = self.with_editor(id, |editor| editor.set_conflict(conflict))?;

        let _ = self.event_tx.send(BookEvent::ConflictChanged {
            schedule_id: id.clone(),
            conflicted,
        });
        tracing::debug!("Schedule {} conflict: {}", id, conflicted);
        Ok(view)
    }

    /// Commit a schedule and start its success-notice timer
    ///
    /// Must be called from within a tokio runtime.
    pub fn commit(&self, id: &ScheduleId) -> Result<EditorView, EditError> {
        let (generation, view) = self.with_editor(id, ScheduleEditor::commit)?;

        let _ = self.event_tx.send(BookEvent::Committed {
            schedule_id: id.clone(),
        });
        tracing::info!("Saved schedule {}", id);

        self.start_notice_timer(id, generation);
        Ok(view)
    }

    /// Replace any pending notice timer for `id` with a fresh one
    fn start_notice_timer(&self, id: &ScheduleId, generation: u64) {
        self.cancel_notice_timer(id);

        let entries = Arc::clone(&self.entries);
        let event_tx = self.event_tx.clone();
        let schedule_id = id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_NOTICE_DURATION).await;

            let dismissed = entries
                .get_mut(&schedule_id)
                .is_some_and(|mut entry| entry.editor.dismiss_notice(generation));

            if dismissed {
                tracing::debug!("Dismissed save notice for schedule {}", schedule_id);
                let _ = event_tx.send(BookEvent::NoticeDismissed { schedule_id });
            }
        });

        self.timers.insert(id.clone(), handle);
    }

    fn cancel_notice_timer(&self, id: &ScheduleId) {
        if let Some((_, handle)) = self.timers.remove(id) {
            handle.abort();
            tracing::debug!("Cancelled notice timer for schedule {}", id);
        }
    }

    /// Remove a schedule
    pub fn delete(&self, id: &ScheduleId) -> Result<Schedule, EditError> {
        let (_, entry) = self
            .entries
            .remove(id)
            .ok_or_else(|| EditError::NotFound(id.to_string()))?;

        self.cancel_notice_timer(id);

        let _ = self.event_tx.send(BookEvent::Deleted {
            schedule_id: id.clone(),
        });
        tracing::info!("Deleted schedule {}", id);
        Ok(entry.editor.schedule().clone())
    }
}

impl Drop for ScheduleBook {
    fn drop(&mut self) {
        // Abort all notice timers
        for entry in self.timers.iter() {
            entry.value().abort();
        }
    }
}
