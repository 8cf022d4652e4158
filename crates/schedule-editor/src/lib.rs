//! Schedule editing for thermostat schedules
//!
//! Provides the draft/saved editing state machine, the save and enable
//! gates, conflict messages, and the in-memory schedule book that owns a
//! collection of editors.

pub mod book;
pub mod conflict;
pub mod editor;
pub mod error;
pub mod rules;

pub use book::{BookEvent, CreateScheduleRequest, ScheduleBook, ScheduleOrigin};
pub use editor::{EditorState, EditorView, ScheduleEditor, SUCCESS_NOTICE_DURATION};
pub use error::EditError;
pub use rules::{SaveBlocker, Step};
