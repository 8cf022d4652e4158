//! WebSocket handler for real-time schedule updates

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use schedule_editor::BookEvent;
use serde::Serialize;

use crate::AppState;

/// WebSocket events sent to clients
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    Connected {
        away_mode: bool,
    },
    ScheduleCreated {
        schedule_id: String,
    },
    ScheduleUpdated {
        schedule_id: String,
        is_draft: bool,
    },
    ScheduleSaved {
        schedule_id: String,
        saved: bool,
        is_draft: bool,
    },
    SaveNoticeDismissed {
        schedule_id: String,
    },
    ConflictChanged {
        schedule_id: String,
        conflicted: bool,
    },
    ScheduleDeleted {
        schedule_id: String,
    },
    AwayModeChanged {
        active: bool,
    },
}

impl From<BookEvent> for WsEvent {
    fn from(event: BookEvent) -> Self {
        match event {
            BookEvent::Created { schedule_id } => WsEvent::ScheduleCreated {
                schedule_id: schedule_id.to_string(),
            },
            BookEvent::Updated {
                schedule_id,
                is_draft,
            } => WsEvent::ScheduleUpdated {
                schedule_id: schedule_id.to_string(),
                is_draft,
            },
            BookEvent::Committed { schedule_id } => WsEvent::ScheduleSaved {
                schedule_id: schedule_id.to_string(),
                saved: true,
                is_draft: false,
            },
            BookEvent::NoticeDismissed { schedule_id } => WsEvent::SaveNoticeDismissed {
                schedule_id: schedule_id.to_string(),
            },
            BookEvent::ConflictChanged {
                schedule_id,
                conflicted,
            } => WsEvent::ConflictChanged {
                schedule_id: schedule_id.to_string(),
                conflicted,
            },
            BookEvent::Deleted { schedule_id } => WsEvent::ScheduleDeleted {
                schedule_id: schedule_id.to_string(),
            },
            BookEvent::AwayModeChanged { active } => WsEvent::AwayModeChanged { active },
        }
    }
}

/// Handle a WebSocket connection
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Send connected message
    let connected = WsEvent::Connected {
        away_mode: state.book.away_mode(),
    };
    let Ok(connected_msg) = serde_json::to_string(&connected) else {
        return;
    };
    if sender.send(Message::Text(connected_msg)).await.is_err() {
        return;
    }

    // Forward book events to the client
    let mut event_rx = state.book.subscribe();
    let send_task = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&WsEvent::from(event)) else {
                        continue;
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("WebSocket client lagged by {} events", n);
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    });

    // Clients only listen; drain until close
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    // Clean up
    send_task.abort();
}
