// events.rs — Event model and notification dispatch.
//
// The goal store emits an event after each mutation and when it falls back
// to the default goal set. Notification sinks subscribe to these events; the
// always-on sink appends them to a JSONL log.
//
// Dispatch is synchronous. A failing sink is logged and skipped, it never
// fails the store operation that produced the event.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal::{Goal, GoalType};

/// Events emitted by the goal store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QuestEvent {
    /// A new goal was added.
    GoalCreated {
        goal_id: String,
        name: String,
        goal_type: GoalType,
        timestamp: DateTime<Utc>,
    },

    /// A recording event was applied to a goal.
    EventRecorded {
        goal_id: String,
        points_awarded: u32,
        completed: bool,
        total_score: u64,
        timestamp: DateTime<Utc>,
    },

    /// A goal was removed. Its earned points stay in the total.
    GoalDeleted {
        goal_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Stored data was missing or unreadable and the default set was loaded.
    DefaultsSeeded {
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl QuestEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            QuestEvent::GoalCreated { .. } => "goal_created",
            QuestEvent::EventRecorded { .. } => "event_recorded",
            QuestEvent::GoalDeleted { .. } => "goal_deleted",
            QuestEvent::DefaultsSeeded { .. } => "defaults_seeded",
        }
    }

    pub fn goal_created(goal: &Goal) -> Self {
        QuestEvent::GoalCreated {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            goal_type: goal.goal_type(),
            timestamp: Utc::now(),
        }
    }

    pub fn event_recorded(goal: &Goal, points_awarded: u32, total_score: u64) -> Self {
        QuestEvent::EventRecorded {
            goal_id: goal.id.clone(),
            points_awarded,
            completed: goal.is_completed(),
            total_score,
            timestamp: Utc::now(),
        }
    }

    pub fn goal_deleted(goal_id: &str) -> Self {
        QuestEvent::GoalDeleted {
            goal_id: goal_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn defaults_seeded(reason: impl Into<String>) -> Self {
        QuestEvent::DefaultsSeeded {
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Trait for receiving store events.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged but don't stop the store.
    fn send(&self, event: &QuestEvent) -> Result<(), GoalError>;
}

/// Logs events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &QuestEvent) -> Result<(), GoalError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| GoalError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// Create a new dispatcher with no sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification sink.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Dispatch an event to all sinks.
    pub fn dispatch(&self, event: &QuestEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!(event = event.event_type(), "notification sink error: {}", e);
            }
        }
    }
}
