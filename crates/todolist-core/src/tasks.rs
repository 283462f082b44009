use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task, unique within a single list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Task entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never blank.
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Serialized as milliseconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub(crate) fn new(id: TaskId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// Flip the completed flag in place.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
