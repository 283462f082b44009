//! Explicit export/import of the task sequence. Nothing here touches disk;
//! callers decide where a snapshot goes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    clock::Clock,
    controller::TaskList,
    tasks::{Task, TaskId},
    validation::normalize_task_text,
};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("task {id} has blank text")]
    BlankText { id: TaskId },
    #[error("duplicate task id {id}")]
    DuplicateId { id: TaskId },
    #[error("task id {id} leaves no room for new tasks")]
    IdExhausted { id: TaskId },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializable copy of the task sequence. Pending input is not included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u32,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the invariants a live list relies on.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
            });
        }
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if normalize_task_text(&task.text).is_none() {
                return Err(SnapshotError::BlankText { id: task.id });
            }
            if !seen.insert(task.id) {
                return Err(SnapshotError::DuplicateId { id: task.id });
            }
            if task.id.0 == u64::MAX {
                return Err(SnapshotError::IdExhausted { id: task.id });
            }
        }
        Ok(())
    }
}

impl<C: Clock> TaskList<C> {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            tasks: self.tasks().to_vec(),
        }
    }

    /// Replace the task sequence with a validated snapshot. Stored text is
    /// trimmed; pending input is left alone. On error nothing changes.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        let tasks: Vec<Task> = snapshot
            .tasks
            .into_iter()
            .map(|mut task| {
                task.text = task.text.trim().to_string();
                task
            })
            .collect();
        debug!(count = tasks.len(), "restored tasks from snapshot");
        self.replace_tasks(tasks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;

    fn list() -> TaskList<FixedClock> {
        TaskList::with_clock(FixedClock(
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        ))
    }

    fn seeded() -> TaskList<FixedClock> {
        let mut list = list();
        for text in ["Buy milk", "Walk dog", "File taxes"] {
            list.set_pending_text(text);
            list.submit_task();
        }
        list.toggle_task(TaskId(2));
        list
    }

    #[test]
    fn restore_reproduces_tasks_and_partitions() {
        let source = seeded();
        let json = source.snapshot().to_json().expect("to_json");

        let mut target = list();
        target.set_pending_text("draft");
        target
            .restore(Snapshot::from_json(&json).expect("from_json"))
            .expect("restore");

        assert_eq!(target.tasks(), source.tasks());
        assert_eq!(target.completed_items().len(), 1);
        assert_eq!(target.pending_text(), "draft");
    }

    #[test]
    fn ids_continue_after_restore() {
        let mut list = list();
        list.restore(seeded().snapshot()).expect("restore");
        list.set_pending_text("next");
        assert_eq!(list.submit_task(), Some(TaskId(4)));
    }

    #[test]
    fn created_at_travels_as_millis() {
        let json = seeded().snapshot().to_json().expect("to_json");
        assert!(json.contains("1700000000000"), "{json}");
    }

    #[test]
    fn rejects_blank_text() {
        let json = r#"{"version":1,"tasks":[{"id":1,"text":"  ","completed":false,"created_at":0}]}"#;
        let snapshot = Snapshot::from_json(json).expect("parse");
        let mut list = seeded();
        let err = list.restore(snapshot).expect_err("blank text");
        assert!(matches!(err, SnapshotError::BlankText { id: TaskId(1) }));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{"version":1,"tasks":[
            {"id":4,"text":"a","created_at":0},
            {"id":4,"text":"b","created_at":0}
        ]}"#;
        let err = Snapshot::from_json(json)
            .expect("parse")
            .validate()
            .expect_err("duplicate");
        assert!(matches!(err, SnapshotError::DuplicateId { id: TaskId(4) }));
    }

    #[test]
    fn rejects_max_id_and_keeps_list() {
        let json = r#"{"version":1,"tasks":[{"id":18446744073709551615,"text":"x","created_at":0}]}"#;
        let mut list = seeded();
        let err = list
            .restore(Snapshot::from_json(json).expect("parse"))
            .expect_err("id exhausted");
        assert!(matches!(err, SnapshotError::IdExhausted { id: TaskId(u64::MAX) }));
        assert_eq!(list.len(), 3);
        assert_eq!(list.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn submit_after_highest_restorable_id_is_a_noop() {
        let json = r#"{"version":1,"tasks":[{"id":18446744073709551614,"text":"last","created_at":0}]}"#;
        let mut list = list();
        list.restore(Snapshot::from_json(json).expect("parse"))
            .expect("restore");

        list.set_pending_text("one more");
        assert_eq!(list.submit_task(), None);
        assert_eq!(list.len(), 1);
        assert_eq!(list.pending_text(), "one more");
    }

    #[test]
    fn rejects_unknown_version() {
        let snapshot = Snapshot {
            version: 9,
            tasks: Vec::new(),
        };
        let err = snapshot.validate().expect_err("version");
        assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 9 }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = Snapshot::from_json("{not json").expect_err("malformed");
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[test]
    fn restore_trims_stored_text() {
        let json = r#"{"version":1,"tasks":[{"id":1,"text":"  padded ","created_at":0}]}"#;
        let mut list = list();
        list.restore(Snapshot::from_json(json).expect("parse"))
            .expect("restore");
        assert_eq!(list.tasks()[0].text, "padded");
        assert!(!list.tasks()[0].completed);
    }
}
