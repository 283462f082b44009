use tracing::{debug, trace, warn};

use crate::{
    clock::{Clock, SystemClock},
    tasks::{Task, TaskId},
    validation::{normalize_task_text, PendingHint},
};

/// The task list controller: the ordered task sequence plus the pending input.
///
/// Insertion order is display order. Every operation is total; the return
/// values only report what changed.
#[derive(Debug, Clone)]
pub struct TaskList<C: Clock = SystemClock> {
    tasks: Vec<Task>,
    pending: String,
    next_id: u64,
    clock: C,
}

impl Default for TaskList<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> TaskList<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            pending: String::new(),
            next_id: 1,
            clock,
        }
    }

    /// Replace the pending input verbatim.
    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.pending = text.into();
        trace!(len = self.pending.len(), "pending text updated");
    }

    /// Turn the pending input into a new active task.
    ///
    /// Blank input is a no-op and leaves the pending text as typed, as is
    /// submitting once the id space is used up.
    pub fn submit_task(&mut self) -> Option<TaskId> {
        let text = normalize_task_text(&self.pending)?.to_string();
        let Some(following) = self.next_id.checked_add(1) else {
            warn!(next_id = self.next_id, "submit ignored: task ids exhausted");
            return None;
        };
        let id = TaskId(self.next_id);
        self.next_id = following;

        let task = Task::new(id, text, self.clock.now());
        debug!(%id, len = task.text.len(), "task added");
        self.tasks.push(task);
        self.pending.clear();
        Some(id)
    }

    /// Flip completion of `id` in place. Unknown ids are ignored.
    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.toggle();
                debug!(%id, completed = task.completed, "task toggled");
                true
            }
            None => {
                trace!(%id, "toggle ignored: no such task");
                false
            }
        }
    }

    /// Remove `id` from the list. Unknown ids are ignored.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            debug!(%id, "task deleted");
        } else {
            trace!(%id, "delete ignored: no such task");
        }
        removed
    }

    pub fn active_items(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed_items(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    pub fn pending_text(&self) -> &str {
        &self.pending
    }

    pub fn pending_hint(&self) -> PendingHint {
        PendingHint::for_input(&self.pending)
    }

    pub fn can_submit(&self) -> bool {
        self.pending_hint().can_submit()
    }

    /// Full sequence in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replace the task sequence wholesale. Callers guarantee unique ids below
    /// `u64::MAX` and non-blank text; the id counter resumes past the highest id.
    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.next_id = tasks
            .iter()
            .map(|t| t.id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        self.tasks = tasks;
    }
}
