//! Unidirectional data flow over a [`TaskList`]: the presentation layer
//! dispatches [`Action`]s and re-renders from subscriber callbacks.

use std::fmt;

use tracing::trace;

use crate::{
    clock::{Clock, SystemClock},
    controller::TaskList,
    tasks::TaskId,
};

/// The complete event surface of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetPendingText(String),
    SubmitTask,
    ToggleTask(TaskId),
    DeleteTask(TaskId),
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<C> = Box<dyn FnMut(&TaskList<C>)>;

/// Owns the list and notifies subscribers after every state change.
pub struct Store<C: Clock = SystemClock> {
    state: TaskList<C>,
    listeners: Vec<(SubscriptionId, Listener<C>)>,
    next_subscription: u64,
}

impl Default for Store<SystemClock> {
    fn default() -> Self {
        Self::new(TaskList::new())
    }
}

impl<C: Clock> Store<C> {
    pub fn new(state: TaskList<C>) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &TaskList<C> {
        &self.state
    }

    /// Apply an action. Returns `true` when state changed, in which case
    /// every subscriber has been called, in subscription order.
    pub fn dispatch(&mut self, action: Action) -> bool {
        trace!(?action, "dispatch");
        let changed = match action {
            Action::SetPendingText(text) => {
                let changed = self.state.pending_text() != text;
                self.state.set_pending_text(text);
                changed
            }
            Action::SubmitTask => self.state.submit_task().is_some(),
            Action::ToggleTask(id) => self.state.toggle_task(id),
            Action::DeleteTask(id) => self.state.delete_task(id),
        };

        if changed {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&self.state);
            }
        }
        changed
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TaskList<C>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
