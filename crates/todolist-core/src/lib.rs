//! Core state for the to-do list: tasks, the list controller, and the
//! dispatch layer the presentation shell subscribes to.
//! This crate has no I/O; the terminal front-end lives in `todolist-cli`.

pub mod clock;
pub mod controller;
pub mod snapshot;
pub mod store;
pub mod tasks;
pub mod validation;

pub use controller::TaskList;
pub use store::{Action, Store, SubscriptionId};
pub use tasks::{Task, TaskId};
