use std::{cell::Cell, rc::Rc};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todolist_core::{Action, Store, Task, TaskId, TaskList};
use tracing::debug;

use crate::config::UiConfig;

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Active,
    Completed,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Active,
            Focus::Active => Focus::Completed,
            Focus::Completed => Focus::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Input => Focus::Completed,
            Focus::Active => Focus::Input,
            Focus::Completed => Focus::Active,
        }
    }
}

/// What a key press means in the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Dispatch(Action),
    FocusNext,
    FocusPrev,
    MoveUp,
    MoveDown,
    Quit,
    Ignore,
}

/// Translate a key into an intent. `pending` is the current input text and
/// `selected` the highlighted task of the focused list, if any.
pub fn map_key(key: KeyEvent, focus: Focus, pending: &str, selected: Option<TaskId>) -> Intent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return Intent::Quit,
        KeyCode::Char('c') if ctrl => return Intent::Quit,
        KeyCode::Tab => return Intent::FocusNext,
        KeyCode::BackTab => return Intent::FocusPrev,
        _ => {}
    }

    match focus {
        Focus::Input => match key.code {
            KeyCode::Enter => Intent::Dispatch(Action::SubmitTask),
            KeyCode::Char('u') if ctrl => {
                if pending.is_empty() {
                    Intent::Ignore
                } else {
                    Intent::Dispatch(Action::SetPendingText(String::new()))
                }
            }
            KeyCode::Backspace => {
                let mut chars = pending.chars();
                match chars.next_back() {
                    Some(_) => Intent::Dispatch(Action::SetPendingText(chars.as_str().to_string())),
                    None => Intent::Ignore,
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut text = pending.to_string();
                text.push(c);
                Intent::Dispatch(Action::SetPendingText(text))
            }
            _ => Intent::Ignore,
        },
        Focus::Active | Focus::Completed => match key.code {
            KeyCode::Char('q') => Intent::Quit,
            KeyCode::Up | KeyCode::Char('k') => Intent::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => Intent::MoveDown,
            KeyCode::Char(' ') | KeyCode::Enter => selected
                .map(|id| Intent::Dispatch(Action::ToggleTask(id)))
                .unwrap_or(Intent::Ignore),
            KeyCode::Char('d') | KeyCode::Delete => selected
                .map(|id| Intent::Dispatch(Action::DeleteTask(id)))
                .unwrap_or(Intent::Ignore),
            _ => Intent::Ignore,
        },
    }
}

/// View state for the terminal shell: the store plus focus and selection.
pub struct App {
    store: Store,
    pub(crate) ui: UiConfig,
    focus: Focus,
    active_selected: usize,
    completed_selected: usize,
    dirty: Rc<Cell<bool>>,
}

impl App {
    pub fn new(ui: UiConfig) -> Self {
        Self::with_list(ui, TaskList::new())
    }

    pub fn with_list(ui: UiConfig, list: TaskList) -> Self {
        let mut store = Store::new(list);
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        store.subscribe(move |_| flag.set(true));
        Self {
            store,
            ui,
            focus: Focus::Input,
            active_selected: 0,
            completed_selected: 0,
            dirty,
        }
    }

    pub fn list(&self) -> &TaskList {
        self.store.state()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn active_selected(&self) -> Option<usize> {
        (!self.list().active_items().is_empty()).then_some(self.active_selected)
    }

    pub fn completed_selected(&self) -> Option<usize> {
        (!self.list().completed_items().is_empty()).then_some(self.completed_selected)
    }

    /// Whether a redraw is due; clears the flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    fn focused_items(&self) -> Vec<&Task> {
        match self.focus {
            Focus::Input => Vec::new(),
            Focus::Active => self.list().active_items(),
            Focus::Completed => self.list().completed_items(),
        }
    }

    fn selected_task(&self) -> Option<TaskId> {
        let index = match self.focus {
            Focus::Input => return None,
            Focus::Active => self.active_selected,
            Focus::Completed => self.completed_selected,
        };
        self.focused_items().get(index).map(|t| t.id)
    }

    /// Handle one key press. Returns `false` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let intent = map_key(
            key,
            self.focus,
            self.list().pending_text(),
            self.selected_task(),
        );
        self.apply(intent)
    }

    fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Quit => return false,
            Intent::Ignore => {}
            Intent::Dispatch(action) => {
                if self.store.dispatch(action) {
                    self.clamp_selection();
                }
            }
            Intent::FocusNext => self.set_focus(self.focus.next()),
            Intent::FocusPrev => self.set_focus(self.focus.prev()),
            Intent::MoveUp => self.move_selection(-1),
            Intent::MoveDown => self.move_selection(1),
        }
        true
    }

    fn set_focus(&mut self, focus: Focus) {
        debug!(?focus, "focus changed");
        self.focus = focus;
        self.mark_dirty();
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.focused_items().len();
        let slot = match self.focus {
            Focus::Input => return,
            Focus::Active => &mut self.active_selected,
            Focus::Completed => &mut self.completed_selected,
        };
        if len == 0 {
            return;
        }
        let next = slot.saturating_add_signed(delta).min(len - 1);
        if next != *slot {
            *slot = next;
            self.dirty.set(true);
        }
    }

    fn clamp_selection(&mut self) {
        let active = self.list().active_items().len();
        let completed = self.list().completed_items().len();
        self.active_selected = self.active_selected.min(active.saturating_sub(1));
        self.completed_selected = self.completed_selected.min(completed.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert!(app.handle_key(key(KeyCode::Char(c))));
        }
    }

    fn add(app: &mut App, text: &str) {
        type_text(app, text);
        app.handle_key(key(KeyCode::Enter));
    }

    fn app() -> App {
        App::new(UiConfig::default())
    }

    #[test]
    fn typing_in_input_appends_chars() {
        let intent = map_key(key(KeyCode::Char('k')), Focus::Input, "mil", None);
        assert_eq!(intent, Intent::Dispatch(Action::SetPendingText("milk".into())));
    }

    #[test]
    fn backspace_removes_last_char() {
        let intent = map_key(key(KeyCode::Backspace), Focus::Input, "café", None);
        assert_eq!(intent, Intent::Dispatch(Action::SetPendingText("caf".into())));
        assert_eq!(
            map_key(key(KeyCode::Backspace), Focus::Input, "", None),
            Intent::Ignore
        );
    }

    #[test]
    fn ctrl_u_clears_input() {
        assert_eq!(
            map_key(ctrl('u'), Focus::Input, "draft", None),
            Intent::Dispatch(Action::SetPendingText(String::new()))
        );
    }

    #[test]
    fn list_keys_need_a_selection() {
        let id = Some(TaskId(3));
        assert_eq!(
            map_key(key(KeyCode::Char(' ')), Focus::Active, "", id),
            Intent::Dispatch(Action::ToggleTask(TaskId(3)))
        );
        assert_eq!(
            map_key(key(KeyCode::Delete), Focus::Completed, "", id),
            Intent::Dispatch(Action::DeleteTask(TaskId(3)))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('d')), Focus::Active, "", None),
            Intent::Ignore
        );
    }

    #[test]
    fn q_only_quits_from_lists() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), Focus::Active, "", None),
            Intent::Quit
        );
        assert_eq!(
            map_key(key(KeyCode::Char('q')), Focus::Input, "", None),
            Intent::Dispatch(Action::SetPendingText("q".into()))
        );
        assert_eq!(map_key(key(KeyCode::Esc), Focus::Input, "", None), Intent::Quit);
        assert_eq!(map_key(ctrl('c'), Focus::Input, "", None), Intent::Quit);
    }

    #[test]
    fn enter_submits_trimmed_text() {
        let mut app = app();
        add(&mut app, "  Buy milk ");
        assert_eq!(app.list().active_items()[0].text, "Buy milk");
        assert_eq!(app.list().pending_text(), "");
    }

    #[test]
    fn blank_enter_keeps_input() {
        let mut app = app();
        add(&mut app, "   ");
        assert!(app.list().is_empty());
        assert_eq!(app.list().pending_text(), "   ");
    }

    #[test]
    fn tab_cycles_focus() {
        let mut app = app();
        assert_eq!(app.focus(), Focus::Input);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Active);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Completed);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Input);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus(), Focus::Completed);
    }

    #[test]
    fn toggling_moves_task_between_lists() {
        let mut app = app();
        add(&mut app, "a");
        add(&mut app, "b");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.active_selected(), Some(1));

        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.list().completed_items()[0].text, "b");
        assert_eq!(app.active_selected(), Some(0));

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.list().completed_items().is_empty());
        assert_eq!(app.completed_selected(), None);
        let active: Vec<_> = app.list().active_items().iter().map(|t| t.text.clone()).collect();
        assert_eq!(active, ["a", "b"]);
    }

    #[test]
    fn delete_clamps_selection() {
        let mut app = app();
        for text in ["a", "b", "c"] {
            add(&mut app, text);
        }
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.active_selected(), Some(2));

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.list().len(), 2);
        assert_eq!(app.active_selected(), Some(1));

        app.handle_key(key(KeyCode::Char('k')));
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.active_selected(), Some(0));
    }

    #[test]
    fn dirty_flag_tracks_changes() {
        let mut app = app();
        assert!(app.take_dirty());
        assert!(!app.take_dirty());

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.take_dirty(), "blank submit changes nothing");

        type_text(&mut app, "x");
        assert!(app.take_dirty());

        app.handle_key(key(KeyCode::Tab));
        assert!(app.take_dirty());
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut app = app();
        assert!(!app.handle_key(key(KeyCode::Esc)));
        app.handle_key(key(KeyCode::Tab));
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
    }
}
