/// Advisory state of the pending input, used by the presentation layer to
/// show a warning and disable submission. Never blocks typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingHint {
    /// Nothing typed yet.
    Empty,
    /// Non-empty but whitespace only.
    Blank,
    /// Submittable.
    Ready,
}

impl PendingHint {
    pub fn for_input(raw: &str) -> Self {
        if raw.is_empty() {
            PendingHint::Empty
        } else if normalize_task_text(raw).is_none() {
            PendingHint::Blank
        } else {
            PendingHint::Ready
        }
    }

    /// Message shown under the input field, if any.
    pub fn message(self) -> Option<&'static str> {
        match self {
            PendingHint::Blank => Some("Task name cannot be only whitespace"),
            PendingHint::Empty | PendingHint::Ready => None,
        }
    }

    pub fn can_submit(self) -> bool {
        self == PendingHint::Ready
    }
}

/// Trim surrounding whitespace; `None` when nothing remains.
pub fn normalize_task_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
