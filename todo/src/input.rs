//! Keyboard conventions.
//!
//! Enter submits whatever the user is typing into: the draft while
//! composing, the edit buffer while editing. Escape abandons an edit.

use crate::reducer::TodoAction;
use crate::types::{TodoId, TodoState};

/// Keys the list reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Activate / submit
    Enter,
    /// Abandon the current edit
    Escape,
    /// Any other key; typing is delivered as buffer updates instead
    Other,
}

/// Which text input has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// The "new item" input
    Draft,
    /// The inline editor of an item
    Editor(TodoId),
}

impl Focus {
    /// Focus implied by the state: the open editor if any, else the draft
    #[must_use]
    pub fn of(state: &TodoState) -> Self {
        state
            .editing()
            .map_or(Self::Draft, |item| Self::Editor(item.id))
    }
}

/// Action a key press triggers, if any
///
/// # Example
///
/// ```
/// use todo::input::{Focus, Key, action_for_key};
/// use todo::{TodoAction, TodoId};
///
/// assert_eq!(action_for_key(Focus::Draft, Key::Enter), Some(TodoAction::SubmitDraft));
/// assert_eq!(action_for_key(Focus::Draft, Key::Escape), None);
/// assert_eq!(
///     action_for_key(Focus::Editor(TodoId::new(3)), Key::Escape),
///     Some(TodoAction::CancelEdit { id: TodoId::new(3) }),
/// );
/// ```
#[must_use]
pub fn action_for_key(focus: Focus, key: Key) -> Option<TodoAction> {
    match (focus, key) {
        (Focus::Draft, Key::Enter) => Some(TodoAction::SubmitDraft),
        (Focus::Editor(id), Key::Enter) => Some(TodoAction::SaveEdit { id }),
        (Focus::Editor(id), Key::Escape) => Some(TodoAction::CancelEdit { id }),
        (Focus::Draft, Key::Escape) | (_, Key::Other) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoItem;

    #[test]
    fn enter_while_editing_saves() {
        let id = TodoId::new(9);
        assert_eq!(
            action_for_key(Focus::Editor(id), Key::Enter),
            Some(TodoAction::SaveEdit { id })
        );
    }

    #[test]
    fn other_keys_do_nothing() {
        assert_eq!(action_for_key(Focus::Draft, Key::Other), None);
        assert_eq!(action_for_key(Focus::Editor(TodoId::new(1)), Key::Other), None);
    }

    #[test]
    fn focus_follows_editing_item() {
        let mut state = TodoState::new();
        state.items.push(TodoItem::new(TodoId::new(1), "A".to_string()));
        state.items.push(TodoItem::new(TodoId::new(2), "B".to_string()));
        assert_eq!(Focus::of(&state), Focus::Draft);

        state.items[1].is_editing = true;
        assert_eq!(Focus::of(&state), Focus::Editor(TodoId::new(2)));
    }
}
