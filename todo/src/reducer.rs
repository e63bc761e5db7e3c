//! Reducer logic for the todo list.
//!
//! Every action is total: empty text and unknown ids leave the state
//! untouched instead of producing an error. The reducer also owns the rule
//! that at most one item is in editing mode.

use crate::types::{TodoId, TodoItem, TodoState};
use composable_todo_core::{
    SmallVec,
    effect::Effect,
    environment::{IdGenerator, TimestampIdGenerator},
    reducer::Reducer,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything the user can do to the list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Append a new item; blank text is ignored
    Add {
        /// Raw text, trimmed before use
        text: String,
    },

    /// Replace the draft for the next item
    UpdateDraft {
        /// Text as typed
        text: String,
    },

    /// Add the current draft as a new item
    SubmitDraft,

    /// Remove an item
    Delete {
        /// Item to remove
        id: TodoId,
    },

    /// Flip the completed flag of an item
    ToggleComplete {
        /// Item to toggle
        id: TodoId,
    },

    /// Put an item into editing mode, leaving every other item in viewing mode
    StartEdit {
        /// Item to edit
        id: TodoId,
        /// Initial content of the edit buffer
        current_text: String,
    },

    /// Replace the edit buffer while an item is being edited
    UpdateEditBuffer {
        /// Text as typed
        text: String,
    },

    /// Commit the edit buffer to the item being edited
    ///
    /// Only acts when `id` is the item in editing mode; any other id leaves
    /// the current edit and its buffer alone.
    SaveEdit {
        /// Item being edited
        id: TodoId,
    },

    /// Leave editing mode without changing the item
    ///
    /// Only acts when `id` is the item in editing mode; any other id leaves
    /// the current edit and its buffer alone.
    CancelEdit {
        /// Item being edited
        id: TodoId,
    },
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new items
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Environment with wall-clock ids
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(TimestampIdGenerator::new()))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Next id from the environment that is not already on the list
    fn fresh_id(state: &TodoState, env: &TodoEnvironment) -> TodoId {
        loop {
            let id = TodoId::new(env.ids.next_id());
            if !state.exists(id) {
                return id;
            }
            tracing::debug!(%id, "Generated id already in use, drawing another");
        }
    }

    fn add(state: &mut TodoState, text: &str, env: &TodoEnvironment) {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring add with blank text");
            return;
        }

        let id = Self::fresh_id(state, env);
        state.items.push(TodoItem::new(id, text.to_string()));
        state.draft.clear();
        tracing::debug!(%id, "Added item");
    }

    fn delete(state: &mut TodoState, id: TodoId) {
        let Some(index) = state.items.iter().position(|item| item.id == id) else {
            tracing::debug!(%id, "Ignoring delete of unknown item");
            return;
        };

        let removed = state.items.remove(index);
        if removed.is_editing {
            state.edit_buffer.clear();
        }
    }

    fn toggle_complete(state: &mut TodoState, id: TodoId) {
        match state.get_mut(id) {
            Some(item) => item.completed = !item.completed,
            None => tracing::debug!(%id, "Ignoring toggle of unknown item"),
        }
    }

    fn start_edit(state: &mut TodoState, id: TodoId, current_text: String) {
        if !state.exists(id) {
            tracing::debug!(%id, "Ignoring edit of unknown item");
            return;
        }

        for item in &mut state.items {
            item.is_editing = item.id == id;
        }
        state.edit_buffer = current_text;
    }

    fn update_edit_buffer(state: &mut TodoState, text: String) {
        if state.editing().is_none() {
            tracing::debug!("Ignoring edit text with no item in editing mode");
            return;
        }
        state.edit_buffer = text;
    }

    fn save_edit(state: &mut TodoState, id: TodoId) {
        let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.id == id && item.is_editing)
        else {
            tracing::debug!(%id, "Ignoring save for item not in editing mode");
            return;
        };

        let text = state.edit_buffer.trim();
        if text.is_empty() {
            // Stays in editing mode until the user types something or cancels
            tracing::debug!(%id, "Ignoring save with blank text");
            return;
        }

        item.text = text.to_string();
        item.is_editing = false;
        state.edit_buffer.clear();
    }

    fn cancel_edit(state: &mut TodoState, id: TodoId) {
        let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.id == id && item.is_editing)
        else {
            tracing::debug!(%id, "Ignoring cancel for item not in editing mode");
            return;
        };

        item.is_editing = false;
        state.edit_buffer.clear();
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Add { text } => Self::add(state, &text, env),
            TodoAction::UpdateDraft { text } => state.draft = text,
            TodoAction::SubmitDraft => {
                let draft = state.draft.clone();
                Self::add(state, &draft, env);
            },
            TodoAction::Delete { id } => Self::delete(state, id),
            TodoAction::ToggleComplete { id } => Self::toggle_complete(state, id),
            TodoAction::StartEdit { id, current_text } => {
                Self::start_edit(state, id, current_text);
            },
            TodoAction::UpdateEditBuffer { text } => Self::update_edit_buffer(state, text),
            TodoAction::SaveEdit { id } => Self::save_edit(state, id),
            TodoAction::CancelEdit { id } => Self::cancel_edit(state, id),
        }

        // Pure state machine - no side effects
        SmallVec::new()
    }
}
