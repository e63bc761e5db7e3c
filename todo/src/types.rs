//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items plus two text buffers: the
//! draft for the next item and the single shared edit buffer.

use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Display text, never empty and already trimmed
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// Whether the item is shown as an inline editor
    pub is_editing: bool,
}

impl TodoItem {
    /// Creates a new item in viewing mode, not completed
    #[must_use]
    pub const fn new(id: TodoId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            is_editing: false,
        }
    }
}

/// Counts derived from the item list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    /// Number of items
    pub total: usize,
    /// Number of completed items
    pub completed: usize,
    /// Number of items still to do
    pub pending: usize,
}

/// State of the todo list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// Items in insertion order
    pub items: Vec<TodoItem>,
    /// Text of the item currently being edited
    pub edit_buffer: String,
    /// Text typed for the next item
    pub draft: String,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            edit_buffer: String::new(),
            draft: String::new(),
        }
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns a mutable todo by ID
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// The item currently in editing mode, if any
    #[must_use]
    pub fn editing(&self) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.is_editing)
    }

    /// Whether submitting the draft would add an item
    #[must_use]
    pub fn can_submit_draft(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Derived counts, recomputed on every call
    #[must_use]
    pub fn stats(&self) -> TodoStats {
        let total = self.items.len();
        let completed = self.items.iter().filter(|item| item.completed).count();
        TodoStats {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Items in display order
    pub fn iter(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.iter()
    }
}
