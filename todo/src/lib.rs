//! In-memory todo list built as a pure reducer.
//!
//! The list supports add, edit, complete-toggle and delete plus derived
//! counts. All state lives in an explicit [`TodoState`] value; every user
//! input is a [`TodoAction`] applied by [`TodoReducer`]. Invalid input
//! (blank text, unknown ids) is silently ignored.
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{TodoAction, TodoEnvironment, TodoReducer, TodoState};
//! use composable_todo_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::new(TodoState::new(), TodoReducer::new(), TodoEnvironment::production());
//!
//! store.send(TodoAction::Add { text: "Buy milk".to_string() }).await?;
//!
//! let id = store.state(|s| s.items[0].id).await;
//! store.send(TodoAction::ToggleComplete { id }).await?;
//!
//! let stats = store.state(|s| s.stats()).await;
//! println!("Completed: {}/{}", stats.completed, stats.total);
//! # Ok(())
//! # }
//! ```

pub mod input;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use reducer::{TodoAction, TodoEnvironment, TodoReducer};
pub use types::{TodoId, TodoItem, TodoState, TodoStats};
