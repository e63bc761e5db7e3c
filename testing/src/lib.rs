//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the Composable Todo architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then builder for reducers
//! - Helpers for checking invariants across action sequences
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{ReducerTest, SequentialIdGenerator};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(SequentialIdGenerator::new())))
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::Add { text: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.stats().total, 1))
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use composable_todo_core::environment::IdGenerator;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Sequential id generator for deterministic tests
    ///
    /// Hands out 1, 2, 3, ... in order.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_testing::mocks::SequentialIdGenerator;
    /// use composable_todo_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), 1);
    /// assert_eq!(ids.next_id(), 2);
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        last: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting from 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_after(0)
        }

        /// Start counting from `last + 1`
        #[must_use]
        pub const fn starting_after(last: u64) -> Self {
            Self {
                last: AtomicU64::new(last),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> u64 {
            self.last.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    /// Id generator that replays a fixed script, then counts on from the
    /// largest scripted value
    ///
    /// Useful for forcing a generator to hand out an id that is already in
    /// use.
    #[derive(Debug)]
    pub struct ScriptedIdGenerator {
        script: Mutex<VecDeque<u64>>,
        fallback: SequentialIdGenerator,
    }

    impl ScriptedIdGenerator {
        /// Create a generator that returns `ids` in order
        #[must_use]
        pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
            let script: VecDeque<u64> = ids.into_iter().collect();
            let max = script.iter().copied().max().unwrap_or(0);
            Self {
                script: Mutex::new(script),
                fallback: SequentialIdGenerator::starting_after(max),
            }
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn next_id(&self) -> u64 {
            let scripted = match self.script.lock() {
                Ok(mut script) => script.pop_front(),
                Err(poisoned) => poisoned.into_inner().pop_front(),
            };
            scripted.unwrap_or_else(|| self.fallback.next_id())
        }
    }
}

/// Property-style helpers that run a check after every reduced action
pub mod properties {
    use composable_todo_core::reducer::Reducer;

    /// Apply `actions` one by one, calling `check(before, action, after)`
    /// after each step
    ///
    /// Effects returned by the reducer are discarded; use this for pure
    /// state machines whose invariants must hold at every step.
    ///
    /// # Example
    ///
    /// ```ignore
    /// properties::replay(&reducer, &mut state, &env, actions, |before, action, after| {
    ///     assert!(after.items.len() <= before.items.len() + 1);
    /// });
    /// ```
    pub fn replay<R, I, F>(
        reducer: &R,
        state: &mut R::State,
        env: &R::Environment,
        actions: I,
        mut check: F,
    ) where
        R: Reducer,
        R::State: Clone,
        R::Action: Clone,
        I: IntoIterator<Item = R::Action>,
        F: FnMut(&R::State, &R::Action, &R::State),
    {
        for action in actions {
            let before = state.clone();
            let _ = reducer.reduce(state, action.clone(), env);
            check(&before, &action, state);
        }
    }
}

// Re-export commonly used items
pub use mocks::{ScriptedIdGenerator, SequentialIdGenerator};
