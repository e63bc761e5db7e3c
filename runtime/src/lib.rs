//! # Composable Todo Runtime
//!
//! Runtime implementation for the Composable Todo architecture.
//!
//! This crate provides the Store runtime that runs actions through a reducer
//! one at a time and lets a presentation layer read state and observe every
//! processed action.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state and serialises every action through the reducer
//! - **Effect runner**: Drives the effects a reducer returns and feeds their actions back
//! - **Action Broadcast**: Lets a presentation layer observe every processed action
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers themselves never fail; these only describe the runtime shell.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for in-flight sends
        ///
        /// Some `send()` calls were still driving effects when the timeout elapsed.
        #[error("Shutdown timed out with {0} sends still in flight")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use composable_todo_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of processed actions buffered for slow observers
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    ///
    /// A capacity of zero is bumped to one when the store is built.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Actions an effect produced, once it has run to completion
type Produced<A> = Pin<Box<dyn Future<Output = Vec<A>> + Send>>;

/// Run an effect to completion and collect the actions it produced
///
/// `Sequential` children run one after another and keep their order.
/// `Parallel` children each get their own task; their actions arrive in
/// completion order. A child that panics contributes nothing.
fn run_effect<A>(effect: Effect<A>) -> Produced<A>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => Vec::new(),
            Effect::Future(fut) => fut.await.into_iter().collect(),
            Effect::Sequential(effects) => {
                let mut produced = Vec::new();
                for effect in effects {
                    produced.extend(run_effect(effect).await);
                }
                produced
            },
            Effect::Parallel(effects) => {
                let mut tasks = tokio::task::JoinSet::new();
                for effect in effects {
                    tasks.spawn(run_effect(effect));
                }

                let mut produced = Vec::new();
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok(actions) => produced.extend(actions),
                        Err(error) => {
                            tracing::warn!(%error, "Parallel effect failed");
                            metrics::counter!("store.effects.failed").increment(1);
                        },
                    }
                }
                produced
            },
        }
    })
}

/// Counts one in-flight `send()` for as long as it lives
struct InFlight(Arc<watch::Sender<usize>>);

impl InFlight {
    fn enter(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Store runtime for coordinating reducer execution.
pub mod store {
    use super::{
        Arc, AtomicBool, Duration, Effect, InFlight, Ordering, Reducer, RwLock, StoreConfig,
        StoreError, run_effect, watch,
    };
    use composable_todo_core::SmallVec;
    use std::collections::VecDeque;
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` so reads and sends can come from anywhere)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers of processed actions
    ///
    /// Every action runs through the reducer under the write lock, so
    /// concurrent senders are serialised and each action sees the state
    /// left by the previous one.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        default_shutdown_timeout: Duration,
        shutdown: Arc<AtomicBool>,
        in_flight: Arc<watch::Sender<usize>>,
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let store = Store::with_config(MyState::default(), MyReducer, my_environment, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (in_flight, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                default_shutdown_timeout: config.default_shutdown_timeout,
                shutdown: Arc::new(AtomicBool::new(false)),
                in_flight: Arc::new(in_flight),
                action_broadcast,
            }
        }

        /// Whether shutdown has started
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for
        /// sends that are still driving effects. Calling it twice is harmless.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if sends are still in
        /// flight when the timeout expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let mut in_flight = self.in_flight.subscribe();
            let drained = tokio::time::timeout(timeout, in_flight.wait_for(|n| *n == 0))
                .await
                .is_ok();

            if drained {
                tracing::info!("No sends in flight, shutdown successful");
                return Ok(());
            }

            let pending = *self.in_flight.borrow();
            tracing::error!(in_flight = pending, "Shutdown timeout: {} sends still running", pending);
            metrics::counter!("store.shutdown.timeout").increment(1);
            Err(StoreError::ShutdownTimeout(pending))
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// The action is reduced under the write lock and published to
        /// observers. Any effects the reducer returns are then run, and the
        /// actions they produce are reduced the same way, until nothing is
        /// left. `send()` returns after all of that, so the caller reads the
        /// final state right away.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            let _in_flight = InFlight::enter(&self.in_flight);

            if self.is_shutting_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let mut queue = VecDeque::from([action]);
            while let Some(action) = queue.pop_front() {
                for effect in self.apply(action).await {
                    if effect.is_none() {
                        continue;
                    }

                    metrics::counter!("store.effects.executed").increment(1);
                    // Its own task, so a panicking effect cannot take the caller down
                    match tokio::spawn(run_effect(effect)).await {
                        Ok(actions) => {
                            tracing::trace!(produced = actions.len(), "Effect completed");
                            queue.extend(actions);
                        },
                        Err(error) => {
                            tracing::warn!(%error, "Effect failed");
                            metrics::counter!("store.effects.failed").increment(1);
                        },
                    }
                }
            }

            tracing::debug!("Action processing completed");
            Ok(())
        }

        /// Reduce one action and publish it
        async fn apply(&self, action: A) -> SmallVec<[Effect<A>; 4]> {
            metrics::counter!("store.commands.total").increment(1);
            let observed = action.clone();

            let mut state = self.state.write().await;

            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut *state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());
            tracing::trace!("Reducer returned {} effects", effects.len());

            // Published before the lock is released, so observers see reduction order.
            // No receivers is the common case, not an error.
            let _ = self.action_broadcast.send(observed);

            effects
        }

        /// Subscribe to every action the store processes
        ///
        /// Actions arrive in the order the reducer applied them, and only
        /// after it did, so a subscriber that reads state on receipt sees the
        /// updated state. Slow subscribers lag and miss the oldest actions
        /// once the configured capacity is exceeded.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let item_count = store.state(|s| s.items.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                default_shutdown_timeout: self.default_shutdown_timeout,
                shutdown: Arc::clone(&self.shutdown),
                in_flight: Arc::clone(&self.in_flight),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
