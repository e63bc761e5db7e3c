//! Integration tests for the todo list running inside a Store
//!
//! These drive the same flows a presentation layer would: send actions,
//! read state, observe processed actions.

use composable_todo_runtime::{Store, StoreError};
use composable_todo_testing::SequentialIdGenerator;
use std::sync::Arc;
use todo::input::{Focus, Key, action_for_key};
use todo::{TodoAction, TodoEnvironment, TodoId, TodoReducer, TodoState, TodoStats};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

fn new_store() -> TodoStore {
    let env = TodoEnvironment::new(Arc::new(SequentialIdGenerator::new()));
    Store::new(TodoState::new(), TodoReducer::new(), env)
}

fn add(text: &str) -> TodoAction {
    TodoAction::Add {
        text: text.to_string(),
    }
}

#[tokio::test]
async fn buy_milk_lifecycle() -> Result<(), StoreError> {
    let store = new_store();

    store.send(add("Buy milk")).await?;
    let item = store.state(|s| s.items.clone()).await;
    assert_eq!(item.len(), 1);
    assert_eq!(item[0].text, "Buy milk");
    assert!(!item[0].completed);
    let id = item[0].id;

    store.send(TodoAction::ToggleComplete { id }).await?;
    assert_eq!(
        store.state(TodoState::stats).await,
        TodoStats {
            total: 1,
            completed: 1,
            pending: 0,
        }
    );

    store
        .send(TodoAction::StartEdit {
            id,
            current_text: "Buy milk".to_string(),
        })
        .await?;
    store.send(TodoAction::SaveEdit { id }).await?;
    let item = store.state(|s| s.get(id).cloned()).await;
    assert!(matches!(item, Some(ref i) if i.text == "Buy milk" && !i.is_editing));

    store.send(TodoAction::Delete { id }).await?;
    assert!(store.state(|s| s.items.is_empty()).await);
    assert_eq!(store.state(TodoState::stats).await, TodoStats::default());
    Ok(())
}

#[tokio::test]
async fn delete_keeps_survivor_id() -> Result<(), StoreError> {
    let store = new_store();

    store.send(add("A")).await?;
    store.send(add("B")).await?;
    let ids: Vec<TodoId> = store.state(|s| s.iter().map(|i| i.id).collect()).await;
    assert_eq!(store.state(|s| s.items[0].text.clone()).await, "A");

    store.send(TodoAction::Delete { id: ids[0] }).await?;

    let remaining = store.state(|s| s.items.clone()).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "B");
    assert_eq!(remaining[0].id, ids[1]);
    Ok(())
}

#[tokio::test]
async fn keyboard_flow() -> Result<(), StoreError> {
    let store = new_store();

    async fn press(store: &TodoStore, key: Key) -> Result<(), StoreError> {
        let focus = store.state(Focus::of).await;
        if let Some(action) = action_for_key(focus, key) {
            store.send(action).await?;
        }
        Ok(())
    }

    store
        .send(TodoAction::UpdateDraft {
            text: "Write docs".to_string(),
        })
        .await?;
    press(&store, Key::Enter).await?;
    assert!(store.state(|s| s.draft.is_empty()).await);

    let id = store.state(|s| s.items[0].id).await;
    store
        .send(TodoAction::StartEdit {
            id,
            current_text: "Write docs".to_string(),
        })
        .await?;
    store
        .send(TodoAction::UpdateEditBuffer {
            text: "Write better docs".to_string(),
        })
        .await?;
    press(&store, Key::Escape).await?;

    let item = store.state(|s| s.items[0].clone()).await;
    assert_eq!(item.text, "Write docs");
    assert!(!item.is_editing);

    store
        .send(TodoAction::StartEdit {
            id,
            current_text: item.text,
        })
        .await?;
    store
        .send(TodoAction::UpdateEditBuffer {
            text: "Write better docs".to_string(),
        })
        .await?;
    press(&store, Key::Enter).await?;
    assert_eq!(store.state(|s| s.items[0].text.clone()).await, "Write better docs");
    Ok(())
}

#[tokio::test]
async fn observers_see_every_action_in_order() -> Result<(), StoreError> {
    let store = new_store();
    let mut rx = store.subscribe_actions();

    store.send(add("A")).await?;
    store.send(add("  ")).await?;
    store.send(TodoAction::Delete { id: TodoId::new(99) }).await?;

    let mut seen = Vec::new();
    while let Ok(action) = rx.try_recv() {
        seen.push(action);
    }
    assert_eq!(
        seen,
        vec![add("A"), add("  "), TodoAction::Delete { id: TodoId::new(99) }]
    );
    assert_eq!(store.state(|s| s.items.len()).await, 1);
    Ok(())
}

#[tokio::test]
#[allow(clippy::panic)]
async fn concurrent_adds_get_distinct_ids() {
    let store = new_store();

    let handles: Vec<_> = (0..20)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                let _ = store.send(add(&format!("task {n}"))).await;
            })
        })
        .collect();

    for handle in handles {
        if let Err(e) = handle.await {
            panic!("concurrent add task panicked: {e}");
        }
    }

    let mut ids: Vec<u64> = store.state(|s| s.iter().map(|i| i.id.get()).collect()).await;
    assert_eq!(ids.len(), 20);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn production_environment_assigns_unique_ids() -> Result<(), StoreError> {
    let store = Store::new(TodoState::new(), TodoReducer::new(), TodoEnvironment::production());

    for n in 0..50 {
        store.send(add(&format!("item {n}"))).await?;
    }

    let ids: Vec<TodoId> = store.state(|s| s.iter().map(|i| i.id).collect()).await;
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}
