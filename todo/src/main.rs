//! Scripted demo of the todo list.
//!
//! Drives a store the way a UI would: typing goes into the buffers, Enter
//! and Escape are mapped to actions, and a frame is printed after each
//! step. Set `RUST_LOG=debug` to see ignored inputs.

use composable_todo_runtime::Store;
use todo::input::{Focus, Key, action_for_key};
use todo::{TodoAction, TodoEnvironment, TodoReducer, TodoState, view};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

async fn press(store: &TodoStore, key: Key) -> Result<(), Box<dyn std::error::Error>> {
    let focus = store.state(Focus::of).await;
    if let Some(action) = action_for_key(focus, key) {
        store.send(action).await?;
    }
    Ok(())
}

async fn show(store: &TodoStore, caption: &str) {
    let frame = store.state(view::render).await;
    println!("--- {caption} ---\n{frame}");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let store = Store::new(TodoState::new(), TodoReducer::new(), TodoEnvironment::production());
    show(&store, "start").await;

    for text in ["Buy milk", "Write documentation", "   ", "Deploy to production"] {
        store
            .send(TodoAction::UpdateDraft {
                text: text.to_string(),
            })
            .await?;
        press(&store, Key::Enter).await?;
    }
    show(&store, "after typing four entries (one blank)").await;

    let ids: Vec<_> = store.state(|s| s.iter().map(|item| item.id).collect()).await;
    let [milk, docs, deploy] = ids[..] else {
        return Err("expected three items".into());
    };

    store.send(TodoAction::ToggleComplete { id: milk }).await?;
    show(&store, "completed 'Buy milk'").await;

    let current_text = store
        .state(|s| s.get(docs).map(|item| item.text.clone()))
        .await
        .unwrap_or_default();
    store
        .send(TodoAction::StartEdit { id: docs, current_text })
        .await?;
    store
        .send(TodoAction::UpdateEditBuffer {
            text: "  ".to_string(),
        })
        .await?;
    press(&store, Key::Enter).await?;
    show(&store, "blank edit is not saved").await;

    store
        .send(TodoAction::UpdateEditBuffer {
            text: "Write the README".to_string(),
        })
        .await?;
    press(&store, Key::Enter).await?;
    show(&store, "edit saved").await;

    store.send(TodoAction::Delete { id: deploy }).await?;
    show(&store, "deleted 'Deploy to production'").await;

    let snapshot = store.state(serde_json::to_string_pretty::<TodoState>).await?;
    println!("--- state ---\n{snapshot}");

    store.shutdown_default().await?;
    Ok(())
}
