//! Todo store driven by dispatched actions.
//!
//! Run with `RUST_LOG=debug cargo run --example counter` to see the store's
//! log output, including the warning for the direct update at the end.

use flux_store::{Payload, Store, StoreConfig};
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TodoAction {
    Add,
    Complete,
}

fn main() {
    env_logger::init();

    println!("=== Flux Store Example ===\n");

    let store: Store<TodoAction> = Store::with_config(StoreConfig::new().name("todos"));

    store.register(TodoAction::Add, |store, body: &Value, _| {
        let mut todos = store
            .get_state()
            .get("todos")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        todos.push(json!({ "text": body["text"].clone(), "completed": false }));

        // Two updates, one change event
        store.set_state(json!({ "todos": todos }))?;
        store.set_state(json!({ "last_action": "add" }))?;
        Ok(())
    });

    store.register(TodoAction::Complete, |store, body: &Value, _| {
        let index = body["index"].as_u64().ok_or("missing index")? as usize;
        let mut todos = store
            .get_state()
            .get("todos")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let todo = todos.get_mut(index).ok_or("no such todo")?;
        todo["completed"] = json!(true);

        store.set_state(json!({ "todos": todos, "last_action": "complete" }))?;
        Ok(())
    });

    let weak = store.downgrade();
    let _subscription = store.subscribe(move || {
        if let Some(store) = weak.upgrade() {
            let state = store.get_state();
            let active = state
                .get("todos")
                .and_then(Value::as_array)
                .map(|todos| todos.iter().filter(|t| t["completed"] == false).count())
                .unwrap_or(0);
            println!("State updated! Active todos: {}", active);
        }
    });

    println!("Adding todos...");
    for text in ["Learn Flux", "Write a store"] {
        if let Err(err) = store.handle(&Payload::new(TodoAction::Add, json!({ "text": text }))) {
            eprintln!("add failed: {}", err);
        }
    }

    println!("\nCompleting todo...");
    if let Err(err) = store.handle(&Payload::new(TodoAction::Complete, json!({ "index": 0 }))) {
        eprintln!("complete failed: {}", err);
    }

    println!("\nCompleting a todo that does not exist...");
    if let Err(err) = store.handle(&Payload::new(TodoAction::Complete, json!({ "index": 9 }))) {
        eprintln!("complete failed: {}", err);
    }

    println!("\nUpdating directly (logs a warning)...");
    if let Err(err) = store.set_state(json!({ "last_action": "direct" })) {
        eprintln!("direct update failed: {}", err);
    }

    println!("\nFinal state: {:#}", Value::Object(store.get_state()));
}
