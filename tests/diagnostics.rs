//! Warnings logged when stores are used outside the dispatch flow.

use flux_store::{Payload, Store, StoreConfig};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, OnceLock,
};

struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn logger() -> &'static CapturingLogger {
    static LOGGER: OnceLock<&'static CapturingLogger> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let logger: &'static CapturingLogger = Box::leak(Box::new(CapturingLogger {
            records: Mutex::new(Vec::new()),
        }));
        log::set_logger(logger).expect("no other logger installed");
        log::set_max_level(LevelFilter::Trace);
        logger
    })
}

/// Warnings mentioning `store_name`.
fn warnings_for(store_name: &str) -> Vec<String> {
    logger()
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, message)| *level == Level::Warn && message.contains(store_name))
        .map(|(_, message)| message.clone())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Action {
    Add,
}

#[test]
fn update_outside_handler_warns_and_applies() {
    logger();
    let store: Store<Action> = Store::with_config(StoreConfig::new().name("outside-store"));
    let changes = Arc::new(AtomicUsize::new(0));
    let changes_clone = changes.clone();
    let _sub = store.subscribe(move || {
        changes_clone.fetch_add(1, Ordering::SeqCst);
    });

    store.set_state(json!({ "a": 1 })).unwrap();

    assert_eq!(store.get_state()["a"], 1);
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    let warnings = warnings_for("outside-store");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("set_state()"));

    store.replace_state(json!({ "b": 2 })).unwrap();

    assert_eq!(changes.load(Ordering::SeqCst), 2);
    let warnings = warnings_for("outside-store");
    assert_eq!(warnings.len(), 2);
    assert!(warnings[1].contains("replace_state()"));
}

#[test]
fn update_inside_handler_is_silent() {
    logger();
    let store: Store<Action> = Store::with_config(StoreConfig::new().name("inside-store"));
    store.register(Action::Add, |store, _, _| {
        store.set_state(json!({ "a": 1 }))?;
        Ok(())
    });

    store.handle(&Payload::new(Action::Add, json!({}))).unwrap();

    assert!(warnings_for("inside-store").is_empty());
}

#[test]
fn nested_dispatch_warns() {
    logger();
    let store: Store<Action> = Store::with_config(StoreConfig::new().name("nested-store"));
    store.register(Action::Add, |store, body, action| {
        assert!(store.handle(&Payload::new(action.clone(), body.clone())).is_err());
        Ok(())
    });

    store.handle(&Payload::new(Action::Add, json!({}))).unwrap();

    let warnings = warnings_for("nested-store");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("nested dispatch"));
}
