use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use sqlmeta::prelude::*;

#[test]
fn concurrent_first_resolution_runs_hook_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let classes = ClassTable::new();
    {
        let calls = Arc::clone(&calls);
        classes.register_model("model_hot", move |meta: &mut MetaBuilder| {
            calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            meta.field("id", Primary::new()).field("name", Text::new());
        });
    }
    let registry = MetadataRegistry::new(classes);
    let registry = &registry;

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(move || registry.resolve("hot").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let first = &results[0];
    assert!(results.iter().all(|meta| Arc::ptr_eq(first, meta)));
    assert_eq!(first.fields().len(), 2);
}

#[test]
fn unrelated_models_register_independently() {
    let (tx, rx) = mpsc::channel::<()>();
    let rx = Mutex::new(rx);
    let unblocked = Arc::new(AtomicBool::new(false));

    let classes = ClassTable::new();
    {
        let unblocked = Arc::clone(&unblocked);
        // Blocks until the other model has registered.
        classes.register_model("model_slow", move |meta: &mut MetaBuilder| {
            let got = rx
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .is_ok();
            unblocked.store(got, Ordering::SeqCst);
            meta.field("id", Primary::new());
        });
    }
    classes.register_model("model_fast", |meta: &mut MetaBuilder| {
        meta.field("id", Primary::new());
    });
    let registry = MetadataRegistry::new(classes);

    thread::scope(|s| {
        let slow = s.spawn(|| registry.resolve("slow").unwrap());
        thread::sleep(Duration::from_millis(20));
        registry.resolve("fast").unwrap();
        tx.send(()).unwrap();
        slow.join().unwrap();
    });

    assert!(unblocked.load(Ordering::SeqCst));
    assert_eq!(
        registry.registered(),
        vec!["fast".to_string(), "slow".to_string()]
    );
}

#[test]
fn reset_allows_fresh_registration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let classes = ClassTable::new();
    {
        let calls = Arc::clone(&calls);
        classes.register_model("model_note", move |meta: &mut MetaBuilder| {
            calls.fetch_add(1, Ordering::SeqCst);
            meta.field("id", Primary::new());
        });
    }
    let registry = MetadataRegistry::new(classes);

    registry.resolve("note").unwrap();
    registry.resolve("note").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    registry.reset();
    registry.resolve("note").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
