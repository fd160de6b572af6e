//! Integration Tests for the Console
//!
//! Drives the console end to end with scripted input and checks every
//! JSON reply line.

use creek_cache::console::{run, ConsoleState};
use creek_cache::tasks::{shared, spawn_pressure_listener, PressurePolicy};
use creek_cache::{FloatKey, LruCache, SharedCache};
use serde_json::{json, Value};
use tokio::sync::mpsc;

// == Helper Functions ==

async fn run_script(cache: SharedCache, script: &str) -> Vec<Value> {
    let (tx, rx) = mpsc::channel(8);
    let listener = spawn_pressure_listener(cache.clone(), rx, PressurePolicy::default());
    let state = ConsoleState::new(cache, tx);

    let mut output = Vec::new();
    run(&state, script.as_bytes(), &mut output).await.unwrap();

    // Closing the channel lets the listener finish any queued clears
    drop(state);
    listener.await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// == Set / Get ==

#[tokio::test]
async fn test_set_then_get_round_trip() {
    let replies = run_script(
        shared(LruCache::new()),
        "set name creek\nget name\nget name text\nget missing\n",
    )
    .await;

    assert_eq!(replies[0], json!({"status": "stored", "key": "\"name\""}));
    assert_eq!(replies[1], json!({"status": "hit", "key": "\"name\"", "value": "creek"}));
    assert_eq!(replies[2]["status"], "hit");
    assert_eq!(replies[3], json!({"status": "miss", "key": "\"missing\""}));
}

#[tokio::test]
async fn test_integer_and_float_keys_coexist() {
    let cache = shared(LruCache::new());
    let replies = run_script(cache.clone(), "set 5 1\nset 5.0 2\ncount\nget 5\nget 5.0\n").await;

    assert_eq!(replies[2]["count"], 2);
    assert_eq!(replies[3]["value"], 1);
    assert_eq!(replies[4]["value"], 2);

    let mut cache = cache.lock().await;
    assert_eq!(cache.get::<i64, _>(&FloatKey::from(5.0)), Some(&2));
}

// == Eviction ==

#[tokio::test]
async fn test_eviction_order_with_limit() {
    let replies = run_script(
        shared(LruCache::with_count_limit(3)),
        "set a 1\nset b 2\nset c 3\nset d 4\nget a\nget b\nget c\nget d\n",
    )
    .await;

    assert_eq!(replies[4]["status"], "miss");
    assert_eq!(replies[5]["status"], "hit");
    assert_eq!(replies[6]["status"], "hit");
    assert_eq!(replies[7]["status"], "hit");
}

#[tokio::test]
async fn test_promotion_defers_eviction() {
    let replies = run_script(
        shared(LruCache::new()),
        "limit 3\nset a 1\nset b 2\nset c 3\nget a\nset d 4\nkeys\n",
    )
    .await;

    assert_eq!(
        replies[6],
        json!({"status": "keys", "keys": ["\"d\"", "\"a\"", "\"c\""]})
    );
}

#[tokio::test]
async fn test_lowering_limit_evicts_immediately() {
    let replies = run_script(
        shared(LruCache::new()),
        "set 1 a\nset 2 b\nset 3 c\nset 4 d\nlimit 2\nkeys\nlimit -1\nlimit\n",
    )
    .await;

    assert_eq!(replies[4], json!({"status": "count", "count": 2, "count_limit": 2}));
    assert_eq!(replies[5]["keys"], json!(["4", "3"]));
    assert_eq!(replies[6], json!({"error": "Count limit must not be negative: -1"}));
    assert_eq!(replies[7]["count_limit"], 2);
}

// == Type Mismatch ==

#[tokio::test]
async fn test_type_mismatch_leaves_order_alone() {
    let replies = run_script(
        shared(LruCache::new()),
        "set x 7\nset y 8\nget x text\nkeys\nget x int\nkeys\nstats\n",
    )
    .await;

    assert_eq!(replies[2]["status"], "miss");
    assert_eq!(replies[3]["keys"], json!(["\"y\"", "\"x\""]));
    assert_eq!(replies[4]["value"], 7);
    assert_eq!(replies[5]["keys"], json!(["\"x\"", "\"y\""]));
    assert_eq!(replies[6]["hits"], 1);
    assert_eq!(replies[6]["misses"], 1);
}

// == Removal ==

#[tokio::test]
async fn test_remove_absent_key_and_clear() {
    let replies = run_script(
        shared(LruCache::new()),
        "set 1 a\nset 2 b\ndel 999\ncount\nclear\nclear\ncount\n",
    )
    .await;

    assert_eq!(replies[2]["removed"], false);
    assert_eq!(replies[3]["count"], 2);
    assert_eq!(replies[4]["dropped"], 2);
    assert_eq!(replies[5]["dropped"], 0);
    assert_eq!(replies[6]["count"], 0);
}

// == Pressure Events ==

#[tokio::test]
async fn test_pressure_event_clears_cache() {
    let cache = shared(LruCache::new());
    let replies = run_script(cache.clone(), "set 1 a\nset 2 b\npressure memory\n").await;

    assert_eq!(replies[2], json!({"status": "queued", "event": "memory_warning"}));
    // run_script waits for the listener, so the clear has happened
    assert_eq!(cache.lock().await.count(), 0);
}

// == Errors ==

#[tokio::test]
async fn test_bad_commands_report_errors_and_continue() {
    let replies = run_script(shared(LruCache::new()), "bogus\nset lonely\npressure lunch\ncount\n").await;

    assert_eq!(replies.len(), 4);
    assert_eq!(replies[0], json!({"error": "Invalid command: unknown command 'bogus'"}));
    assert!(replies[1]["error"].as_str().unwrap().contains("usage: set"));
    assert!(replies[2]["error"].as_str().unwrap().contains("lunch"));
    assert_eq!(replies[3]["count"], 0);
}
