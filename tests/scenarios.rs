use std::{sync::Arc, time::Duration};

use timer_keeper::{
    services::{FileStore, MemoryStore, HISTORY_KEY, TIMERS_KEY},
    NewTimer, Timer, TimerEngine, TimerStatus,
};

async fn after_seconds(n: u64) {
    tokio::time::sleep(Duration::from_millis(n * 1000 + 100)).await;
}

#[tokio::test(start_paused = true)]
async fn tea_timer_runs_to_completion() {
    let store = MemoryStore::new();
    let engine = TimerEngine::load(Arc::new(store.clone())).await.unwrap();

    let tea = engine.create(NewTimer::new("Tea", "Kitchen", "3")).await.unwrap();
    engine.start(tea.id).await.unwrap();
    after_seconds(3).await;

    assert!(engine.timers().is_empty());
    let history = engine.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "Tea");
    assert_eq!(history[0].id, tea.id);

    let stored: Vec<Timer> = serde_json::from_str(&store.blob(TIMERS_KEY).unwrap()).unwrap();
    assert!(stored.is_empty());
    assert!(store.blob(HISTORY_KEY).unwrap().contains("\"completedAt\""));
}

#[tokio::test]
async fn grouping_by_category() {
    let engine = TimerEngine::load(Arc::new(MemoryStore::new())).await.unwrap();
    engine.create(NewTimer::new("Standup", "Work", "900")).await.unwrap();
    engine.create(NewTimer::new("Dishes", "Home", "600")).await.unwrap();
    engine.create(NewTimer::new("Review", "work", "1200")).await.unwrap();

    let grouped = engine.grouped();
    assert_eq!(grouped.categories().collect::<Vec<_>>(), ["work", "home"]);

    let work: Vec<&str> = grouped.get("work").unwrap().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(work, ["Standup", "Review"]);
    assert_eq!(grouped.get("home").unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn pause_then_reset() {
    let engine = TimerEngine::load(Arc::new(MemoryStore::new())).await.unwrap();
    let id = engine.create(NewTimer::new("Stretch", "Health", "8")).await.unwrap().id;

    engine.start(id).await.unwrap();
    after_seconds(3).await;
    let paused = engine.pause(id).await.unwrap().unwrap();
    assert_eq!(paused.remaining_time, 5);

    let reset = engine.reset(id).await.unwrap().unwrap();
    assert_eq!(reset.remaining_time, 8);
    assert!(!reset.is_running);
    assert!(!reset.is_paused);
    assert_eq!(reset.status(), TimerStatus::NotStarted);
}

#[tokio::test(start_paused = true)]
async fn flags_never_both_set() {
    let engine = TimerEngine::load(Arc::new(MemoryStore::new())).await.unwrap();
    let mut snapshots = engine.subscribe();
    let a = engine.create(NewTimer::new("a", "x", "5")).await.unwrap().id;
    engine.create(NewTimer::new("b", "x", "9")).await.unwrap();

    let observer = tokio::spawn(async move {
        let mut seen = 0;
        while snapshots.changed().await.is_ok() {
            assert!(snapshots.borrow_and_update().iter().all(|t| !(t.is_running && t.is_paused)));
            seen += 1;
        }
        seen
    });

    engine.start_all().await.unwrap();
    after_seconds(2).await;
    engine.pause(a).await.unwrap();
    engine.start_all().await.unwrap();
    after_seconds(1).await;
    engine.pause_all().await.unwrap();
    engine.reset(a).await.unwrap();
    engine.resume(a).await.unwrap();
    after_seconds(6).await;

    drop(engine);
    assert!(observer.await.unwrap() > 0);
}

#[tokio::test]
async fn empty_store_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    let engine = TimerEngine::load(Arc::new(store)).await.unwrap();

    assert!(engine.timers().is_empty());
    assert!(engine.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn collection_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let store = FileStore::open(dir.path()).await.unwrap();
        let engine = TimerEngine::load(Arc::new(store)).await.unwrap();
        let a = engine.create(NewTimer::new("Bake", "Kitchen", "1800")).await.unwrap();
        let b = engine.create(NewTimer::new("Read", "Leisure", "600")).await.unwrap();
        engine.start(a.id).await.unwrap();
        vec![a, b]
    };

    let store = FileStore::open(dir.path()).await.unwrap();
    let engine = TimerEngine::load(Arc::new(store)).await.unwrap();
    let timers = engine.timers();

    assert_eq!(timers.iter().map(|t| t.id).collect::<Vec<_>>(), created.iter().map(|t| t.id).collect::<Vec<_>>());
    // the countdown did not survive, so the timer comes back paused
    assert_eq!(timers[0].status(), TimerStatus::Paused);
    assert_eq!(timers[1].status(), TimerStatus::NotStarted);
}
