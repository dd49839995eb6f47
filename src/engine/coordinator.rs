//! Single owner of the active timer collection
//!
//! User commands and countdown ticks arrive on two channels and are handled one
//! at a time, so every read-modify-write of the collection (and the store
//! writes that follow it) happens in a fixed order.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use super::command::{Action, Command};
use crate::{
    error::{EngineError, Result},
    services::{Store, HISTORY_KEY, TIMERS_KEY},
    state::{HistoryEntry, TickOutcome, Timer, TimerId, ValidatedTimer},
    tasks::{countdown_task, Tick},
};

/// Running countdown for one timer
struct Countdown {
    generation: u64,
    task: JoinHandle<()>,
}

pub(crate) struct Coordinator {
    store: Arc<dyn Store>,
    timers: Vec<Timer>,
    countdowns: HashMap<TimerId, Countdown>,
    next_generation: u64,
    last_id: TimerId,
    /// Completions not yet written to the history collection
    pending_history: Vec<HistoryEntry>,
    tick_tx: mpsc::Sender<Tick>,
    snapshot_tx: watch::Sender<Vec<Timer>>,
    completion_tx: broadcast::Sender<HistoryEntry>,
}

impl Coordinator {
    pub(crate) fn new(
        store: Arc<dyn Store>,
        timers: Vec<Timer>,
        pending_history: Vec<HistoryEntry>,
        tick_tx: mpsc::Sender<Tick>,
        snapshot_tx: watch::Sender<Vec<Timer>>,
        completion_tx: broadcast::Sender<HistoryEntry>,
    ) -> Self {
        let last_id = timers.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            store,
            timers,
            countdowns: HashMap::new(),
            next_generation: 0,
            last_id,
            pending_history,
            tick_tx,
            snapshot_tx,
            completion_tx,
        }
    }

    /// Serve commands and ticks until shut down or every engine handle is dropped
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut ticks: mpsc::Receiver<Tick>,
    ) {
        info!("Timer coordinator started with {} timers", self.timers.len());

        if !self.pending_history.is_empty() {
            if let Err(e) = self.commit().await {
                error!("Failed to persist timers completed before load: {}", e);
            }
        }

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command).await {
                            break;
                        }
                    }
                    None => {
                        if let Err(e) = self.park().await {
                            error!("Failed to persist timers on exit: {}", e);
                        }
                        break;
                    }
                },
                Some(tick) = ticks.recv() => self.on_tick(tick).await,
            }
        }

        info!("Timer coordinator stopped");
    }

    /// Stop every countdown, keep running timers' progress as paused and persist
    async fn park(&mut self) -> Result<()> {
        for (_, countdown) in self.countdowns.drain() {
            countdown.task.abort();
        }
        let mut parked = 0;
        for timer in self.timers.iter_mut().filter(|t| t.is_running) {
            timer.mark_paused();
            parked += 1;
        }
        info!("Parked {} running timers", parked);
        self.commit().await
    }

    /// Returns false once the coordinator should stop
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Create { input, reply } => {
                let timer = self.create(input);
                let result = self.commit().await.map(|()| timer);
                let _ = reply.send(result);
            }
            Command::Apply { action, id, reply } => {
                let updated = self.apply(action, id);
                let result = self.commit().await.map(|()| updated);
                let _ = reply.send(result);
            }
            Command::ApplyAll { action, reply } => {
                let ids: Vec<TimerId> = self.timers.iter().map(|t| t.id).collect();
                let changed = ids
                    .into_iter()
                    .filter(|id| self.transition(action, *id))
                    .count();
                info!("{} all: {} timers changed", action.as_str(), changed);
                let result = self.commit().await.map(|()| self.timers.clone());
                let _ = reply.send(result);
            }
            Command::History { reply } => {
                if let Err(e) = self.flush_history().await {
                    warn!("{} completions still unrecorded: {}", self.pending_history.len(), e);
                }
                let result = self.load_history().await.map(|mut history| {
                    history.extend(self.pending_history.iter().cloned());
                    history
                });
                let _ = reply.send(result);
            }
            Command::Shutdown { reply } => {
                let _ = reply.send(self.park().await);
                return false;
            }
        }
        true
    }

    fn create(&mut self, input: ValidatedTimer) -> Timer {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut id = now.max(self.last_id.saturating_add(1));
        while self.timers.iter().any(|t| t.id == id) {
            id = id.wrapping_add(1);
        }
        self.last_id = self.last_id.max(id);

        let timer = Timer::new(id, input);
        info!(
            "Created timer {} '{}' ({}s, category '{}')",
            timer.id, timer.name, timer.duration, timer.category
        );
        self.timers.push(timer.clone());
        timer
    }

    /// Apply a single-timer action; `None` when the id is unknown
    fn apply(&mut self, action: Action, id: TimerId) -> Option<Timer> {
        if !self.timers.iter().any(|t| t.id == id) {
            debug!("{} ignored: no timer with id {}", action.as_str(), id);
            return None;
        }
        self.transition(action, id);
        self.timers.iter().find(|t| t.id == id).cloned()
    }

    /// Returns whether the timer changed state
    fn transition(&mut self, action: Action, id: TimerId) -> bool {
        let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) else {
            return false;
        };

        match action {
            Action::Start => {
                if timer.is_running {
                    debug!("Timer {} already running", id);
                    return false;
                }
                timer.mark_running();
                info!("Timer {} started at {}s remaining", id, timer.remaining_time);
                self.spawn_countdown(id);
                true
            }
            Action::Pause => {
                if !timer.is_running {
                    return false;
                }
                timer.mark_paused();
                info!("Timer {} paused at {}s remaining", id, timer.remaining_time);
                self.cancel_countdown(id);
                true
            }
            Action::Reset => {
                timer.reset();
                info!("Timer {} reset to {}s", id, timer.duration);
                self.cancel_countdown(id);
                true
            }
        }
    }

    fn spawn_countdown(&mut self, id: TimerId) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let task = tokio::spawn(countdown_task(id, generation, self.tick_tx.clone()));
        if let Some(previous) = self.countdowns.insert(id, Countdown { generation, task }) {
            warn!("Timer {} had a stale countdown, aborting it", id);
            previous.task.abort();
        }
    }

    /// After this returns no tick for `id`'s current run is applied
    fn cancel_countdown(&mut self, id: TimerId) {
        if let Some(countdown) = self.countdowns.remove(&id) {
            countdown.task.abort();
            debug!("Countdown {} for timer {} cancelled", countdown.generation, id);
        }
    }

    async fn on_tick(&mut self, tick: Tick) {
        // Ticks already queued when a countdown was cancelled carry an old generation
        match self.countdowns.get(&tick.id) {
            Some(countdown) if countdown.generation == tick.generation => {}
            _ => {
                debug!("Dropping stale tick for timer {}", tick.id);
                return;
            }
        }

        let Some(index) = self.timers.iter().position(|t| t.id == tick.id) else {
            self.cancel_countdown(tick.id);
            return;
        };

        match self.timers[index].tick() {
            TickOutcome::Counting(remaining) => {
                debug!("Timer {} at {}s", tick.id, remaining);
                self.publish();
            }
            TickOutcome::Completed => self.complete(index).await,
        }
    }

    /// Record a finished timer in history and drop it from the active collection
    async fn complete(&mut self, index: usize) {
        let timer = self.timers.remove(index);
        self.cancel_countdown(timer.id);
        let entry = HistoryEntry::completed(&timer);
        info!("Timer {} '{}' completed at {}", timer.id, timer.name, entry.completed_at);

        self.pending_history.push(entry.clone());
        if let Err(e) = self.commit().await {
            error!("Failed to persist timers after completing {}: {}", timer.id, e);
        }

        // Nobody listening is fine
        let _ = self.completion_tx.send(entry);
    }

    /// Append pending completions to the stored history. Kept for the next
    /// write when the store rejects them.
    async fn flush_history(&mut self) -> Result<()> {
        if self.pending_history.is_empty() {
            return Ok(());
        }

        let mut history = self.load_history().await?;
        history.extend(self.pending_history.iter().cloned());
        let blob = serde_json::to_string(&history).map_err(|source| EngineError::Encode {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        self.store.set(HISTORY_KEY, &blob).await?;

        debug!("Recorded {} completions", self.pending_history.len());
        self.pending_history.clear();
        Ok(())
    }

    async fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        match self.store.get(HISTORY_KEY).await? {
            Some(blob) if !blob.trim().is_empty() => {
                serde_json::from_str(&blob).map_err(|source| EngineError::Corrupt {
                    key: HISTORY_KEY.to_string(),
                    source,
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Publish the new snapshot, record pending completions, then overwrite
    /// the stored collection with the snapshot
    async fn commit(&mut self) -> Result<()> {
        self.publish();

        if let Err(e) = self.flush_history().await {
            error!("Failed to record {} completions: {}", self.pending_history.len(), e);
        }

        let blob = serde_json::to_string(&self.timers).map_err(|source| EngineError::Encode {
            key: TIMERS_KEY.to_string(),
            source,
        })?;
        if let Err(e) = self.store.set(TIMERS_KEY, &blob).await {
            warn!("Failed to persist {} timers: {}", self.timers.len(), e);
            return Err(e.into());
        }
        Ok(())
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.timers.clone());
    }
}
