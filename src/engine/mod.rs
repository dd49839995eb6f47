//! Timer engine
//!
//! [`TimerEngine`] is a cloneable handle to a coordinator task that owns the
//! active timer collection. Mutating calls travel over a channel and are
//! applied one at a time; each call returns after the new collection has been
//! written to the store. Reads are served from the latest published snapshot.

mod command;
mod coordinator;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{info, warn};

pub use command::Action;
use command::{Command, Reply};
use coordinator::Coordinator;

use crate::{
    error::{EngineError, Result},
    services::{Store, TIMERS_KEY},
    state::{group_by_category, GroupedTimers, HistoryEntry, NewTimer, Timer, TimerId},
};

const COMMAND_BUFFER: usize = 64;
const TICK_BUFFER: usize = 256;
const COMPLETION_BUFFER: usize = 100;

#[derive(Debug, Clone)]
pub struct TimerEngine {
    commands: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<Vec<Timer>>,
    completion_tx: broadcast::Sender<HistoryEntry>,
}

impl TimerEngine {
    /// Load the stored timer collection and start the coordinator.
    ///
    /// A missing `timers` blob yields an empty collection. Timers stored as
    /// running lost their countdown with the previous process and come back paused.
    /// Timers stored with nothing left are completed: they move to history.
    pub async fn load(store: Arc<dyn Store>) -> Result<Self> {
        let stored: Vec<Timer> = match store.get(TIMERS_KEY).await? {
            Some(blob) if !blob.trim().is_empty() => {
                serde_json::from_str(&blob).map_err(|source| EngineError::Corrupt {
                    key: TIMERS_KEY.to_string(),
                    source,
                })?
            }
            _ => Vec::new(),
        };

        let (finished, mut timers): (Vec<Timer>, Vec<Timer>) =
            stored.into_iter().partition(|t| t.remaining_time == 0);
        let pending_history: Vec<HistoryEntry> = finished
            .iter()
            .map(|timer| {
                warn!("Timer {} was stored with no time left, recording it as completed", timer.id);
                HistoryEntry::completed(timer)
            })
            .collect();

        for timer in timers.iter_mut().filter(|t| t.is_running) {
            warn!("Timer {} was running when last saved, restoring it as paused", timer.id);
            timer.mark_paused();
        }
        info!("Loaded {} timers", timers.len());

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (tick_tx, tick_rx) = mpsc::channel(TICK_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(timers.clone());
        let (completion_tx, _) = broadcast::channel(COMPLETION_BUFFER);

        let coordinator = Coordinator::new(
            store,
            timers,
            pending_history,
            tick_tx,
            snapshot_tx,
            completion_tx.clone(),
        );
        tokio::spawn(coordinator.run(command_rx, tick_rx));

        Ok(Self {
            commands: command_tx,
            snapshot_rx,
            completion_tx,
        })
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| EngineError::Stopped)?;
        response.await.map_err(|_| EngineError::Stopped)?
    }

    /// Validate form input and append a new, not-yet-started timer
    pub async fn create(&self, new_timer: NewTimer) -> Result<Timer> {
        let input = new_timer.validate()?;
        self.request(|reply| Command::Create { input, reply }).await
    }

    /// Apply one action to one timer. `Ok(None)` if no timer has this id.
    pub async fn apply(&self, action: Action, id: TimerId) -> Result<Option<Timer>> {
        self.request(|reply| Command::Apply { action, id, reply }).await
    }

    /// Apply one action to every timer in the collection
    pub async fn apply_all(&self, action: Action) -> Result<Vec<Timer>> {
        self.request(|reply| Command::ApplyAll { action, reply }).await
    }

    /// Begin counting down; no effect on a running timer
    pub async fn start(&self, id: TimerId) -> Result<Option<Timer>> {
        self.apply(Action::Start, id).await
    }

    /// Halt the countdown, keeping progress; no effect unless running
    pub async fn pause(&self, id: TimerId) -> Result<Option<Timer>> {
        self.apply(Action::Pause, id).await
    }

    /// Continue from the current remaining time
    pub async fn resume(&self, id: TimerId) -> Result<Option<Timer>> {
        self.apply(Action::Start, id).await
    }

    /// Restore the full duration and clear both run flags
    pub async fn reset(&self, id: TimerId) -> Result<Option<Timer>> {
        self.apply(Action::Reset, id).await
    }

    pub async fn start_all(&self) -> Result<Vec<Timer>> {
        self.apply_all(Action::Start).await
    }

    pub async fn pause_all(&self) -> Result<Vec<Timer>> {
        self.apply_all(Action::Pause).await
    }

    pub async fn reset_all(&self) -> Result<Vec<Timer>> {
        self.apply_all(Action::Reset).await
    }

    /// Completion history, oldest first
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.request(|reply| Command::History { reply }).await
    }

    /// Pause running timers, persist their progress and stop the coordinator.
    /// Every later call on any handle returns [`EngineError::Stopped`].
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Latest snapshot of the active collection
    pub fn timers(&self) -> Vec<Timer> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn timer(&self, id: TimerId) -> Option<Timer> {
        self.snapshot_rx.borrow().iter().find(|t| t.id == id).cloned()
    }

    /// Current timers grouped by lowercased category
    pub fn grouped(&self) -> GroupedTimers {
        group_by_category(&self.snapshot_rx.borrow())
    }

    /// Receive a fresh snapshot after every change, ticks included
    pub fn subscribe(&self) -> watch::Receiver<Vec<Timer>> {
        self.snapshot_rx.clone()
    }

    /// One message per completed timer
    pub fn completions(&self) -> broadcast::Receiver<HistoryEntry> {
        self.completion_tx.subscribe()
    }
}
