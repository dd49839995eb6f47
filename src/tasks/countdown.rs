//! Per-timer countdown task

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::state::TimerId;

/// One countdown step
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// "One second elapsed for timer `id`", tagged with the run it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub id: TimerId,
    /// Run counter assigned by the coordinator when the countdown started
    pub generation: u64,
}

/// Emit one tick per elapsed second until aborted or the coordinator goes away.
///
/// Deadlines are anchored to the moment the countdown started, so a late
/// wake-up is followed by catch-up ticks rather than shifting every later tick.
pub async fn countdown_task(id: TimerId, generation: u64, ticks: mpsc::Sender<Tick>) {
    debug!("Countdown {} started for timer {}", generation, id);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        interval.tick().await;
        if ticks.send(Tick { id, generation }).await.is_err() {
            debug!("Coordinator gone, stopping countdown for timer {}", id);
            break;
        }
    }
}
