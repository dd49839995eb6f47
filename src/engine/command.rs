//! Messages sent from engine handles to the coordinator

use tokio::sync::oneshot;

use crate::{
    error::Result,
    state::{HistoryEntry, Timer, TimerId, ValidatedTimer},
};

pub(crate) type Reply<T> = oneshot::Sender<Result<T>>;

/// Which single-timer transition to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Reset,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Pause => "pause",
            Action::Reset => "reset",
        }
    }
}

pub(crate) enum Command {
    Create {
        input: ValidatedTimer,
        reply: Reply<Timer>,
    },
    Apply {
        action: Action,
        id: TimerId,
        reply: Reply<Option<Timer>>,
    },
    ApplyAll {
        action: Action,
        reply: Reply<Vec<Timer>>,
    },
    History {
        reply: Reply<Vec<HistoryEntry>>,
    },
    Shutdown {
        reply: Reply<()>,
    },
}
