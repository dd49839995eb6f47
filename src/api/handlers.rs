//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{
    ApiResponse, GroupedResponse, HealthResponse, HistoryResponse, StatusResponse, TimerView,
    TimersResponse,
};
use crate::{
    engine::Action,
    error::EngineError,
    state::{AppState, NewTimer, TimerId},
};

/// Map an engine failure onto an HTTP status
fn error_status(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Corrupt { .. } | EngineError::Encode { .. } | EngineError::Stopped => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle GET /timers - List active timers
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Json<TimersResponse> {
    Json(TimersResponse::new(&state.engine.timers()))
}

/// Handle POST /timers - Create a timer from form input
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(new_timer): Json<NewTimer>,
) -> Result<(StatusCode, Json<TimerView>), StatusCode> {
    match state.engine.create(new_timer).await {
        Ok(timer) => {
            state.record_action("create");
            Ok((StatusCode::CREATED, Json(TimerView::from(&timer))))
        }
        Err(EngineError::Validation(e)) => {
            warn!("Rejected timer: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!("Failed to create timer: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle GET /timers/grouped - Timers grouped by category
pub async fn grouped_timers_handler(State(state): State<Arc<AppState>>) -> Json<GroupedResponse> {
    Json(GroupedResponse::from(&state.engine.grouped()))
}

async fn timer_action(
    state: &AppState,
    id: TimerId,
    action: Action,
    verb: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.engine.apply(action, id).await {
        Ok(Some(timer)) => {
            state.record_action(verb);
            info!("{} endpoint called for timer {}", verb, id);
            Ok(Json(ApiResponse::ok(format!("Timer {} {}", id, verb), &timer)))
        }
        Ok(None) => Ok(Json(ApiResponse::noop(format!("No timer with id {}", id)))),
        Err(e) => {
            error!("Failed to {} timer {}: {}", verb, id, e);
            Err(error_status(&e))
        }
    }
}

/// Handle POST /timers/:id/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_action(&state, id, Action::Start, "start").await
}

/// Handle POST /timers/:id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_action(&state, id, Action::Pause, "pause").await
}

/// Handle POST /timers/:id/resume
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_action(&state, id, Action::Start, "resume").await
}

/// Handle POST /timers/:id/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    timer_action(&state, id, Action::Reset, "reset").await
}

async fn bulk_action(
    state: &AppState,
    action: Action,
    verb: &str,
) -> Result<Json<TimersResponse>, StatusCode> {
    match state.engine.apply_all(action).await {
        Ok(timers) => {
            state.record_action(verb);
            info!("{} endpoint called - {} timers", verb, timers.len());
            Ok(Json(TimersResponse::new(&timers)))
        }
        Err(e) => {
            error!("Failed to {}: {}", verb, e);
            Err(error_status(&e))
        }
    }
}

/// Handle POST /timers/start-all
pub async fn start_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimersResponse>, StatusCode> {
    bulk_action(&state, Action::Start, "start-all").await
}

/// Handle POST /timers/pause-all
pub async fn pause_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimersResponse>, StatusCode> {
    bulk_action(&state, Action::Pause, "pause-all").await
}

/// Handle POST /timers/reset-all
pub async fn reset_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimersResponse>, StatusCode> {
    bulk_action(&state, Action::Reset, "reset-all").await
}

/// Handle GET /history - Completed timers, oldest first
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    match state.engine.history().await {
        Ok(entries) => Ok(Json(HistoryResponse { entries })),
        Err(e) => {
            error!("Failed to read history: {}", e);
            Err(error_status(&e))
        }
    }
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timers = state.engine.timers();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer_count: timers.len(),
        running_count: timers.iter().filter(|t| t.is_running).count(),
        paused_count: timers.iter().filter(|t| t.is_paused).count(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
