//! HTTP handlers for the launch board.
//!
//! Every handler reads the snapshot store exactly once, so all fields of a
//! response come from the same generation.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    Json,
};
use futures::stream::Stream;

use super::dto::{HealthResponse, NextLaunchResponse, SnapshotResponse, StatusResponse};
use super::error::AppError;
use super::page;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Liveness probe. Always 200; `ready` tells whether data has been published.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        ready: state.query.current().is_some(),
    })
}

// =============================================================================
// Page
// =============================================================================

/// GET /
///
/// The launch table and map, or a loading placeholder (503) before the first
/// publish.
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let Some(snapshot) = state.query.current() else {
        return Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Html(page::render_loading(state.page_refresh_secs)),
        )
            .into_response());
    };

    let html = page::render_page(&snapshot, state.query.now(), state.page_refresh_secs)?;
    Ok(Html(html).into_response())
}

// =============================================================================
// Launch Data
// =============================================================================

/// GET /v1/launches
///
/// The whole current snapshot with per-launch countdowns.
pub async fn list_launches(State(state): State<AppState>) -> HandlerResult<SnapshotResponse> {
    let snapshot = state.query.current().ok_or(AppError::NotReady)?;
    Ok(Json(SnapshotResponse::from_snapshot(
        &snapshot,
        state.query.now(),
    )))
}

/// GET /v1/launches/next
///
/// The next launch with its countdown, and the time of the last refresh.
/// Both come from one snapshot read; `launch` is null for an empty window.
pub async fn next_launch(State(state): State<AppState>) -> HandlerResult<NextLaunchResponse> {
    let snapshot = state.query.current().ok_or(AppError::NotReady)?;
    Ok(Json(NextLaunchResponse::from_snapshot(
        &snapshot,
        state.query.now(),
    )))
}

/// GET /v1/status
///
/// Scheduler state, current generation and refresh counters.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.query.current();

    Json(StatusResponse {
        scheduler: state.monitor.state(),
        generation: snapshot.as_ref().map_or(0, |s| s.generation()),
        last_refresh: snapshot.as_ref().map(|s| s.generated_at()),
        fingerprint: snapshot.as_ref().map(|s| s.fingerprint().to_string()),
        launch_count: snapshot.as_ref().map_or(0, |s| s.launches().len()),
        stats: state.monitor.stats(),
    })
}

/// GET /v1/launches/stream
///
/// Server-Sent Events: the current snapshot on connect (if any), then one
/// `snapshot` event per newly published generation. A slow client skips
/// straight to the latest generation.
pub async fn stream_launches(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let query = state.query.clone();
    let mut generations = query.reader().subscribe();

    let stream = async_stream::stream! {
        let mut last_sent = 0;
        loop {
            if let Some(snapshot) = query.current() {
                if snapshot.generation() > last_sent {
                    last_sent = snapshot.generation();
                    let body = SnapshotResponse::from_snapshot(&snapshot, query.now());
                    yield Ok(Event::default()
                        .event("snapshot")
                        .id(last_sent.to_string())
                        .data(serde_json::to_string(&body).unwrap_or_default()));
                }
            }

            if generations.changed().await.is_err() {
                // Writer dropped: no further generations will arrive.
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
