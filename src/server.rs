//! HTTP API for the journal.
//!
//! Every route authenticates a bearer token, resolves it to an owner key, and
//! scopes the operation to that owner. Database work is synchronous rusqlite
//! behind a mutex, run on the blocking pool.
//!
//! Routes:
//! - `POST /v1/logs` — append a live entry
//! - `GET  /v1/logs/today` — today's live entries
//! - `GET  /v1/logs/{day}` — live entries for a day
//! - `POST /v1/archive` — fold today's entries into the day batch
//! - `GET  /v1/archives` — archived days, newest first
//! - `GET  /v1/archives/{batch_id}` — one archived day
//! - `PUT  /v1/summaries/{day}` / `GET /v1/summaries/{day}` — daily summary

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::config::DaybookConfig;
use crate::error::JournalError;
use crate::journal::archive::ArchiveOutcome;
use crate::journal::types::{ArchivedDay, DailySummary};
use crate::{db, identity, journal};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

/// Start the HTTP server. Blocks until ctrl-c.
pub async fn serve(config: DaybookConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let conn = db::open_database(config.resolved_db_path())?;
    let state = AppState::new(conn);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "journal API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

/// Build the API router. Split out from [`serve`] so tests can drive it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/logs", post(append_log))
        .route("/v1/logs/today", get(live_today))
        .route("/v1/logs/{day}", get(live_day))
        .route("/v1/archive", post(archive_today))
        .route("/v1/archives", get(archived_days))
        .route("/v1/archives/{batch_id}", get(archived_day))
        .route("/v1/summaries/{day}", put(put_summary).get(get_summary))
        .with_state(state)
}

impl AppState {
    /// Construct state around an already-open database (tests).
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

enum ApiError {
    Journal(JournalError),
    NotFound,
    Internal(String),
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        ApiError::Journal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Journal(JournalError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Journal(JournalError::Auth(msg)) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Journal(err) => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage failure".into())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".into()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal failure".into())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Pull the bearer token out of the Authorization header. Missing or
/// malformed headers resolve as an empty token, which the identity layer
/// rejects as `Auth`.
fn bearer_token(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
        .to_string()
}

/// Run an owner-scoped closure against the database on the blocking pool.
async fn with_owner<T, F>(state: AppState, headers: HeaderMap, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection, &str) -> Result<T, JournalError> + Send + 'static,
{
    let token = bearer_token(&headers);
    tokio::task::spawn_blocking(move || {
        let mut conn = state
            .db
            .lock()
            .map_err(|e| ApiError::Internal(format!("db lock poisoned: {e}")))?;
        let owner = identity::resolve_owner(&conn, &token)?;
        f(&mut conn, &owner).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("db task failed: {e}")))?
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AppendBody {
    text: String,
}

#[derive(Serialize)]
struct AppendResponse {
    id: String,
}

async fn append_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AppendBody>,
) -> Result<(StatusCode, Json<AppendResponse>), ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    let id = with_owner(state, headers, move |conn, owner| {
        journal::store::append_entry(conn, owner, &body.text, now_ms)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(AppendResponse { id })))
}

#[derive(Serialize)]
struct LiveEntry {
    text: String,
    captured_at: i64,
}

async fn live_today(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<LiveEntry>>, ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    let entries = with_owner(state, headers, move |conn, owner| {
        journal::retrieve::live_today(conn, owner, now_ms)
    })
    .await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| LiveEntry {
                text: e.text,
                captured_at: e.captured_at,
            })
            .collect(),
    ))
}

async fn live_day(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(day): Path<String>,
) -> Result<Json<Vec<LiveEntry>>, ApiError> {
    let entries = with_owner(state, headers, move |conn, owner| {
        journal::retrieve::live_day(conn, owner, &day)
    })
    .await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| LiveEntry {
                text: e.text,
                captured_at: e.captured_at,
            })
            .collect(),
    ))
}

async fn archive_today(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ArchiveOutcome>, ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    let outcome = with_owner(state, headers, move |conn, owner| {
        journal::archive::archive_today(conn, owner, now_ms)
    })
    .await?;
    Ok(Json(outcome))
}

async fn archived_days(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ArchivedDay>>, ApiError> {
    let days = with_owner(state, headers, |conn, owner| {
        journal::retrieve::archived_days(conn, owner)
    })
    .await?;
    Ok(Json(days))
}

#[derive(Serialize)]
struct BatchResponse {
    day: String,
    entries: Vec<String>,
    created_at: i64,
}

async fn archived_day(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(batch_id): Path<String>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = with_owner(state, headers, move |conn, owner| {
        journal::retrieve::archived_day(conn, &batch_id, owner)
    })
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(BatchResponse {
        day: batch.day,
        entries: batch.entries,
        created_at: batch.created_at,
    }))
}

#[derive(Deserialize)]
struct SummaryBody {
    summary: String,
}

#[derive(Serialize)]
struct SummaryIdResponse {
    id: String,
}

async fn put_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(day): Path<String>,
    Json(body): Json<SummaryBody>,
) -> Result<Json<SummaryIdResponse>, ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    let id = with_owner(state, headers, move |conn, owner| {
        journal::summary::save_summary(conn, owner, &day, &body.summary, now_ms)
    })
    .await?;
    Ok(Json(SummaryIdResponse { id }))
}

async fn get_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(day): Path<String>,
) -> Result<Json<DailySummary>, ApiError> {
    let summary = with_owner(state, headers, move |conn, owner| {
        journal::summary::get_summary(conn, owner, &day)
    })
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(summary))
}
