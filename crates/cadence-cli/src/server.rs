//! HTTP API over the task store.
//!
//! Routes:
//! - `GET /api/nextdate?now&date&repeat`: next occurrence as plain `YYYYMMDD` text
//! - `POST /api/task`: create, answers `201 {"id": ...}`
//! - `GET /api/tasks?search`: `{"tasks": [...]}`
//! - `GET|PUT|DELETE /api/task`: read, replace or remove a single task
//! - `POST /api/task/done?id`: complete a task
//! - `POST /api/signin`: trade the configured password for a token
//!
//! Task routes sit behind [`auth::require_auth`]. Any other path is served
//! from the configured web directory. Failures are reported as
//! `{"error": "..."}` with a 4xx/5xx status.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cadence_core::dates;
use cadence_core::error::CoreError;
use cadence_core::lifecycle::{self, TaskDraft};
use cadence_core::models::{Task, TaskSearch};
use cadence_core::recurrence::next_date;
use cadence_core::repository::{SqliteRepository, TaskRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth;
use crate::config::Config;
use crate::util;

#[derive(Clone)]
pub struct AppState {
    pub repo: SqliteRepository,
    pub list_limit: u32,
    pub today: fn() -> NaiveDate,
    pub password: Option<String>,
    pub web_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("internal server error")]
    Internal,
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            e if e.is_client_error() => ApiError::BadRequest(e.to_string()),
            e => {
                error!(error = ?e, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct NextDateQuery {
    now: Option<String>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    repeat: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    search: Option<String>,
}

/// Task fields as sent by clients; `id` is only read on update.
#[derive(Debug, Deserialize)]
pub struct TaskBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    repeat: String,
}

impl TaskBody {
    fn into_draft(self) -> TaskDraft {
        TaskDraft {
            title: self.title,
            comment: self.comment,
            date: self.date,
            repeat: self.repeat,
        }
    }
}

#[derive(Debug, Serialize)]
struct TaskList {
    tasks: Vec<Task>,
}

fn parse_id(raw: Option<&str>) -> ApiResult<Uuid> {
    let raw = raw
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Task id is required".to_string()))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid task id: '{}'", raw)))
}

pub fn router(state: AppState) -> Router {
    let tasks = Router::new()
        .route(
            "/api/task",
            post(create_task)
                .get(get_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/api/tasks", get(list_tasks))
        .route("/api/task/done", post(complete_task))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/api/nextdate", get(next_date_handler))
        .route("/api/signin", post(auth::sign_in))
        .merge(tasks)
        .fallback_service(ServeDir::new(&state.web_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn next_date_handler(
    State(state): State<AppState>,
    Query(query): Query<NextDateQuery>,
) -> Response {
    let now = match query.now.as_deref().map(str::trim) {
        None | Some("") => (state.today)(),
        Some(text) => match dates::parse_date(text) {
            Ok(date) => date,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        },
    };

    match next_date(now, &query.date, &query.repeat) {
        Ok(next) => dates::format_date(next).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = body?;
    let data = lifecycle::on_create(&body.into_draft(), (state.today)())?;
    let task = state.repo.add_task(data).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": task.id }))))
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<TaskList>> {
    let search = TaskSearch::from_query(query.search.as_deref());
    let tasks = state
        .repo
        .find_tasks(&search, (state.today)(), state.list_limit)
        .await?;
    Ok(Json(TaskList { tasks }))
}

async fn get_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(query.id.as_deref())?;
    let task = state
        .repo
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {}", id)))?;
    Ok(Json(task))
}

async fn update_task(
    State(state): State<AppState>,
    body: Result<Json<TaskBody>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = body?;
    let id = parse_id(body.id.as_deref())?;
    let data = lifecycle::on_update(&body.into_draft(), (state.today)())?;
    state.repo.update_task(id, data).await?;
    Ok(Json(json!({})))
}

async fn delete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(query.id.as_deref())?;
    state.repo.delete_task(id).await?;
    Ok(Json(json!({})))
}

async fn complete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(query.id.as_deref())?;
    state.repo.complete_task(id, (state.today)()).await?;
    Ok(Json(json!({})))
}

/// Binds `listen_address` and serves until Ctrl+C or SIGTERM.
pub async fn serve(repo: SqliteRepository, listen_address: &str, config: &Config) -> anyhow::Result<()> {
    let state = AppState {
        repo,
        list_limit: config.list_limit,
        today: util::today,
        password: config.password.clone().filter(|p| !p.is_empty()),
        web_dir: config.web_dir.clone(),
    };
    let auth_enabled = state.password.is_some();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    info!(
        auth = auth_enabled,
        web_dir = %config.web_dir.display(),
        "Server listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
