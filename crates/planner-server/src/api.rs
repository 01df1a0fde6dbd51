//! Router and request handlers.
//!
//! ## Endpoints
//!
//! - `POST /api/signin`: exchange the password for a session token
//! - `GET /api/nextdate`: raw next-occurrence computation
//! - `GET|POST|PUT|DELETE /api/task`: single-task CRUD
//! - `GET /api/tasks`: listing with optional search
//! - `POST /api/task/done`: complete (delete or reschedule) a task
//!
//! Task-mutating routes sit behind the session guard; the computation and
//! sign-in endpoints are always open.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use planner_core::date::{format_date, parse_date};
use planner_core::models::{NewTaskData, Task};
use planner_core::recurrence::next_occurrence;
use planner_core::repository::{SqliteRepository, TaskRepository, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth;
use crate::config::Config;
use crate::error::ApiError;

/// Everything the handlers need, passed explicitly at construction.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<SqliteRepository>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    let guarded = Router::new()
        .route(
            "/api/task",
            get(get_task)
                .post(add_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/api/tasks", get(list_tasks))
        .route("/api/task/done", post(complete_task))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/api/signin", post(sign_in))
        .route("/api/nextdate", get(next_date))
        .merge(guarded)
        .with_state(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Task as it appears on the wire: ids are strings of decimal digits.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl From<Task> for TaskPayload {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            date: task.date,
            title: task.title,
            comment: task.comment,
            repeat: task.repeat,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskPayload>,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    #[serde(default)]
    id: String,
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::bad_request("task id is required"));
    }
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid task id: {raw:?}")))
}

/// Applies the date normalization rules shared by create and update: the
/// title is required, an empty date means today, a non-empty rule must be
/// valid, and a past date either snaps to today (one-shot) or advances
/// through the recurrence engine.
fn normalize(payload: TaskPayload, today: NaiveDate) -> Result<NewTaskData, ApiError> {
    if payload.title.is_empty() {
        return Err(ApiError::bad_request("task title is required"));
    }

    let mut date = if payload.date.is_empty() {
        format_date(today)
    } else {
        payload.date
    };
    let parsed = parse_date(&date).map_err(ApiError::from)?;

    if !payload.repeat.is_empty() {
        // Validate the rule up front so a bad rule on a future-dated task
        // still fails the request.
        next_occurrence(today, &date, &payload.repeat)?;
    }

    if parsed < today {
        date = if payload.repeat.is_empty() {
            format_date(today)
        } else {
            next_occurrence(today, &date, &payload.repeat)?
        };
    }

    Ok(NewTaskData {
        date,
        title: payload.title,
        comment: payload.comment,
        repeat: payload.repeat,
    })
}

// ---------------------------------------------------------------------------
// Computation endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NextDateParams {
    #[serde(default)]
    now: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    repeat: String,
}

/// Returns the raw computed date string as `text/plain`.
async fn next_date(Query(params): Query<NextDateParams>) -> Result<String, ApiError> {
    if params.date.is_empty() || params.repeat.is_empty() {
        return Err(ApiError::bad_request(
            "date and repeat parameters are required",
        ));
    }
    let now = if params.now.is_empty() {
        today()
    } else {
        parse_date(&params.now)
            .map_err(|_| ApiError::bad_request(format!("invalid now parameter: {:?}", params.now)))?
    };
    Ok(next_occurrence(now, &params.date, &params.repeat)?)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    token: String,
}

async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if state.config.password.is_empty() {
        // No password configured: auth is disabled and the token is empty.
        return Ok((
            HeaderMap::new(),
            Json(SignInResponse {
                token: String::new(),
            }),
        ));
    }
    if request.password != state.config.password {
        return Err(ApiError::unauthorized("wrong password"));
    }

    let token = auth::issue_token(&state.config.password);
    let cookie = format!(
        "token={token}; Path=/; HttpOnly; Max-Age={}",
        auth::SESSION_TTL_SECONDS
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::internal("cookie encoding failed"))?,
    );
    Ok((headers, Json(SignInResponse { token })))
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

async fn get_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<TaskPayload>, ApiError> {
    let id = parse_id(&params.id)?;
    let task = state.repository.find_task_by_id(id).await?;
    Ok(Json(task.into()))
}

async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let data = normalize(payload, today())?;
    let task = state.repository.add_task(data).await?;
    debug!(id = task.id, date = %task.date, "task added");
    Ok(Json(serde_json::json!({ "id": task.id.to_string() })))
}

async fn update_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&payload.id)?;
    let data = normalize(payload, today())?;
    let task = Task {
        id,
        date: data.date,
        title: data.title,
        comment: data.comment,
        repeat: data.repeat,
    };
    state.repository.update_task(&task).await?;
    Ok(Json(serde_json::json!({})))
}

async fn delete_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&params.id)?;
    state.repository.delete_task(id).await?;
    Ok(Json(serde_json::json!({})))
}

async fn complete_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&params.id)?;
    let result = state.repository.complete_task(id, today()).await?;
    debug!(id, ?result, "task completed");
    Ok(Json(serde_json::json!({})))
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    search: String,
    #[serde(default)]
    limit: String,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let limit = if params.limit.is_empty() {
        DEFAULT_PAGE_SIZE
    } else {
        params
            .limit
            .parse::<u32>()
            .ok()
            .filter(|limit| *limit >= 1)
            .ok_or_else(|| ApiError::bad_request("invalid limit parameter"))?
    };
    let search = (!params.search.is_empty()).then_some(params.search.as_str());
    let tasks = state.repository.find_tasks(limit, search).await?;
    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskPayload::from).collect(),
    }))
}
