//! HTTP handlers for the task API.
//!
//! # Responsibility
//! - Decode query strings and JSON bodies into core calls.
//! - Shape responses into the wire format (`YYYYMMDD` dates, `{"tasks": [...]}`).
//!
//! # Invariants
//! - Handlers never touch SQL; every storage call goes through `TaskService`.
//! - Bodies and query strings are decoded manually so malformed input yields
//!   `{"error": ...}`.

use crate::auth::issue_token;
use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use scheduler_core::{next_occurrence_string, parse_storage_date, Task, TaskId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextDateParams {
    pub now: String,
    pub date: String,
    pub repeat: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TasksParams {
    pub search: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdParams {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: TaskId,
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `GET /api/nextdate?now=&date=&repeat=`: bare next date as text.
pub async fn next_date(
    query: Result<Query<NextDateParams>, QueryRejection>,
) -> Result<String, ApiError> {
    let params = query_params(query)?;
    let reference = parse_storage_date(&params.now).ok_or_else(|| {
        ApiError::bad_request("error parsing date", format!("invalid now `{}`", params.now))
    })?;
    next_occurrence_string(reference, &params.date, &params.repeat)
        .map_err(|err| ApiError::bad_request("error getting next date", err))
}

/// `POST /api/task`: validate and insert.
pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let task: Task = decode_json(&body)?;
    let id = state
        .with_task_service("create_task", move |service| service.create_task(task))
        .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// `GET /api/tasks?search=`: listing, optionally filtered.
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<TasksParams>, QueryRejection>,
) -> Result<Json<TasksResponse>, ApiError> {
    let params = query_params(query)?;
    let tasks = state
        .with_task_service("list_tasks", move |service| {
            service.list_tasks(Some(params.search.as_str()))
        })
        .await?;
    Ok(Json(TasksResponse { tasks }))
}

/// `GET /api/task?id=`
pub async fn get_task(
    State(state): State<AppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> Result<Json<Task>, ApiError> {
    let params = query_params(query)?;
    let id = require_id(params.id)?;
    let task = state
        .with_task_service("get_task", move |service| service.get_task(&id))
        .await?;
    Ok(Json(task))
}

/// `PUT /api/task`: validate and replace; echoes the stored task.
pub async fn update_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let task: Task = decode_json(&body)?;
    if task.id.is_empty() {
        return Err(ApiError::bad_request("invalid id", "task id is required"));
    }
    let task = state
        .with_task_service("update_task", move |service| service.update_task(task))
        .await?;
    Ok(Json(task))
}

/// `POST /api/task/done?id=`: delete one-off, advance recurring.
pub async fn complete_task(
    State(state): State<AppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query_params(query)?;
    let id = require_id(params.id)?;
    state
        .with_task_service("complete_task", move |service| service.complete_task(&id))
        .await?;
    Ok(Json(json!({})))
}

/// `DELETE /api/task?id=`
pub async fn delete_task(
    State(state): State<AppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query_params(query)?;
    let id = require_id(params.id)?;
    state
        .with_task_service("delete_task", move |service| service.delete_task(&id))
        .await?;
    Ok(Json(json!({})))
}

/// `POST /api/signin`: exchanges the password for the session token.
pub async fn signin(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let request: SigninRequest = decode_json(&body)?;
    let expected = state.password().unwrap_or_default();
    if request.password != expected {
        info!("event=signin module=server status=rejected");
        return Err(ApiError::Unauthorized("wrong password".to_string()));
    }

    let token = issue_token(expected).map_err(|err| ApiError::internal("signin", err))?;
    info!("event=signin module=server status=ok");
    Ok(Json(TokenResponse { token }))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request("error parsing query", rejection.body_text()))
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::bad_request("error parsing JSON", err))
}

fn require_id(raw: String) -> Result<TaskId, ApiError> {
    let id = TaskId::new(raw);
    if id.is_empty() {
        return Err(ApiError::bad_request("invalid id", "task id is required"));
    }
    Ok(id)
}
