//! HTTP transport: maps routes to record service calls.
//!
//! ## Routes
//!
//! - `GET /` returns a plain-text greeting.
//! - `GET /health` returns `{ "ok": true, "version": ..., "variants": [...] }`.
//! - `POST /api/student`, `POST /api/employee` create a record.
//! - `GET /api/getStudents`, `GET /api/getEmployees` list records.
//!
//! Every failure, including a body that is not a JSON object, maps to 500
//! with a generic `{ "error": ... }` body. Request, validation and store
//! failures are told apart only in the logs.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::error;
use roster_core::{core_version, RecordType};
use serde_json::{json, Map, Value};

use crate::error::ServerError;
use crate::state::AppState;

/// Build the full router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/student", post(add_student))
        .route("/employee", post(add_employee))
        .route("/getStudents", get(get_students))
        .route("/getEmployees", get(get_employees))
}

async fn root_handler() -> &'static str {
    "Hello World"
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "version": core_version(),
        "variants": state.schemas().tags(),
    }))
}

async fn add_student(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    create_record(state, RecordType::Student, payload).await
}

async fn add_employee(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    create_record(state, RecordType::Employee, payload).await
}

async fn get_students(State(state): State<AppState>) -> Response {
    list_records(state, RecordType::Student).await
}

async fn get_employees(State(state): State<AppState>) -> Response {
    list_records(state, RecordType::Employee).await
}

async fn create_record(
    state: AppState,
    kind: RecordType,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    let attributes = match payload {
        Ok(Json(attributes)) => attributes,
        Err(rejection) => {
            let err = ServerError::Request(rejection.body_text());
            return failure("create", kind, &err, format!("Failed to create {kind}"));
        }
    };
    match state
        .run(move |service| service.add_record(kind, &attributes))
        .await
    {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(err) => failure("create", kind, &err, format!("Failed to create {kind}")),
    }
}

async fn list_records(state: AppState, kind: RecordType) -> Response {
    match state.run(move |service| service.list_records(kind)).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => failure("list", kind, &err, format!("Failed to fetch {kind}s")),
    }
}

fn failure(route: &str, kind: RecordType, err: &ServerError, message: String) -> Response {
    let error_kind = match err {
        ServerError::Request(_) => "request",
        ServerError::Service(inner) if inner.is_validation() => "validation",
        _ => "internal",
    };
    error!(
        "event=http_request module=http status=error route={route} kind={kind} error_kind={error_kind} error={err}"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
