use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::filter::{build_goal_list, GoalFilter, GoalList, ListGoalsQuery};
use super::middleware::CsrfToken;
use crate::models::*;
use crate::store::{GoalStore, StoreError};

/// Where every successful submission sends the client.
const LIST_PATH: &str = "/goals";

// ============================================================
// Error Handling
// ============================================================

/// Map a store error to a response.
///
/// Not-found and validation errors are safe to show the client. Anything
/// else is logged in full and reported as a generic internal error.
fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::NotFound(id) => {
            tracing::warn!("Goal not found: {}", id);
            (StatusCode::NOT_FOUND, "Goal not found".to_string())
        }
        StoreError::Validation(msg) => {
            tracing::warn!("Validation error: {}", msg);
            (StatusCode::BAD_REQUEST, msg)
        }
        other => {
            tracing::error!("Internal error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Goal not found".to_string())
}

/// Parse a goal id from the path. An id that is not a UUID names no goal.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

// ============================================================
// Views
// ============================================================

/// Context for the create and edit forms.
///
/// `goal` is empty for a blank create form, the stored goal when editing, and
/// the submitted form when redisplaying after a validation failure.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView<G> {
    pub goal: Option<G>,
    pub errors: ValidationErrors,
    pub csrf_token: String,
}

/// Context for the delete confirmation prompt.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteView {
    pub goal: Goal,
    pub csrf_token: String,
}

fn redisplay(form: GoalForm, errors: ValidationErrors, csrf: CsrfToken) -> Response {
    tracing::warn!(
        "Rejected goal form: {}",
        errors.fields().collect::<Vec<_>>().join(", ")
    );
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(FormView {
            goal: Some(form),
            errors,
            csrf_token: csrf.0,
        }),
    )
        .into_response()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Goals
// ============================================================

pub async fn list_goals(
    State(store): State<GoalStore>,
    Query(query): Query<ListGoalsQuery>,
) -> Result<Json<GoalList>, (StatusCode, String)> {
    let filter = GoalFilter::try_from(&query).map_err(|msg| {
        tracing::warn!("Rejected list filter: {}", msg);
        (StatusCode::BAD_REQUEST, msg)
    })?;

    let today = Local::now().date_naive();
    Ok(Json(build_goal_list(store.get_all(), filter, today)))
}

pub async fn get_goal(
    State(store): State<GoalStore>,
    Path(id): Path<String>,
) -> Result<Json<Goal>, (StatusCode, String)> {
    parse_id(&id)
        .and_then(|id| store.get(id))
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn new_goal_form(Extension(csrf): Extension<CsrfToken>) -> Json<FormView<Goal>> {
    Json(FormView {
        goal: None,
        errors: ValidationErrors::new(),
        csrf_token: csrf.0,
    })
}

pub async fn create_goal(
    State(store): State<GoalStore>,
    Extension(csrf): Extension<CsrfToken>,
    Form(form): Form<GoalForm>,
) -> Result<Response, (StatusCode, String)> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return Ok(redisplay(form, errors, csrf)),
    };

    let goal = store.add(Goal::new(input)).map_err(store_error)?;
    tracing::info!("Created goal {} ({})", goal.id, goal.title);
    Ok(Redirect::to(LIST_PATH).into_response())
}

pub async fn edit_goal_form(
    State(store): State<GoalStore>,
    Extension(csrf): Extension<CsrfToken>,
    Path(id): Path<String>,
) -> Result<Json<FormView<Goal>>, (StatusCode, String)> {
    let goal = parse_id(&id)
        .and_then(|id| store.get(id))
        .ok_or_else(not_found)?;
    Ok(Json(FormView {
        goal: Some(goal),
        errors: ValidationErrors::new(),
        csrf_token: csrf.0,
    }))
}

pub async fn update_goal(
    State(store): State<GoalStore>,
    Extension(csrf): Extension<CsrfToken>,
    Path(id): Path<String>,
    Form(form): Form<GoalForm>,
) -> Result<Response, (StatusCode, String)> {
    let id = parse_id(&id).ok_or_else(not_found)?;
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return Ok(redisplay(form, errors, csrf)),
    };

    let goal = store
        .update(Goal::with_id(id, input))
        .map_err(store_error)?;
    tracing::info!("Updated goal {} ({}%, {})", goal.id, goal.progress_percent, goal.status);
    Ok(Redirect::to(LIST_PATH).into_response())
}

pub async fn delete_goal_form(
    State(store): State<GoalStore>,
    Extension(csrf): Extension<CsrfToken>,
    Path(id): Path<String>,
) -> Result<Json<DeleteView>, (StatusCode, String)> {
    let goal = parse_id(&id)
        .and_then(|id| store.get(id))
        .ok_or_else(not_found)?;
    Ok(Json(DeleteView {
        goal,
        csrf_token: csrf.0,
    }))
}

pub async fn delete_goal(
    State(store): State<GoalStore>,
    Path(id): Path<String>,
) -> Result<Redirect, (StatusCode, String)> {
    let Some(id) = parse_id(&id) else {
        return Ok(Redirect::to(LIST_PATH));
    };
    if store.delete(id).map_err(store_error)? {
        tracing::info!("Deleted goal {}", id);
    }
    Ok(Redirect::to(LIST_PATH))
}
