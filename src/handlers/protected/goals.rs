use axum::extract::{Path, State};
use axum::Extension;
use serde::Deserialize;

use super::parse_id;
use crate::api::query::parse_param;
use crate::api::{ApiQuery, ValidatedJson};
use crate::app::AppState;
use crate::database::models::{ContributeRequest, CreateGoalRequest, FinancialGoal, GoalStatus, UpdateGoalRequest};
use crate::database::repository::GoalRepository;
use crate::error::RepositoryResultExt;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ListGoalsQuery {
    pub status: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateGoalRequest>,
) -> ApiResult<FinancialGoal> {
    let goal = GoalRepository::new(state.pool)
        .create(user.user_id, &req)
        .await
        .or_api_error("create", "goal")?;

    Ok(ApiResponse::created(goal).message("Goal created successfully"))
}

/// GET /goals?status=active|completed|cancelled
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<ListGoalsQuery>,
) -> ApiResult<Vec<FinancialGoal>> {
    let status = parse_param::<GoalStatus>("status", &query.status)?;
    let goals = GoalRepository::new(state.pool)
        .list(user.user_id, status)
        .await
        .or_api_error("retrieve", "goals")?;

    Ok(ApiResponse::success(goals))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<FinancialGoal> {
    let id = parse_id(&id, "goal")?;
    let goal = GoalRepository::new(state.pool)
        .get(id, user.user_id)
        .await
        .or_api_error("retrieve", "goal")?;

    Ok(ApiResponse::success(goal))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateGoalRequest>,
) -> ApiResult<FinancialGoal> {
    let id = parse_id(&id, "goal")?;
    let goal = GoalRepository::new(state.pool)
        .update(id, user.user_id, &req.changes())
        .await
        .or_api_error("update", "goal")?;

    Ok(ApiResponse::success(goal).message("Goal updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "goal")?;
    GoalRepository::new(state.pool)
        .delete(id, user.user_id)
        .await
        .or_api_error("delete", "goal")?;

    Ok(ApiResponse::message_only("Goal deleted successfully"))
}

/// POST /goals/:id/contribute
///
/// Adds to `current_amount` in a single statement; reaching the target
/// flips the goal to completed.
pub async fn contribute(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ContributeRequest>,
) -> ApiResult<FinancialGoal> {
    let id = parse_id(&id, "goal")?;
    let goal = GoalRepository::new(state.pool)
        .contribute(id, user.user_id, req.amount)
        .await
        .or_api_error("contribute to", "goal")?;

    Ok(ApiResponse::success(goal).message("Contribution added successfully"))
}
