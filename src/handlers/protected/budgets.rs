use axum::extract::{Path, State};
use axum::Extension;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::parse_id;
use crate::api::dates::parse_date;
use crate::api::{ApiQuery, ValidatedJson};
use crate::app::AppState;
use crate::database::models::{Budget, BudgetWithSpent, CreateBudgetRequest, UpdateBudgetRequest};
use crate::database::repository::BudgetRepository;
use crate::error::{ApiError, RepositoryResultExt};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    /// The requested month, if any. Any day inside the month selects it.
    pub fn month(&self) -> Result<Option<NaiveDate>, ApiError> {
        match self.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => parse_date(raw)
                .map(Some)
                .map_err(|_| ApiError::bad_request("Invalid month format (use YYYY-MM-DD)")),
            None => Ok(None),
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateBudgetRequest>,
) -> ApiResult<Budget> {
    let budget = BudgetRepository::new(state.pool)
        .create(user.user_id, &req)
        .await
        .or_api_error("create", "budget")?;

    Ok(ApiResponse::created(budget).message("Budget created successfully"))
}

/// GET /budgets?month=
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<Vec<Budget>> {
    let month = query.month()?;
    let budgets = BudgetRepository::new(state.pool)
        .list(user.user_id, month)
        .await
        .or_api_error("retrieve", "budgets")?;

    Ok(ApiResponse::success(budgets))
}

/// GET /budgets/with-spent?month= (defaults to the current month)
pub async fn with_spent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<Vec<BudgetWithSpent>> {
    let month = query.month()?.unwrap_or_else(|| Utc::now().date_naive());
    let budgets = BudgetRepository::new(state.pool)
        .list_with_spent(user.user_id, month)
        .await
        .or_api_error("retrieve", "budgets")?;

    Ok(ApiResponse::success(budgets))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Budget> {
    let id = parse_id(&id, "budget")?;
    let budget = BudgetRepository::new(state.pool)
        .get(id, user.user_id)
        .await
        .or_api_error("retrieve", "budget")?;

    Ok(ApiResponse::success(budget))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBudgetRequest>,
) -> ApiResult<Budget> {
    let id = parse_id(&id, "budget")?;
    let budget = BudgetRepository::new(state.pool)
        .update(id, user.user_id, &req.changes())
        .await
        .or_api_error("update", "budget")?;

    Ok(ApiResponse::success(budget).message("Budget updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "budget")?;
    BudgetRepository::new(state.pool)
        .delete(id, user.user_id)
        .await
        .or_api_error("delete", "budget")?;

    Ok(ApiResponse::message_only("Budget deleted successfully"))
}
