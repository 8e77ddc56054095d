// handlers/protected/dashboard.rs - Read-only aggregations for the dashboard
//
// Date-ranged views default to the 30 days ending today. Out-of-range
// `months`/`limit` values are rejected rather than clamped.

use axum::extract::State;
use axum::Extension;
use serde::Deserialize;

use crate::api::query::bounded_param;
use crate::api::{ApiQuery, DateRange};
use crate::app::AppState;
use crate::database::models::{CategoryExpense, DailyData, DashboardStats, MonthlyData, Transaction};
use crate::database::repository::{DashboardRepository, TransactionRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub const DEFAULT_MONTHS: u32 = 6;
pub const MAX_MONTHS: u32 = 12;
pub const DEFAULT_RECENT: u32 = 10;
pub const MAX_RECENT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    fn range(&self) -> Result<DateRange, ApiError> {
        DateRange::resolve_today(&self.start_date, &self.end_date)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

/// GET /dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<DashboardStats> {
    let range = query.range()?;
    let stats = DashboardRepository::new(state.pool)
        .stats(user.user_id, range)
        .await
        .map_err(|e| failed("stats", e))?;

    Ok(ApiResponse::success(stats))
}

/// GET /dashboard/expenses-by-category
pub async fn expenses_by_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<Vec<CategoryExpense>> {
    let range = query.range()?;
    let expenses = DashboardRepository::new(state.pool)
        .expenses_by_category(user.user_id, range)
        .await
        .map_err(|e| failed("expenses", e))?;

    Ok(ApiResponse::success(expenses))
}

/// GET /dashboard/monthly-data?months=1..12
pub async fn monthly_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<MonthsQuery>,
) -> ApiResult<Vec<MonthlyData>> {
    let months = bounded_param("months", &query.months, DEFAULT_MONTHS, 1, MAX_MONTHS)?;
    let data = DashboardRepository::new(state.pool)
        .monthly(user.user_id, months)
        .await
        .map_err(|e| failed("monthly data", e))?;

    Ok(ApiResponse::success(data))
}

/// GET /dashboard/daily-data
pub async fn daily_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<Vec<DailyData>> {
    let range = query.range()?;
    let data = DashboardRepository::new(state.pool)
        .daily(user.user_id, range)
        .await
        .map_err(|e| failed("daily data", e))?;

    Ok(ApiResponse::success(data))
}

/// GET /dashboard/recent-transactions?limit=1..50
pub async fn recent_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Vec<Transaction>> {
    let limit = bounded_param("limit", &query.limit, DEFAULT_RECENT, 1, MAX_RECENT)?;
    let transactions = TransactionRepository::new(state.pool)
        .recent(user.user_id, limit)
        .await
        .map_err(|e| failed("transactions", e))?;

    Ok(ApiResponse::success(transactions))
}

// Aggregations have no single entity, so NotFound cannot occur; every
// failure is reported as "Failed to retrieve <what>".
fn failed(what: &str, err: crate::database::RepositoryError) -> ApiError {
    ApiError::from_repository(err, "retrieve", what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_are_bounded() {
        let q = |v: &str| Some(v.to_string());
        assert_eq!(bounded_param("months", &None, DEFAULT_MONTHS, 1, MAX_MONTHS).unwrap(), 6);
        assert_eq!(bounded_param("months", &q("12"), DEFAULT_MONTHS, 1, MAX_MONTHS).unwrap(), 12);
        assert!(bounded_param("months", &q("0"), DEFAULT_MONTHS, 1, MAX_MONTHS).is_err());
        assert!(bounded_param("months", &q("13"), DEFAULT_MONTHS, 1, MAX_MONTHS).is_err());
    }

    #[test]
    fn range_query_rejects_inverted_dates() {
        let query = RangeQuery {
            start_date: Some("2024-05-01".into()),
            end_date: Some("2024-04-01".into()),
        };
        assert_eq!(query.range().unwrap_err().status_code(), 400);
    }
}
