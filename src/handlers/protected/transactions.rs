use axum::extract::{Path, State};
use axum::Extension;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::parse_id;
use crate::api::query::{parse_date_param, parse_param};
use crate::api::{ApiQuery, Pagination, ValidatedJson};
use crate::app::AppState;
use crate::database::models::{
    CreateTransactionRequest, EntryType, Transaction, TransactionFilter, UpdateTransactionRequest,
};
use crate::database::repository::TransactionRepository;
use crate::error::{ApiError, RepositoryResultExt};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Paginated};

#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListTransactionsQuery {
    pub fn filter(&self) -> Result<TransactionFilter, ApiError> {
        Ok(TransactionFilter {
            kind: parse_param::<EntryType>("type", &self.kind)?,
            category_id: parse_param::<Uuid>("category_id", &self.category_id)?,
            start_date: parse_date_param("start_date", &self.start_date)?,
            end_date: parse_date_param("end_date", &self.end_date)?,
            min_amount: amount_param("min_amount", &self.min_amount)?,
            max_amount: amount_param("max_amount", &self.max_amount)?,
        })
    }
}

fn amount_param(field: &str, raw: &Option<String>) -> Result<Option<Decimal>, ApiError> {
    let amount = parse_param::<Decimal>(field, raw)?;
    if amount.is_some_and(|a| a.is_sign_negative()) {
        return Err(ApiError::bad_request_with(
            "Invalid query parameters",
            format!("{} must not be negative", field),
        ));
    }
    Ok(amount)
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateTransactionRequest>,
) -> ApiResult<Transaction> {
    let transaction = TransactionRepository::new(state.pool)
        .create(user.user_id, &req)
        .await
        .or_api_error("create", "transaction")?;

    Ok(ApiResponse::created(transaction).message("Transaction created successfully"))
}

/// GET /transactions - filtered, paginated, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Result<Paginated<Transaction>, ApiError> {
    let filter = query.filter()?;
    let pagination = Pagination::resolve(
        &query.page,
        &query.limit,
        state.api.default_page_size,
        state.api.max_page_size,
    )?;

    let (transactions, total) = TransactionRepository::new(state.pool)
        .list(user.user_id, &filter, pagination)
        .await
        .or_api_error("retrieve", "transactions")?;

    Ok(Paginated::new(transactions, pagination, total))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Transaction> {
    let id = parse_id(&id, "transaction")?;
    let transaction = TransactionRepository::new(state.pool)
        .get(id, user.user_id)
        .await
        .or_api_error("retrieve", "transaction")?;

    Ok(ApiResponse::success(transaction))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTransactionRequest>,
) -> ApiResult<Transaction> {
    let id = parse_id(&id, "transaction")?;
    let transaction = TransactionRepository::new(state.pool)
        .update(id, user.user_id, &req.changes())
        .await
        .or_api_error("update", "transaction")?;

    Ok(ApiResponse::success(transaction).message("Transaction updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "transaction")?;
    TransactionRepository::new(state.pool)
        .delete(id, user.user_id)
        .await
        .or_api_error("delete", "transaction")?;

    Ok(ApiResponse::message_only("Transaction deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_every_field() {
        let category = Uuid::new_v4();
        let query = ListTransactionsQuery {
            kind: Some("expense".into()),
            category_id: Some(category.to_string()),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            min_amount: Some("10".into()),
            max_amount: Some("250.50".into()),
            ..Default::default()
        };

        let filter = query.filter().unwrap();
        assert_eq!(filter.kind, Some(EntryType::Expense));
        assert_eq!(filter.category_id, Some(category));
        assert_eq!(filter.min_amount, Some(Decimal::new(10, 0)));
        assert_eq!(filter.max_amount, Some(Decimal::new(25050, 2)));
    }

    #[test]
    fn bad_filter_values_are_rejected() {
        let query = ListTransactionsQuery {
            kind: Some("transfer".into()),
            ..Default::default()
        };
        assert_eq!(query.filter().unwrap_err().error(), "Invalid query parameters");

        let query = ListTransactionsQuery {
            category_id: Some("abc".into()),
            ..Default::default()
        };
        assert!(query.filter().is_err());

        let query = ListTransactionsQuery {
            min_amount: Some("-5".into()),
            ..Default::default()
        };
        assert!(query.filter().is_err());
    }

    #[test]
    fn empty_query_is_unfiltered() {
        let filter = ListTransactionsQuery::default().filter().unwrap();
        assert_eq!(filter, TransactionFilter::default());
    }
}
