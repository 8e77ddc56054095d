use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{affected, found, RepositoryError};
use crate::api::query::Pagination;
use crate::database::models::{Category, CreateTransactionRequest, Transaction, TransactionField, TransactionFilter};
use crate::database::sql::{bind_param_query_as, bind_param_query_scalar, SqlResult};
use crate::database::update_builder::UpdateBuilder;

fn select_transactions() -> String {
    format!(
        "SELECT t.id, t.user_id, t.category_id, t.type, t.amount, t.description, t.date, \
         t.created_at, t.updated_at, {} \
         FROM transactions t \
         LEFT JOIN categories c ON c.id = t.category_id AND c.user_id = t.user_id",
        Category::JOINED_COLUMNS
    )
}

pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, req: &CreateTransactionRequest) -> Result<Transaction, RepositoryError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO transactions (id, user_id, category_id, type, amount, description, date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(req.category_id)
        .bind(req.kind.as_str())
        .bind(req.amount)
        .bind(&req.description)
        .bind(req.date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, "created transaction");
        self.get(id, owner_id).await
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<Transaction, RepositoryError> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            "{} WHERE t.id = $1 AND t.user_id = $2",
            select_transactions()
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        found(row)
    }

    /// One page of the owner's transactions, newest first, plus the total match count.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
        page: Pagination,
    ) -> Result<(Vec<Transaction>, i64), RepositoryError> {
        let mut sql = filter_clause(owner_id, filter);
        let where_clause = std::mem::take(&mut sql.query);

        let count_query = format!("SELECT COUNT(*) FROM transactions t WHERE {}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for p in sql.params.iter() {
            count = bind_param_query_scalar(count, p);
        }
        let total_count = count.fetch_one(&self.pool).await?;

        let limit = sql.push_param(i64::from(page.limit));
        let offset = sql.push_param(page.offset());
        let query = format!(
            "{} WHERE {} ORDER BY t.date DESC, t.created_at DESC LIMIT {} OFFSET {}",
            select_transactions(),
            where_clause,
            limit,
            offset
        );

        let mut q = sqlx::query_as::<_, Transaction>(&query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;

        Ok((rows, total_count))
    }

    /// The owner's latest transactions by date, then creation time.
    pub async fn recent(&self, owner_id: Uuid, limit: u32) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, Transaction>(&format!(
            "{} WHERE t.user_id = $1 ORDER BY t.date DESC, t.created_at DESC LIMIT $2",
            select_transactions()
        ))
        .bind(owner_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &UpdateBuilder<TransactionField>,
    ) -> Result<Transaction, RepositoryError> {
        changes.execute(&self.pool, id, owner_id).await?;
        self.get(id, owner_id).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        affected(result)
    }
}

/// WHERE clause (without the keyword) in `query`, with its parameters.
fn filter_clause(owner_id: Uuid, filter: &TransactionFilter) -> SqlResult {
    let mut sql = SqlResult::new();
    let mut conditions = vec![format!("t.user_id = {}", sql.push_param(owner_id))];

    if let Some(kind) = filter.kind {
        conditions.push(format!("t.type = {}", sql.push_param(kind.as_str())));
    }
    if let Some(category_id) = filter.category_id {
        conditions.push(format!("t.category_id = {}", sql.push_param(category_id)));
    }
    if let Some(start) = filter.start_date {
        conditions.push(format!("t.date >= {}", sql.push_param(start)));
    }
    if let Some(end) = filter.end_date {
        conditions.push(format!("t.date <= {}", sql.push_param(end)));
    }
    if let Some(min) = filter.min_amount {
        conditions.push(format!("t.amount >= {}", sql.push_param(min)));
    }
    if let Some(max) = filter.max_amount {
        conditions.push(format!("t.amount <= {}", sql.push_param(max)));
    }

    sql.query = conditions.join(" AND ");
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::EntryType;
    use crate::database::sql::SqlParam;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn owner_only_filter() {
        let owner = Uuid::new_v4();
        let sql = filter_clause(owner, &TransactionFilter::default());
        assert_eq!(sql.query, "t.user_id = $1");
        assert_eq!(sql.params, vec![SqlParam::Uuid(Some(owner))]);
    }

    #[test]
    fn filters_are_numbered_in_order() {
        let filter = TransactionFilter {
            kind: Some(EntryType::Expense),
            category_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            min_amount: Some(Decimal::from(10)),
            max_amount: None,
        };
        let sql = filter_clause(Uuid::nil(), &filter);
        assert_eq!(
            sql.query,
            "t.user_id = $1 AND t.type = $2 AND t.date >= $3 AND t.date <= $4 AND t.amount >= $5"
        );
        assert_eq!(sql.params.len(), 5);
    }
}
