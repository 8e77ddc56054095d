use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{affected, found, RepositoryError};
use crate::database::models::{Budget, BudgetField, BudgetWithSpent, Category, CreateBudgetRequest};
use crate::database::update_builder::UpdateBuilder;

fn select_budgets() -> String {
    format!(
        "SELECT b.id, b.user_id, b.category_id, b.amount, b.month, b.created_at, {} \
         FROM budgets b \
         LEFT JOIN categories c ON c.id = b.category_id AND c.user_id = b.user_id",
        Category::JOINED_COLUMNS
    )
}

pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, req: &CreateBudgetRequest) -> Result<Budget, RepositoryError> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO budgets (id, user_id, category_id, amount, month, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(req.category_id)
        .bind(req.amount)
        .bind(req.month)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, "created budget");
        self.get(id, owner_id).await
    }

    /// The owner's budgets, newest month first, optionally limited to the month containing `month`.
    pub async fn list(&self, owner_id: Uuid, month: Option<NaiveDate>) -> Result<Vec<Budget>, RepositoryError> {
        let rows = match month {
            Some(month) => {
                sqlx::query_as::<_, Budget>(&format!(
                    "{} WHERE b.user_id = $1 AND DATE_TRUNC('month', b.month) = DATE_TRUNC('month', $2::date) \
                     ORDER BY b.month DESC, c.name ASC",
                    select_budgets()
                ))
                .bind(owner_id)
                .bind(month)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Budget>(&format!(
                    "{} WHERE b.user_id = $1 ORDER BY b.month DESC, c.name ASC",
                    select_budgets()
                ))
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Budgets for the month containing `month`, each with its expense total.
    pub async fn list_with_spent(&self, owner_id: Uuid, month: NaiveDate) -> Result<Vec<BudgetWithSpent>, RepositoryError> {
        let query = format!(
            "SELECT b.id, b.user_id, b.category_id, b.amount, b.month, b.created_at, {}, \
             COALESCE(( \
                 SELECT SUM(t.amount) FROM transactions t \
                 WHERE t.user_id = b.user_id \
                   AND t.category_id = b.category_id \
                   AND t.type = 'expense' \
                   AND DATE_TRUNC('month', t.date) = DATE_TRUNC('month', b.month) \
             ), 0) AS spent \
             FROM budgets b \
             LEFT JOIN categories c ON c.id = b.category_id AND c.user_id = b.user_id \
             WHERE b.user_id = $1 AND DATE_TRUNC('month', b.month) = DATE_TRUNC('month', $2::date) \
             ORDER BY c.name ASC",
            Category::JOINED_COLUMNS
        );

        let rows = sqlx::query_as::<_, BudgetWithSpent>(&query)
            .bind(owner_id)
            .bind(month)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<Budget, RepositoryError> {
        let row = sqlx::query_as::<_, Budget>(&format!("{} WHERE b.id = $1 AND b.user_id = $2", select_budgets()))
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        found(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &UpdateBuilder<BudgetField>,
    ) -> Result<Budget, RepositoryError> {
        changes.execute(&self.pool, id, owner_id).await?;
        self.get(id, owner_id).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        affected(result)
    }
}
