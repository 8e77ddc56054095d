use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{affected, found, RepositoryError};
use crate::database::models::{CreateGoalRequest, FinancialGoal, GoalField, GoalStatus};
use crate::database::update_builder::UpdateBuilder;

const GOAL_COLUMNS: &str =
    "id, user_id, title, target_amount, current_amount, deadline, status, created_at, updated_at";

pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, req: &CreateGoalRequest) -> Result<FinancialGoal, RepositoryError> {
        let now = Utc::now();
        let goal = sqlx::query_as::<_, FinancialGoal>(&format!(
            "INSERT INTO financial_goals ({GOAL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {GOAL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&req.title)
        .bind(req.target_amount)
        .bind(req.current_amount)
        .bind(req.deadline)
        .bind(GoalStatus::Active.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %goal.id, "created goal");
        Ok(goal)
    }

    /// The owner's goals, newest first, optionally narrowed to one status.
    pub async fn list(&self, owner_id: Uuid, status: Option<GoalStatus>) -> Result<Vec<FinancialGoal>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, FinancialGoal>(&format!(
                    "SELECT {GOAL_COLUMNS} FROM financial_goals WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC"
                ))
                .bind(owner_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, FinancialGoal>(&format!(
                    "SELECT {GOAL_COLUMNS} FROM financial_goals WHERE user_id = $1 ORDER BY created_at DESC"
                ))
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<FinancialGoal, RepositoryError> {
        let row = sqlx::query_as::<_, FinancialGoal>(&format!(
            "SELECT {GOAL_COLUMNS} FROM financial_goals WHERE id = $1 AND user_id = $2"
        ))
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
        changes: &UpdateBuilder<GoalField>,
    ) -> Result<FinancialGoal, RepositoryError> {
        changes.execute(&self.pool, id, owner_id).await?;
        self.get(id, owner_id).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM financial_goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        affected(result)
    }

    /// Add `amount` to the goal in one statement, marking it completed once
    /// the new total reaches the target. Prior status does not block this.
    pub async fn contribute(&self, id: Uuid, owner_id: Uuid, amount: Decimal) -> Result<FinancialGoal, RepositoryError> {
        let row = sqlx::query_as::<_, FinancialGoal>(&format!(
            "UPDATE financial_goals \
             SET current_amount = current_amount + $1, \
                 updated_at = $2, \
                 status = CASE WHEN current_amount + $1 >= target_amount THEN 'completed' ELSE status END \
             WHERE id = $3 AND user_id = $4 \
             RETURNING {GOAL_COLUMNS}"
        ))
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        let goal = found(row)?;
        tracing::debug!(id = %goal.id, status = goal.status.as_str(), "recorded contribution");
        Ok(goal)
    }
}
