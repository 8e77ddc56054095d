use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::RepositoryError;
use crate::api::query::DateRange;
use crate::database::models::dashboard::{with_percentages, CategoryExpense, DailyData, DashboardStats, MonthlyData};

pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#6366f1";

/// Read-only aggregations over the owner's transactions.
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self, owner_id: Uuid, range: DateRange) -> Result<DashboardStats, RepositoryError> {
        let (income, expenses): (Decimal, Decimal) = sqlx::query_as(
            "SELECT \
                 COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0) AS total_income, \
                 COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0) AS total_expenses \
             FROM transactions \
             WHERE user_id = $1 AND date >= $2 AND date <= $3",
        )
        .bind(owner_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats::from_totals(income, expenses))
    }

    /// Expense totals per category, largest first, each with its share of the whole.
    pub async fn expenses_by_category(
        &self,
        owner_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<CategoryExpense>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT \
                 COALESCE(c.name, $4) AS category, \
                 COALESCE(SUM(t.amount), 0) AS amount, \
                 COALESCE(c.color, $5) AS color \
             FROM transactions t \
             LEFT JOIN categories c ON c.id = t.category_id AND c.user_id = t.user_id \
             WHERE t.user_id = $1 AND t.type = 'expense' AND t.date >= $2 AND t.date <= $3 \
             GROUP BY c.name, c.color \
             ORDER BY SUM(t.amount) DESC, category ASC",
        )
        .bind(owner_id)
        .bind(range.start)
        .bind(range.end)
        .bind(UNCATEGORIZED_NAME)
        .bind(UNCATEGORIZED_COLOR)
        .fetch_all(&self.pool)
        .await?;

        let totals = rows
            .iter()
            .map(|row| {
                Ok((
                    row.try_get::<String, _>("category")?,
                    row.try_get::<Decimal, _>("amount")?,
                    row.try_get::<String, _>("color")?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(with_percentages(totals))
    }

    /// Income and expense sums per `YYYY-MM` for the trailing `months` months, oldest first.
    pub async fn monthly(&self, owner_id: Uuid, months: u32) -> Result<Vec<MonthlyData>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT \
                 TO_CHAR(date, 'YYYY-MM') AS month, \
                 COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0) AS income, \
                 COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0) AS expenses \
             FROM transactions \
             WHERE user_id = $1 \
               AND date >= DATE_TRUNC('month', CURRENT_DATE) - make_interval(months => $2::int - 1) \
             GROUP BY TO_CHAR(date, 'YYYY-MM') \
             ORDER BY month ASC",
        )
        .bind(owner_id)
        .bind(months as i32)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(MonthlyData {
                    month: row.try_get("month")?,
                    income: row.try_get("income")?,
                    expenses: row.try_get("expenses")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(RepositoryError::from)
    }

    /// Income and expense sums per day in the range, oldest first. Days without
    /// transactions are omitted.
    pub async fn daily(&self, owner_id: Uuid, range: DateRange) -> Result<Vec<DailyData>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT \
                 TO_CHAR(date, 'YYYY-MM-DD') AS day, \
                 COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0) AS income, \
                 COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0) AS expenses \
             FROM transactions \
             WHERE user_id = $1 AND date >= $2 AND date <= $3 \
             GROUP BY date \
             ORDER BY date ASC",
        )
        .bind(owner_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(DailyData {
                    date: row.try_get("day")?,
                    income: row.try_get("income")?,
                    expenses: row.try_get("expenses")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(RepositoryError::from)
    }
}
