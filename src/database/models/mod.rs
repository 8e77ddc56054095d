pub mod budget;
pub mod category;
pub mod dashboard;
pub mod goal;
pub mod transaction;

pub use budget::{Budget, BudgetField, BudgetWithSpent, CreateBudgetRequest, UpdateBudgetRequest};
pub use category::{Category, CategoryField, CreateCategoryRequest, UpdateCategoryRequest};
pub use dashboard::{CategoryExpense, DailyData, DashboardStats, MonthlyData};
pub use goal::{ContributeRequest, CreateGoalRequest, FinancialGoal, GoalField, GoalStatus, UpdateGoalRequest};
pub use transaction::{CreateTransactionRequest, Transaction, TransactionField, TransactionFilter, UpdateTransactionRequest};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of money flow, shared by categories and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            other => Err(format!("unknown entry type '{}'", other)),
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a text column into an enum via `FromStr`.
pub(crate) fn decode_text<T>(row: &sqlx::postgres::PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    use sqlx::Row;

    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_type_text_forms() {
        assert_eq!("income".parse::<EntryType>().unwrap(), EntryType::Income);
        assert_eq!(EntryType::Expense.as_str(), "expense");
        assert!("Expense".parse::<EntryType>().is_err());
        assert_eq!(serde_json::to_value(EntryType::Income).unwrap(), "income");
    }
}
