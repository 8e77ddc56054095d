//! Owner-scoped data access. Every statement filters by `user_id` in
//! addition to any row id, so a row owned by someone else is
//! indistinguishable from a missing one.

pub mod budget;
pub mod category;
pub mod dashboard;
pub mod goal;
pub mod transaction;

pub use budget::BudgetRepository;
pub use category::CategoryRepository;
pub use dashboard::DashboardRepository;
pub use goal::GoalRepository;
pub use transaction::TransactionRepository;

use sqlx::postgres::PgQueryResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("no fields to update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Map a missing row onto [`RepositoryError::NotFound`].
pub(crate) fn found<T>(row: Option<T>) -> Result<T, RepositoryError> {
    row.ok_or(RepositoryError::NotFound)
}

/// Treat a mutation that touched no rows as [`RepositoryError::NotFound`].
pub(crate) fn affected(result: PgQueryResult) -> Result<(), RepositoryError> {
    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
