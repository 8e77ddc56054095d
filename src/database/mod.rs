pub mod manager;
pub mod models;
pub mod repository;
pub mod sql;
pub mod update_builder;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::RepositoryError;
pub use update_builder::{UpdatableField, UpdateBuilder};
