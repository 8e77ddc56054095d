//! Request-side plumbing shared by handlers: extractors, validation,
//! date, query parameter and update-body parsing.

pub mod dates;
pub mod extract;
pub mod query;
pub mod serde_ext;
pub mod validate;

pub use extract::{ApiQuery, ValidatedJson};
pub use query::{DateRange, Pagination};
pub use validate::{FieldErrors, Validate, Validator};
