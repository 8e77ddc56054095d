// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here runs behind jwt_auth_middleware and receives the caller
// as Extension<AuthUser>. All repository calls are scoped to that user.

pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod transactions;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id, reporting `Invalid <entity> ID` on failure
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {} ID", entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_reports_entity() {
        let err = parse_id("not-a-uuid", "budget").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error(), "Invalid budget ID");
        assert!(parse_id(&Uuid::new_v4().to_string(), "budget").is_ok());
    }
}
