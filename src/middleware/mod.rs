pub mod auth;
pub mod response;
pub mod security;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult, Paginated};
pub use security::security_headers_middleware;
