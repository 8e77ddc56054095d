use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{Claims, TokenVerifier};
use crate::error::ApiError;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            exp: claims.exp,
        }
    }
}

/// Token authentication middleware that validates bearer tokens and injects
/// [`AuthUser`] into request extensions. Rejections end the request with 401.
pub async fn jwt_auth_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).inspect_err(|e| {
        tracing::warn!(path = %request.uri().path(), "rejected request: {}", e.error());
    })?;

    let claims = verifier.verify(token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "rejected token: {}", e);
        ApiError::unauthorized("Invalid or expired token", e.to_string())
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header value split on single spaces must yield exactly two parts, the
/// first of which is literally `Bearer`.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(ApiError::unauthorized(
            "Authorization header required",
            "Please provide a valid authentication token",
        ));
    };

    let invalid_format = || {
        ApiError::unauthorized(
            "Invalid authorization format",
            "Authorization header must be in the format: Bearer <token>",
        )
    };

    let value = value.to_str().map_err(|_| invalid_format())?;
    if value.is_empty() {
        return Err(ApiError::unauthorized(
            "Authorization header required",
            "Please provide a valid authentication token",
        ));
    }

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(token),
        _ => Err(invalid_format()),
    }
}
