use axum::{
    async_trait,
    extract::{rejection::JsonRejection, rejection::QueryRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use super::validate::Validate;
use crate::error::ApiError;

/// JSON body that has been deserialized and passed [`Validate`].
///
/// Malformed bodies and constraint failures both become a 400 in the
/// standard error envelope before the handler runs.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::invalid_json(rejection.body_text()))?;

        value.validate().map_err(|field_errors| {
            let summary = field_errors
                .iter()
                .map(|(field, problem)| format!("{}: {}", field, problem))
                .collect::<Vec<_>>()
                .join("; ");
            ApiError::validation_error(summary, field_errors)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor that reports failures in the standard envelope.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                ApiError::bad_request_with("Invalid query parameters", rejection.body_text())
            })?;
        Ok(ApiQuery(value))
    }
}
