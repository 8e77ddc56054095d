use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::query::Pagination;

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub message: Option<String>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            status_code: None,
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data: Some(data),
            message: None,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    /// Attach a human-readable message alongside the data
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Message-only success, e.g. after a delete
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            status_code: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = json!({ "success": true });

        if let Some(message) = self.message {
            envelope["message"] = Value::String(message);
        }

        if let Some(data) = &self.data {
            // Convert data to JSON Value for consistent envelope format
            match serde_json::to_value(data) {
                Ok(value) => envelope["data"] = value,
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "error": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (status, Json(envelope)).into_response()
    }
}

/// One page of a list plus the counters clients need to page through it
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total_count: i64) -> Self {
        Self {
            success: true,
            data,
            page: pagination.page,
            limit: pagination.limit,
            total_count,
            total_pages: pagination.total_pages(total_count),
        }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// Convenience type aliases
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn envelope_with_message_and_data() {
        let response = ApiResponse::created(json!({"id": 1}))
            .message("Category created successfully")
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Category created successfully");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn empty_list_is_an_array_not_null() {
        let body = body_json(ApiResponse::success(Vec::<u8>::new()).into_response()).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn message_only_omits_data() {
        let body = body_json(ApiResponse::message_only("Goal deleted successfully").into_response()).await;
        assert!(body.get("data").is_none());
        assert_eq!(body["message"], "Goal deleted successfully");
    }

    #[tokio::test]
    async fn paginated_counters() {
        let page = Pagination { page: 2, limit: 10 };
        let body = body_json(Paginated::new(vec![1, 2, 3], page, 13).into_response()).await;
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["total_count"], 13);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(body["data"], json!([1, 2, 3]));
    }
}
