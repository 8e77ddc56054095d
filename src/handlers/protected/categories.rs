use axum::extract::{Path, State};
use axum::Extension;
use serde::Deserialize;

use super::parse_id;
use crate::api::query::parse_param;
use crate::api::{ApiQuery, ValidatedJson};
use crate::app::AppState;
use crate::database::models::{Category, CreateCategoryRequest, EntryType, UpdateCategoryRequest};
use crate::database::repository::CategoryRepository;
use crate::error::RepositoryResultExt;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let category = CategoryRepository::new(state.pool)
        .create(user.user_id, &req)
        .await
        .or_api_error("create", "category")?;

    Ok(ApiResponse::created(category).message("Category created successfully"))
}

/// GET /categories?type=income|expense
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<ListCategoriesQuery>,
) -> ApiResult<Vec<Category>> {
    let kind = parse_param::<EntryType>("type", &query.kind)?;
    let categories = CategoryRepository::new(state.pool)
        .list(user.user_id, kind)
        .await
        .or_api_error("retrieve", "categories")?;

    Ok(ApiResponse::success(categories))
}

/// GET /categories/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    let id = parse_id(&id, "category")?;
    let category = CategoryRepository::new(state.pool)
        .get(id, user.user_id)
        .await
        .or_api_error("retrieve", "category")?;

    Ok(ApiResponse::success(category))
}

/// PUT /categories/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    let id = parse_id(&id, "category")?;
    let category = CategoryRepository::new(state.pool)
        .update(id, user.user_id, &req.changes())
        .await
        .or_api_error("update", "category")?;

    Ok(ApiResponse::success(category).message("Category updated successfully"))
}

/// DELETE /categories/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "category")?;
    CategoryRepository::new(state.pool)
        .delete(id, user.user_id)
        .await
        .or_api_error("delete", "category")?;

    Ok(ApiResponse::message_only("Category deleted successfully"))
}
