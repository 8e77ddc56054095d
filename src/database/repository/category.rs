use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{affected, found, RepositoryError};
use crate::database::models::{Category, CategoryField, CreateCategoryRequest, EntryType};
use crate::database::update_builder::UpdateBuilder;

const SELECT_CATEGORY: &str = "SELECT id, user_id, name, type, color, icon, created_at FROM categories";

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, req: &CreateCategoryRequest) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, user_id, name, type, color, icon, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, name, type, color, icon, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&req.name)
        .bind(req.kind.as_str())
        .bind(&req.color)
        .bind(&req.icon)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %category.id, "created category");
        Ok(category)
    }

    /// All of the owner's categories by name, optionally narrowed to one type.
    pub async fn list(&self, owner_id: Uuid, kind: Option<EntryType>) -> Result<Vec<Category>, RepositoryError> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query_as::<_, Category>(&format!(
                    "{} WHERE user_id = $1 AND type = $2 ORDER BY name ASC",
                    SELECT_CATEGORY
                ))
                .bind(owner_id)
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Category>(&format!("{} WHERE user_id = $1 ORDER BY name ASC", SELECT_CATEGORY))
                    .bind(owner_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(&format!("{} WHERE id = $1 AND user_id = $2", SELECT_CATEGORY))
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        found(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &UpdateBuilder<CategoryField>,
    ) -> Result<Category, RepositoryError> {
        changes.execute(&self.pool, id, owner_id).await?;
        self.get(id, owner_id).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        affected(result)
    }
}
