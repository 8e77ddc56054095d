use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use super::{decode_text, EntryType};
use crate::api::validate::{FieldErrors, Validate, Validator};
use crate::database::update_builder::{UpdatableField, UpdateBuilder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            kind: decode_text(row, "type")?,
            color: row.try_get("color")?,
            icon: row.try_get("icon")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl Category {
    /// Columns of a category joined onto another table under the `cat_` prefix.
    pub const JOINED_COLUMNS: &'static str = "c.id AS cat_id, c.user_id AS cat_user_id, c.name AS cat_name, \
         c.type AS cat_type, c.color AS cat_color, c.icon AS cat_icon, c.created_at AS cat_created_at";

    /// Read a LEFT JOINed category; None when the reference did not resolve.
    pub fn from_joined_row(row: &PgRow) -> Result<Option<Self>, sqlx::Error> {
        let id: Option<Uuid> = row.try_get("cat_id")?;
        let Some(id) = id else {
            return Ok(None);
        };

        Ok(Some(Self {
            id,
            user_id: row.try_get("cat_user_id")?,
            name: row.try_get("cat_name")?,
            kind: decode_text(row, "cat_type")?,
            color: row.try_get("cat_color")?,
            icon: row.try_get("cat_icon")?,
            created_at: row.try_get("cat_created_at")?,
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub color: String,
    pub icon: String,
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .length("name", &self.name, 1, 100)
            .hex_color("color", &self.color)
            .required("icon", &self.icon)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<EntryType>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl Validate for UpdateCategoryRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.length("name", name, 1, 100);
        }
        if let Some(color) = &self.color {
            v.hex_color("color", color);
        }
        if let Some(icon) = &self.icon {
            v.required("icon", icon);
        }
        v.finish()
    }
}

impl UpdateCategoryRequest {
    pub fn changes(&self) -> UpdateBuilder<CategoryField> {
        let mut builder = UpdateBuilder::new("categories");
        builder
            .set_opt(CategoryField::Name, self.name.clone())
            .set_opt(CategoryField::Type, self.kind.map(|k| k.as_str().to_string()))
            .set_opt(CategoryField::Color, self.color.clone())
            .set_opt(CategoryField::Icon, self.icon.clone());
        builder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Type,
    Color,
    Icon,
}

impl UpdatableField for CategoryField {
    fn column(self) -> &'static str {
        match self {
            CategoryField::Name => "name",
            CategoryField::Type => "type",
            CategoryField::Color => "color",
            CategoryField::Icon => "icon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_validation() {
        let ok: CreateCategoryRequest = serde_json::from_value(json!({
            "name": "Groceries", "type": "expense", "color": "#22c55e", "icon": "cart"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: CreateCategoryRequest = serde_json::from_value(json!({
            "name": "", "type": "income", "color": "green", "icon": " "
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("color"));
        assert!(errors.contains_key("icon"));
    }

    #[test]
    fn unknown_type_is_rejected_at_parse() {
        let parsed = serde_json::from_value::<CreateCategoryRequest>(json!({
            "name": "Misc", "type": "transfer", "color": "#fff", "icon": "x"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn update_only_includes_present_fields() {
        let req: UpdateCategoryRequest = serde_json::from_value(json!({ "color": "#000000" })).unwrap();
        let sql = req.changes().build(Uuid::nil(), Uuid::nil()).unwrap();
        assert_eq!(sql.query, "UPDATE categories SET color = $1 WHERE id = $2 AND user_id = $3");
    }

    #[test]
    fn empty_update_has_no_changes() {
        let req: UpdateCategoryRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.changes().is_empty());
    }
}
