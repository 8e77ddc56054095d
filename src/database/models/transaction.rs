use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use super::{decode_text, Category, EntryType};
use crate::api::{dates, serde_ext};
use crate::api::validate::{FieldErrors, Validate, Validator};
use crate::database::update_builder::{UpdatableField, UpdateBuilder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Expects the transaction columns plus [`Category::JOINED_COLUMNS`].
impl<'r> FromRow<'r, PgRow> for Transaction {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            category_id: row.try_get("category_id")?,
            kind: decode_text(row, "type")?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            category: Category::from_joined_row(row)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "dates::date")]
    pub date: NaiveDate,
}

impl Validate for CreateTransactionRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .positive("amount", self.amount)
            .money("amount", self.amount)
            .finish()
    }
}

/// Partial update. `category_id` and `description` accept an explicit null
/// to clear the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(default, deserialize_with = "serde_ext::nullable")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(rename = "type")]
    pub kind: Option<EntryType>,
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "serde_ext::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "dates::option_date")]
    pub date: Option<NaiveDate>,
}

impl Validate for UpdateTransactionRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(amount) = self.amount {
            v.positive("amount", amount).money("amount", amount);
        }
        v.finish()
    }
}

impl UpdateTransactionRequest {
    pub fn changes(&self) -> UpdateBuilder<TransactionField> {
        let mut builder = UpdateBuilder::new("transactions").touch_updated_at();
        builder
            .set_opt(TransactionField::CategoryId, self.category_id)
            .set_opt(TransactionField::Type, self.kind.map(|k| k.as_str().to_string()))
            .set_opt(TransactionField::Amount, self.amount)
            .set_opt(TransactionField::Description, self.description.clone())
            .set_opt(TransactionField::Date, self.date);
        builder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    CategoryId,
    Type,
    Amount,
    Description,
    Date,
}

impl UpdatableField for TransactionField {
    fn column(self) -> &'static str {
        match self {
            TransactionField::CategoryId => "category_id",
            TransactionField::Type => "type",
            TransactionField::Amount => "amount",
            TransactionField::Description => "description",
            TransactionField::Date => "date",
        }
    }
}

/// Parsed list filters; every field narrows the result when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<EntryType>,
    pub category_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}
