use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use super::dashboard::percent_of;
use super::Category;
use crate::api::dates;
use crate::api::validate::{FieldErrors, Validate, Validator};
use crate::database::update_builder::{UpdatableField, UpdateBuilder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub month: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Expects the budget columns plus [`Category::JOINED_COLUMNS`].
impl<'r> FromRow<'r, PgRow> for Budget {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            category_id: row.try_get("category_id")?,
            amount: row.try_get("amount")?,
            month: row.try_get("month")?,
            created_at: row.try_get("created_at")?,
            category: Category::from_joined_row(row)?,
        })
    }
}

/// A budget with the owner's expense total for its category and month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetWithSpent {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: f64,
}

impl BudgetWithSpent {
    pub fn new(budget: Budget, spent: Decimal) -> Self {
        let remaining = budget.amount - spent;
        let percentage = percent_of(spent, budget.amount);
        Self {
            budget,
            spent,
            remaining,
            percentage,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for BudgetWithSpent {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let budget = Budget::from_row(row)?;
        let spent: Decimal = row.try_get("spent")?;
        Ok(Self::new(budget, spent))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetRequest {
    pub category_id: Uuid,
    pub amount: Decimal,
    #[serde(deserialize_with = "dates::date")]
    pub month: NaiveDate,
}

impl Validate for CreateBudgetRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .positive("amount", self.amount)
            .money("amount", self.amount)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "dates::option_date")]
    pub month: Option<NaiveDate>,
}

impl Validate for UpdateBudgetRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(amount) = self.amount {
            v.positive("amount", amount).money("amount", amount);
        }
        v.finish()
    }
}

impl UpdateBudgetRequest {
    pub fn changes(&self) -> UpdateBuilder<BudgetField> {
        let mut builder = UpdateBuilder::new("budgets");
        builder
            .set_opt(BudgetField::Amount, self.amount)
            .set_opt(BudgetField::Month, self.month);
        builder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetField {
    Amount,
    Month,
}

impl UpdatableField for BudgetField {
    fn column(self) -> &'static str {
        match self {
            BudgetField::Amount => "amount",
            BudgetField::Month => "month",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn budget(amount: Decimal) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            amount,
            month: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            created_at: Utc::now(),
            category: None,
        }
    }

    #[test]
    fn budget_amount_must_fit_the_column() {
        let req: CreateBudgetRequest = serde_json::from_value(json!({
            "category_id": Uuid::nil(), "amount": 10000000000u64, "month": "2024-04-01"
        }))
        .unwrap();
        assert_eq!(req.validate().unwrap_err()["amount"], "must not exceed 9999999999.99");

        let req: UpdateBudgetRequest = serde_json::from_value(json!({ "amount": 0.005 })).unwrap();
        assert_eq!(req.validate().unwrap_err()["amount"], "must have at most 2 decimal places");
    }

    #[test]
    fn spent_derivations() {
        let b = BudgetWithSpent::new(budget(Decimal::from(500)), Decimal::from(125));
        assert_eq!(b.remaining, Decimal::from(375));
        assert_eq!(b.percentage, 25.0);

        let over = BudgetWithSpent::new(budget(Decimal::from(100)), Decimal::from(150));
        assert_eq!(over.remaining, Decimal::from(-50));
        assert_eq!(over.percentage, 150.0);
    }

    #[test]
    fn zero_amount_budget_has_zero_percentage() {
        let b = BudgetWithSpent::new(budget(Decimal::ZERO), Decimal::from(10));
        assert_eq!(b.percentage, 0.0);
    }

    #[test]
    fn serializes_flat() {
        let b = BudgetWithSpent::new(budget(Decimal::from(200)), Decimal::from(50));
        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["amount"], 200.0);
        assert_eq!(value["spent"], 50.0);
        assert_eq!(value["remaining"], 150.0);
        assert_eq!(value["month"], "2024-04-01");
    }

    #[test]
    fn update_without_fields_is_empty() {
        let req: UpdateBudgetRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.changes().is_empty());

        let req: UpdateBudgetRequest = serde_json::from_value(json!({ "amount": -5 })).unwrap();
        assert!(req.validate().is_err());
    }
}
