use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::str::FromStr;
use uuid::Uuid;

use super::decode_text;
use crate::api::dates;
use crate::api::validate::{FieldErrors, Validate, Validator};
use crate::database::update_builder::{UpdatableField, UpdateBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "cancelled" => Ok(GoalStatus::Cancelled),
            other => Err(format!("unknown goal status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for FinancialGoal {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            target_amount: row.try_get("target_amount")?,
            current_amount: row.try_get("current_amount")?,
            deadline: row.try_get("deadline")?,
            status: decode_text(row, "status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// New goals always start `active`; any status in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    #[serde(default, deserialize_with = "dates::option_date")]
    pub deadline: Option<NaiveDate>,
}

impl Validate for CreateGoalRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .length("title", &self.title, 1, 200)
            .positive("target_amount", self.target_amount)
            .money("target_amount", self.target_amount)
            .non_negative("current_amount", self.current_amount)
            .money("current_amount", self.current_amount)
            .finish()
    }
}

/// Partial update. `deadline` accepts an explicit null to clear it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "dates::nullable_date")]
    pub deadline: Option<Option<NaiveDate>>,
    pub status: Option<GoalStatus>,
}

impl Validate for UpdateGoalRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            v.length("title", title, 1, 200);
        }
        if let Some(target) = self.target_amount {
            v.positive("target_amount", target).money("target_amount", target);
        }
        if let Some(current) = self.current_amount {
            v.non_negative("current_amount", current).money("current_amount", current);
        }
        v.finish()
    }
}

impl UpdateGoalRequest {
    pub fn changes(&self) -> UpdateBuilder<GoalField> {
        let mut builder = UpdateBuilder::new("financial_goals").touch_updated_at();
        builder
            .set_opt(GoalField::Title, self.title.clone())
            .set_opt(GoalField::TargetAmount, self.target_amount)
            .set_opt(GoalField::CurrentAmount, self.current_amount)
            .set_opt(GoalField::Deadline, self.deadline)
            .set_opt(GoalField::Status, self.status.map(|s| s.as_str().to_string()));
        builder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    Title,
    TargetAmount,
    CurrentAmount,
    Deadline,
    Status,
}

impl UpdatableField for GoalField {
    fn column(self) -> &'static str {
        match self {
            GoalField::Title => "title",
            GoalField::TargetAmount => "target_amount",
            GoalField::CurrentAmount => "current_amount",
            GoalField::Deadline => "deadline",
            GoalField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributeRequest {
    pub amount: Decimal,
}

impl Validate for ContributeRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .positive("amount", self.amount)
            .money("amount", self.amount)
            .finish()
    }
}
