//! Dashboard projections and the arithmetic derived from raw sums.
//!
//! SQL produces only sums; balances and percentages are computed here so
//! that division-by-zero handling lives in one place.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub savings_rate: f64,
}

impl DashboardStats {
    pub fn from_totals(total_income: Decimal, total_expenses: Decimal) -> Self {
        let balance = total_income - total_expenses;
        Self {
            total_income,
            total_expenses,
            balance,
            savings_rate: percent_of(balance, total_income),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    pub category: String,
    pub amount: Decimal,
    pub color: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyData {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyData {
    pub date: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn percent_of(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    (part / whole * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}

/// Attach each row's share of the total. Input order is preserved.
pub fn with_percentages(rows: Vec<(String, Decimal, String)>) -> Vec<CategoryExpense> {
    let total: Decimal = rows.iter().map(|(_, amount, _)| *amount).sum();
    rows.into_iter()
        .map(|(category, amount, color)| CategoryExpense {
            percentage: percent_of(amount, total),
            category,
            amount,
            color,
        })
        .collect()
}
