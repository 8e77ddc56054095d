use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{self, postgres::PgArguments, FromRow};
use uuid::Uuid;

/// A typed positional parameter. Nullable variants bind SQL NULL for `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(Option<String>),
    Decimal(Decimal),
    Uuid(Option<Uuid>),
    Date(Option<NaiveDate>),
    Int(i64),
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(Some(v))
    }
}

impl From<&'static str> for SqlParam {
    fn from(v: &'static str) -> Self {
        SqlParam::Text(Some(v.to_string()))
    }
}

impl From<Option<String>> for SqlParam {
    fn from(v: Option<String>) -> Self {
        SqlParam::Text(v)
    }
}

impl From<Decimal> for SqlParam {
    fn from(v: Decimal) -> Self {
        SqlParam::Decimal(v)
    }
}

impl From<Uuid> for SqlParam {
    fn from(v: Uuid) -> Self {
        SqlParam::Uuid(Some(v))
    }
}

impl From<Option<Uuid>> for SqlParam {
    fn from(v: Option<Uuid>) -> Self {
        SqlParam::Uuid(v)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(Some(v))
    }
}

impl From<Option<NaiveDate>> for SqlParam {
    fn from(v: Option<NaiveDate>) -> Self {
        SqlParam::Date(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

/// Generated statement text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl SqlResult {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            params: Vec::new(),
        }
    }

    /// Append a parameter and return its `$n` placeholder.
    pub fn push_param(&mut self, param: impl Into<SqlParam>) -> String {
        self.params.push(param.into());
        format!("${}", self.params.len())
    }
}

impl Default for SqlResult {
    fn default() -> Self {
        Self::new()
    }
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v.clone() {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Decimal(d) => q.bind(d),
        SqlParam::Uuid(u) => q.bind(u),
        SqlParam::Date(d) => q.bind(d),
        SqlParam::Int(i) => q.bind(i),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v.clone() {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Decimal(d) => q.bind(d),
        SqlParam::Uuid(u) => q.bind(u),
        SqlParam::Date(d) => q.bind(d),
        SqlParam::Int(i) => q.bind(i),
    }
}

pub fn bind_param_query_scalar<'q, O>(
    q: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments> {
    match v.clone() {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Decimal(d) => q.bind(d),
        SqlParam::Uuid(u) => q.bind(u),
        SqlParam::Date(d) => q.bind(d),
        SqlParam::Int(i) => q.bind(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_param_numbers_placeholders_in_order() {
        let mut sql = SqlResult::new();
        assert_eq!(sql.push_param(Uuid::nil()), "$1");
        assert_eq!(sql.push_param("expense"), "$2");
        assert_eq!(sql.push_param(Decimal::new(1250, 2)), "$3");
        assert_eq!(sql.params.len(), 3);
        assert_eq!(sql.params[1], SqlParam::Text(Some("expense".to_string())));
    }
}
