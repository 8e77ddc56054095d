//! Partial `UPDATE` construction over a closed set of columns.
//!
//! Each entity exposes an enum of the fields a caller may change. The builder
//! only ever writes column names obtained from that enum, so request input
//! can influence values but never identifiers.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::repository::RepositoryError;
use crate::database::sql::{bind_param_query, SqlParam, SqlResult};

/// A column that may appear in the SET list of an owner-scoped update.
pub trait UpdatableField: Copy + PartialEq + std::fmt::Debug {
    fn column(self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct UpdateBuilder<F: UpdatableField> {
    table: &'static str,
    touch_updated_at: bool,
    assignments: Vec<(F, SqlParam)>,
}

impl<F: UpdatableField> UpdateBuilder<F> {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            touch_updated_at: false,
            assignments: Vec::new(),
        }
    }

    /// Append `updated_at = NOW()` whenever at least one field is set.
    pub fn touch_updated_at(mut self) -> Self {
        self.touch_updated_at = true;
        self
    }

    /// Assign a field. Setting the same field again replaces the earlier value.
    pub fn set(&mut self, field: F, value: impl Into<SqlParam>) -> &mut Self {
        let value = value.into();
        match self.assignments.iter_mut().find(|(f, _)| *f == field) {
            Some(existing) => existing.1 = value,
            None => self.assignments.push((field, value)),
        }
        self
    }

    /// Assign a field only when a value is present.
    pub fn set_opt<V: Into<SqlParam>>(&mut self, field: F, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn build(&self, id: Uuid, owner_id: Uuid) -> Result<SqlResult, RepositoryError> {
        if self.assignments.is_empty() {
            return Err(RepositoryError::NoFieldsToUpdate);
        }

        let mut sql = SqlResult::new();
        let mut set_clauses: Vec<String> = Vec::with_capacity(self.assignments.len() + 1);

        for (field, value) in &self.assignments {
            let placeholder = sql.push_param(value.clone());
            set_clauses.push(format!("{} = {}", field.column(), placeholder));
        }
        if self.touch_updated_at {
            set_clauses.push("updated_at = NOW()".to_string());
        }

        let id_placeholder = sql.push_param(id);
        let owner_placeholder = sql.push_param(owner_id);

        sql.query = format!(
            "UPDATE {} SET {} WHERE id = {} AND user_id = {}",
            self.table,
            set_clauses.join(", "),
            id_placeholder,
            owner_placeholder
        );
        Ok(sql)
    }

    /// Run the update. Zero affected rows means no row with that id belongs to the owner.
    pub async fn execute(&self, pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<(), RepositoryError> {
        let sql = self.build(id, owner_id)?;

        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }

        let result = q.execute(pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(table = self.table, %id, fields = self.assignments.len(), "updated row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Field {
        Name,
        Amount,
        Note,
    }

    impl UpdatableField for Field {
        fn column(self) -> &'static str {
            match self {
                Field::Name => "name",
                Field::Amount => "amount",
                Field::Note => "note",
            }
        }
    }

    #[test]
    fn empty_update_is_rejected() {
        let builder = UpdateBuilder::<Field>::new("things");
        assert!(matches!(
            builder.build(Uuid::new_v4(), Uuid::new_v4()),
            Err(RepositoryError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn builds_owner_scoped_statement() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut builder = UpdateBuilder::new("things");
        builder.set(Field::Name, "Rent".to_string());
        builder.set(Field::Amount, Decimal::new(120000, 2));

        let sql = builder.build(id, owner).unwrap();
        assert_eq!(sql.query, "UPDATE things SET name = $1, amount = $2 WHERE id = $3 AND user_id = $4");
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Text(Some("Rent".to_string())),
                SqlParam::Decimal(Decimal::new(120000, 2)),
                SqlParam::Uuid(Some(id)),
                SqlParam::Uuid(Some(owner)),
            ]
        );
    }

    #[test]
    fn touch_updated_at_adds_no_parameter() {
        let mut builder = UpdateBuilder::new("things").touch_updated_at();
        builder.set(Field::Note, None::<String>);

        let sql = builder.build(Uuid::nil(), Uuid::nil()).unwrap();
        assert_eq!(sql.query, "UPDATE things SET note = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3");
        assert_eq!(sql.params[0], SqlParam::Text(None));
        assert_eq!(sql.params.len(), 3);
    }

    #[test]
    fn touch_alone_is_still_empty() {
        let builder = UpdateBuilder::<Field>::new("things").touch_updated_at();
        assert!(builder.is_empty());
        assert!(builder.build(Uuid::nil(), Uuid::nil()).is_err());
    }

    #[test]
    fn repeated_field_keeps_last_value() {
        let mut builder = UpdateBuilder::new("things");
        builder.set(Field::Name, "first".to_string());
        builder.set(Field::Amount, Decimal::ONE);
        builder.set(Field::Name, "second".to_string());

        assert_eq!(builder.len(), 2);
        let sql = builder.build(Uuid::nil(), Uuid::nil()).unwrap();
        assert!(sql.query.starts_with("UPDATE things SET name = $1, amount = $2"));
        assert_eq!(sql.params[0], SqlParam::Text(Some("second".to_string())));
    }

    #[test]
    fn set_opt_skips_absent_values() {
        let mut builder = UpdateBuilder::new("things");
        builder.set_opt(Field::Name, None::<String>);
        builder.set_opt(Field::Amount, Some(Decimal::TEN));
        assert_eq!(builder.len(), 1);
    }
}
