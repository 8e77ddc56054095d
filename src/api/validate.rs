use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub type FieldErrors = BTreeMap<String, String>;

/// Largest magnitude a `NUMERIC(12, 2)` column holds.
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Request payloads that carry constraints beyond their JSON shape.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Collects per-field problems; the first problem recorded for a field wins.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, problem: impl Into<String>) -> &mut Self {
        self.errors.entry(field.to_string()).or_insert_with(|| problem.into());
        self
    }

    /// Character length in `min..=max`.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(field, format!("must be between {} and {} characters", min, max));
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value <= Decimal::ZERO {
            self.fail(field, "must be greater than 0");
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value < Decimal::ZERO {
            self.fail(field, "must not be negative");
        }
        self
    }

    /// Whole cents within the storage column's range.
    pub fn money(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value.normalize().scale() > 2 {
            self.fail(field, "must have at most 2 decimal places");
        } else if value.abs() > max_amount() {
            self.fail(field, format!("must not exceed {}", max_amount()));
        }
        self
    }

    pub fn hex_color(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_hex_color(value) {
            self.fail(field, "must be a hex color such as #1a2b3c");
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// `#` followed by 3, 4, 6, or 8 hex digits.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#FFFA"));
        assert!(is_hex_color("#6366f1"));
        assert!(is_hex_color("#6366f1cc"));
        assert!(!is_hex_color("6366f1"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn collects_first_error_per_field() {
        let mut v = Validator::new();
        v.length("name", "", 1, 100)
            .required("name", "")
            .positive("amount", Decimal::ZERO);

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["name"], "must be between 1 and 100 characters");
        assert_eq!(errors["amount"], "must be greater than 0");
    }

    #[test]
    fn money_is_whole_cents_within_column_range() {
        let mut v = Validator::new();
        v.money("a", Decimal::new(1999, 2))
            .money("b", Decimal::new(1000, 3))
            .money("c", max_amount())
            .money("d", Decimal::new(1, 3))
            .money("e", max_amount() + Decimal::new(1, 2));

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["d"], "must have at most 2 decimal places");
        assert_eq!(errors["e"], "must not exceed 9999999999.99");
    }

    #[test]
    fn sub_cent_amount_reports_the_sign_problem_first() {
        let mut v = Validator::new();
        v.positive("amount", Decimal::ZERO).money("amount", Decimal::ZERO);
        assert_eq!(v.finish().unwrap_err()["amount"], "must be greater than 0");

        let mut v = Validator::new();
        v.positive("amount", Decimal::new(1, 3)).money("amount", Decimal::new(1, 3));
        assert_eq!(v.finish().unwrap_err()["amount"], "must have at most 2 decimal places");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut v = Validator::new();
        v.length("title", "Férias em Portugal", 1, 18);
        assert!(v.finish().is_ok());
    }
}
