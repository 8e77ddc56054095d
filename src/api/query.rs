//! Parsing of loosely-typed query string parameters.
//!
//! Query structs keep every parameter as `Option<String>` so an empty value
//! (`?type=`) can be treated as absent and bad values can be reported by name.

use chrono::{Duration, NaiveDate, Utc};
use std::str::FromStr;

use super::dates::parse_date;
use crate::error::ApiError;

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an optional parameter with `FromStr`.
pub fn parse_param<T: FromStr>(field: &str, raw: &Option<String>) -> Result<Option<T>, ApiError> {
    match present(raw) {
        Some(value) => value.parse::<T>().map(Some).map_err(|_| {
            ApiError::bad_request_with("Invalid query parameters", format!("invalid value '{}' for {}", value, field))
        }),
        None => Ok(None),
    }
}

pub fn parse_date_param(field: &str, raw: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    match present(raw) {
        Some(value) => parse_date(value)
            .map(Some)
            .map_err(|e| ApiError::bad_request_with("Invalid query parameters", format!("{}: {}", field, e))),
        None => Ok(None),
    }
}

/// Integer parameter constrained to `min..=max`, falling back to `default` when absent.
pub fn bounded_param(field: &str, raw: &Option<String>, default: u32, min: u32, max: u32) -> Result<u32, ApiError> {
    let value = parse_param::<u32>(field, raw)?.unwrap_or(default);
    if value < min || value > max {
        return Err(ApiError::bad_request_with(
            "Invalid query parameters",
            format!("{} must be between {} and {}", field, min, max),
        ));
    }
    Ok(value)
}

/// Inclusive calendar range used by dashboard projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const DEFAULT_DAYS: i64 = 30;

    /// Resolve `start_date`/`end_date`, defaulting to the 30 days ending `today`.
    pub fn resolve(
        start: &Option<String>,
        end: &Option<String>,
        today: NaiveDate,
    ) -> Result<Self, ApiError> {
        let end = parse_date_param("end_date", end)?.unwrap_or(today);
        let start = match parse_date_param("start_date", start)? {
            Some(start) => start,
            None => end.checked_sub_signed(Duration::days(Self::DEFAULT_DAYS)).ok_or_else(|| {
                ApiError::bad_request_with("Invalid query parameters", "end_date is out of range")
            })?,
        };

        if start > end {
            return Err(ApiError::bad_request_with(
                "Invalid query parameters",
                "start_date must not be after end_date",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn resolve_today(start: &Option<String>, end: &Option<String>) -> Result<Self, ApiError> {
        Self::resolve(start, end, Utc::now().date_naive())
    }
}

/// Page selection for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn resolve(
        page: &Option<String>,
        limit: &Option<String>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self, ApiError> {
        let page = bounded_param("page", page, 1, 1, u32::MAX)?;
        let limit = bounded_param("limit", limit, default_limit, 1, max_limit)?;
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn total_pages(&self, total_count: i64) -> i64 {
        if total_count <= 0 {
            return 0;
        }
        let limit = i64::from(self.limit);
        (total_count + limit - 1) / limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_range_is_thirty_days_ending_today() {
        let range = DateRange::resolve(&None, &None, day(2024, 3, 31)).unwrap();
        assert_eq!(range.end, day(2024, 3, 31));
        assert_eq!(range.start, day(2024, 3, 1));
    }

    #[test]
    fn explicit_range_is_kept() {
        let range = DateRange::resolve(&s("2024-01-01"), &s("2024-01-31"), day(2024, 6, 1)).unwrap();
        assert_eq!(range, DateRange { start: day(2024, 1, 1), end: day(2024, 1, 31) });
    }

    #[test]
    fn inverted_or_malformed_range_is_rejected() {
        assert!(DateRange::resolve(&s("2024-02-01"), &s("2024-01-01"), day(2024, 6, 1)).is_err());
        assert!(DateRange::resolve(&s("last week"), &None, day(2024, 6, 1)).is_err());
        assert!(DateRange::resolve(&None, &s("-262143-01-05"), day(2024, 6, 1)).is_err());
    }

    #[test]
    fn default_start_near_the_calendar_floor_is_an_error() {
        let floor = NaiveDate::MIN + Duration::days(3);
        let err = DateRange::resolve(&None, &None, floor).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), Some("end_date is out of range"));
    }

    #[test]
    fn empty_values_count_as_absent() {
        assert_eq!(parse_param::<u32>("limit", &s("  ")).unwrap(), None);
        assert_eq!(parse_date_param("end_date", &s("")).unwrap(), None);
    }

    #[test]
    fn bounded_param_enforces_limits() {
        assert_eq!(bounded_param("months", &None, 6, 1, 12).unwrap(), 6);
        assert_eq!(bounded_param("months", &s("12"), 6, 1, 12).unwrap(), 12);
        assert!(bounded_param("months", &s("0"), 6, 1, 12).is_err());
        assert!(bounded_param("months", &s("13"), 6, 1, 12).is_err());
        assert!(bounded_param("months", &s("-1"), 6, 1, 12).is_err());
    }

    #[test]
    fn pagination_math() {
        let p = Pagination::resolve(&s("3"), &s("20"), 20, 100).unwrap();
        assert_eq!(p.offset(), 40);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(20), 1);
        assert_eq!(p.total_pages(41), 3);

        let defaults = Pagination::resolve(&None, &None, 20, 100).unwrap();
        assert_eq!(defaults, Pagination { page: 1, limit: 20 });

        assert!(Pagination::resolve(&s("0"), &None, 20, 100).is_err());
        assert!(Pagination::resolve(&None, &s("101"), 20, 100).is_err());
    }
}
