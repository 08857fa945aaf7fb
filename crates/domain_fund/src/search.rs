//! Search request model
//!
//! The structured request callers send to search funds. Every part is
//! optional; an empty request matches all funds, first page of ten.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default 1-based page number
pub const DEFAULT_PAGE_NUMBER: i32 = 1;
/// Default page size
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// A fund search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub sorting: Option<Sorting>,
}

impl SearchRequest {
    /// Sets the requested page
    pub fn with_page(mut self, page_number: i32, page_size: i32) -> Self {
        self.pagination = Some(Pagination { page_number, page_size });
        self
    }

    /// Sets the filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sorts by a field name, with an optional direction (`ASC`/`DESC`)
    pub fn sorted_by(mut self, property: impl Into<String>, direction: Option<&str>) -> Self {
        self.sorting = Some(Sorting {
            property: Some(property.into()),
            direction: direction.map(str::to_string),
        });
        self
    }
}

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "default_page_number")]
    pub page_number: i32,
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page_number() -> i32 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

/// Field filters; absent or blank values add no constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Exact fund code
    pub fund_code: Option<String>,
    /// Text match on the fund name
    pub fund_name: Option<String>,
    /// Contains match on the umbrella type
    pub umbrella_type: Option<String>,
    /// Inclusive lower bound on the 1 year return
    pub min_return_1_year: Option<Decimal>,
    /// Inclusive upper bound on the 1 year return
    pub max_return_1_year: Option<Decimal>,
}

/// Requested ordering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    /// Field name to sort by
    pub property: Option<String>,
    /// `ASC` or `DESC`, case-insensitive
    pub direction: Option<String>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Descending only when the text is `DESC` in any case; anything else is ascending
    pub fn from_request(direction: Option<&str>) -> Self {
        match direction {
            Some(value) if value.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_full_request() {
        let json = r#"{
            "pagination": {"pageNumber": 2, "pageSize": 25},
            "filter": {"fundName": "hisse", "minReturn1Year": 50.0, "maxReturn1Year": "120.5"},
            "sorting": {"property": "return1Year", "direction": "desc"}
        }"#;

        let request: SearchRequest = serde_json::from_str(json).unwrap();
        let pagination = request.pagination.unwrap();
        let filter = request.filter.unwrap();

        assert_eq!(pagination.page_number, 2);
        assert_eq!(pagination.page_size, 25);
        assert_eq!(filter.fund_name.as_deref(), Some("hisse"));
        assert_eq!(filter.min_return_1_year, Some(dec!(50)));
        assert_eq!(filter.max_return_1_year, Some(dec!(120.5)));
        assert_eq!(request.sorting.unwrap().direction.as_deref(), Some("desc"));
    }

    #[test]
    fn test_missing_pagination_fields_use_defaults() {
        let request: SearchRequest = serde_json::from_str(r#"{"pagination": {}}"#).unwrap();
        assert_eq!(request.pagination, Some(Pagination::default()));

        let empty: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, SearchRequest::default());
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!(SortDirection::from_request(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::from_request(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_request(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::from_request(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::from_request(None), SortDirection::Asc);
    }
}
