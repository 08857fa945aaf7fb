//! Search query building
//!
//! `QueryBuilder` turns a `SearchRequest` into a `FundQuery`: an ordered list
//! of criteria AND-ed left to right, a page window, and an optional sort.
//! The query is a plain value. Index adapters translate it into their own
//! dialect and the in-memory index evaluates it directly via
//! [`Criterion::matches`].

use rust_decimal::Decimal;

use crate::document::{FieldKind, FundDocument, FundField};
use crate::error::FundError;
use crate::search::{Pagination, SearchRequest, SortDirection};

/// One predicate of a query
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Matches every document
    MatchAll,
    /// Whole-value equality on a keyword field
    Exact { field: FundField, value: String },
    /// Analyzed match: any token of `value` appears in the field
    Text { field: FundField, value: String },
    /// Case-insensitive substring match
    Contains { field: FundField, value: String },
    /// The field has a reported value
    Exists { field: FundField },
    /// Field value `>= value`
    GreaterThanOrEqual { field: FundField, value: Decimal },
    /// Field value `<= value`
    LessThanOrEqual { field: FundField, value: Decimal },
}

impl Criterion {
    /// The field this criterion constrains, `None` for match-all
    pub fn field(&self) -> Option<FundField> {
        match self {
            Criterion::MatchAll => None,
            Criterion::Exact { field, .. }
            | Criterion::Text { field, .. }
            | Criterion::Contains { field, .. }
            | Criterion::Exists { field }
            | Criterion::GreaterThanOrEqual { field, .. }
            | Criterion::LessThanOrEqual { field, .. } => Some(*field),
        }
    }

    /// Evaluates the criterion against a document
    pub fn matches(&self, document: &FundDocument) -> bool {
        match self {
            Criterion::MatchAll => true,
            Criterion::Exact { field, value } => document.text(*field) == Some(value.as_str()),
            Criterion::Text { field, value } => {
                let Some(text) = document.text(*field) else {
                    return false;
                };
                let tokens = analyze(text);
                analyze(value).iter().any(|token| tokens.contains(token))
            }
            Criterion::Contains { field, value } => document
                .text(*field)
                .map(|text| text.to_lowercase().contains(&value.to_lowercase()))
                .unwrap_or(false),
            Criterion::Exists { field } => match field.kind() {
                FieldKind::ScaledDecimal => document.decimal(*field).is_some(),
                _ => document.text(*field).is_some_and(|text| !text.is_empty()),
            },
            Criterion::GreaterThanOrEqual { field, value } => {
                document.decimal(*field).is_some_and(|v| v >= *value)
            }
            Criterion::LessThanOrEqual { field, value } => {
                document.decimal(*field).is_some_and(|v| v <= *value)
            }
        }
    }
}

/// Splits text into lowercase alphanumeric tokens
///
/// A close approximation of the search engine's standard analyzer, used by
/// the in-memory index.
pub fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Zero-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,
    /// Page size, at least 1
    pub size: u32,
}

impl PageRequest {
    /// Number of hits to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Maximum number of hits to return
    pub fn limit(&self) -> u32 {
        self.size
    }
}

/// Requested sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: FundField,
    pub direction: SortDirection,
}

/// A built search query
#[derive(Debug, Clone, PartialEq)]
pub struct FundQuery {
    criteria: Vec<Criterion>,
    page: PageRequest,
    sort: Option<SortOrder>,
}

impl FundQuery {
    /// Criteria in the order they were added; the first is always `MatchAll`
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    /// True when no criterion beyond match-all was added
    pub fn is_match_all(&self) -> bool {
        self.criteria.iter().all(|c| *c == Criterion::MatchAll)
    }

    /// Evaluates every criterion, left to right
    pub fn matches(&self, document: &FundDocument) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(document))
    }
}

/// Builds a `FundQuery` from a `SearchRequest`
pub struct QueryBuilder;

impl QueryBuilder {
    /// Builds the query for a request
    ///
    /// Pure: the request is only read and nothing is executed.
    ///
    /// # Errors
    ///
    /// Returns `FundError::InvalidSearchRequest` if the page size is below 1
    /// or the sort property names no fund field.
    ///
    /// # Example
    ///
    /// ```rust
    /// use domain_fund::{Criterion, Filter, FundField, QueryBuilder, SearchRequest};
    /// use rust_decimal_macros::dec;
    ///
    /// let request = SearchRequest::default().with_filter(Filter {
    ///     min_return_1_year: Some(dec!(50.0)),
    ///     ..Default::default()
    /// });
    /// let query = QueryBuilder::build(&request).unwrap();
    ///
    /// assert_eq!(query.criteria()[1], Criterion::Exists { field: FundField::Return1Year });
    /// assert_eq!(query.page().offset(), 0);
    /// ```
    pub fn build(request: &SearchRequest) -> Result<FundQuery, FundError> {
        let page = Self::page_request(request.pagination)?;
        let sort = Self::sort_order(request)?;

        let mut criteria = vec![Criterion::MatchAll];

        if let Some(filter) = &request.filter {
            if let Some(code) = non_blank(&filter.fund_code) {
                criteria.push(Criterion::Exact {
                    field: FundField::FundCode,
                    value: code.to_string(),
                });
            }

            if let Some(name) = non_blank(&filter.fund_name) {
                criteria.push(Criterion::Text {
                    field: FundField::FundName,
                    value: name.to_string(),
                });
            }

            if let Some(umbrella) = non_blank(&filter.umbrella_type) {
                criteria.push(Criterion::Contains {
                    field: FundField::UmbrellaType,
                    value: umbrella.to_string(),
                });
            }

            if filter.min_return_1_year.is_some() || filter.max_return_1_year.is_some() {
                let field = FundField::Return1Year;
                criteria.push(Criterion::Exists { field });

                if let Some(min) = filter.min_return_1_year {
                    criteria.push(Criterion::GreaterThanOrEqual { field, value: min });
                }
                if let Some(max) = filter.max_return_1_year {
                    criteria.push(Criterion::LessThanOrEqual { field, value: max });
                }
            }
        }

        Ok(FundQuery { criteria, page, sort })
    }

    fn page_request(pagination: Option<Pagination>) -> Result<PageRequest, FundError> {
        let pagination = pagination.unwrap_or_default();

        let size = u32::try_from(pagination.page_size)
            .ok()
            .filter(|size| *size >= 1)
            .ok_or_else(|| {
                FundError::invalid_search(format!(
                    "Page size must be at least 1, got {}",
                    pagination.page_size
                ))
            })?;

        let page = pagination.page_number.saturating_sub(1).max(0) as u32;
        Ok(PageRequest { page, size })
    }

    fn sort_order(request: &SearchRequest) -> Result<Option<SortOrder>, FundError> {
        let Some(sorting) = &request.sorting else {
            return Ok(None);
        };
        let Some(property) = non_blank(&sorting.property) else {
            return Ok(None);
        };

        let field = property
            .parse::<FundField>()
            .map_err(FundError::InvalidSearchRequest)?;

        Ok(Some(SortOrder {
            field,
            direction: SortDirection::from_request(sorting.direction.as_deref()),
        }))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
