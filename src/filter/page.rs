use serde::{Deserialize, Serialize};

use super::error::FilterError;
use super::types::{SortColumn, SortDirection};

pub const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination query string. Values stay textual so malformed numbers and
/// unknown sort keys get our own error messages instead of extractor ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PageRequest<S: SortColumn> {
    pub page: i64,
    pub limit: i64,
    pub search: String,
    pub sort: S,
    pub order: SortDirection,
}

impl<S: SortColumn> PageRequest<S> {
    pub fn parse(
        query: &PageQuery,
        default_sort: S,
        default_order: SortDirection,
        max_limit: i64,
    ) -> Result<Self, FilterError> {
        let page = match non_empty(&query.page) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| FilterError::InvalidPage(raw.to_string()))?
                .max(1),
            None => 1,
        };

        let limit = match non_empty(&query.limit) {
            Some(raw) => {
                let invalid = || FilterError::InvalidLimit {
                    value: raw.to_string(),
                    max: max_limit,
                };
                let limit = raw.parse::<i64>().map_err(|_| invalid())?;
                if limit < 1 || limit > max_limit {
                    return Err(invalid());
                }
                limit
            }
            None => DEFAULT_LIMIT.min(max_limit),
        };

        let sort = match non_empty(&query.sort_by) {
            Some(raw) => S::parse(raw).ok_or_else(|| FilterError::InvalidSort(raw.to_string()))?,
            None => default_sort,
        };

        let order = match non_empty(&query.order) {
            Some(raw) => SortDirection::parse(raw)?,
            None => default_order,
        };

        Ok(Self {
            page,
            limit,
            search: query.search.as_deref().unwrap_or("").trim().to_string(),
            sort,
            order,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ORDER BY` clause built only from whitelisted identifiers
    pub fn order_by(&self) -> String {
        let column = self.sort.column();
        let direction = self.order.to_sql();
        if column == S::tie_breaker() {
            format!("ORDER BY {} {}", column, direction)
        } else {
            format!("ORDER BY {} {}, {} {}", column, direction, S::tie_breaker(), direction)
        }
    }

    /// `ILIKE` pattern for the search term, `None` when not searching
    pub fn search_pattern(&self) -> Option<String> {
        if self.search.is_empty() {
            None
        } else {
            Some(like_pattern(&self.search))
        }
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            pages: page_count(total, self.limit),
            sort_by: self.sort.as_str(),
            order: self.order.as_str(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    #[serde(rename = "sortBy")]
    pub sort_by: &'static str,
    pub order: &'static str,
    pub search: String,
}

/// One page of rows plus the total matching count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Contains-pattern with LIKE metacharacters escaped (default `\` escape)
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
