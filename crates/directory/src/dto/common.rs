//! Pagination and helpers shared by every list operation.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
/// Highest page a list query may ask for; keeps the row offset small
pub const MAX_PAGE: u64 = 1_000_000;

/// Query parameters for paginated, searchable lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed)
    pub page:     Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
    /// Free-text search
    pub search:   Option<String>,
}

impl ListQuery {
    pub fn new() -> Self { Self::default() }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page: u64, per_page: u64) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    /// Get the page number, between 1 and [`MAX_PAGE`]
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).clamp(1, MAX_PAGE) }

    /// Get items per page, between 1 and 100
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE) }

    /// Trimmed search text, `None` when blank
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Pagination information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub page:        u64,
    pub per_page:    u64,
    pub total:       u64,
    pub total_pages: u64,
}

impl PaginationInfo {
    /// `per_page` of 0 is treated as 1
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// One page of a list result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items:      Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> Page<T> {
    /// Convert the items, keeping the pagination
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items:      self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent gives `None`, `null` gives `Some(None)`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::new();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_list_query_clamps() {
        let query = ListQuery {
            page:     Some(0),
            per_page: Some(1000),
            search:   Some("   ".into()),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
        assert_eq!(query.search(), None);
        assert_eq!(ListQuery::new().with_page(2, 0).per_page(), 1);
        assert_eq!(ListQuery::new().with_page(u64::MAX, 100).page(), MAX_PAGE);
    }

    #[test]
    fn test_pagination_info() {
        assert_eq!(PaginationInfo::new(1, 20, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 20, 41).total_pages, 3);

        let degenerate = PaginationInfo::new(1, 0, 5);
        assert_eq!(degenerate.per_page, 1);
        assert_eq!(degenerate.total_pages, 5);
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i32>>,
    }

    #[test]
    fn test_double_option() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.parent_id, None);
        let cleared: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None));
        let set: Patch = serde_json::from_str(r#"{"parent_id": 4}"#).unwrap();
        assert_eq!(set.parent_id, Some(Some(4)));
    }
}
