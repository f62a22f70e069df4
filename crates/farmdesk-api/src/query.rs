//! List query parameters

use std::collections::BTreeMap;

/// Query parameters for a paged list request.
///
/// Pages are 1-based on the wire. Empty filter values are dropped so the
/// backend never sees `?search=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            filters: BTreeMap::new(),
        }
    }

    /// Add a filter; blank values are ignored.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.filters.insert(key.into(), value.trim().to_string());
        }
        self
    }

    /// Free-text search filter.
    pub fn with_search(self, search: &str) -> Self {
        self.with_filter("search", search)
    }

    pub fn search(&self) -> Option<&str> {
        self.filters.get("search").map(String::as_str)
    }

    /// Query-string pairs in wire order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_include_paging_then_filters() {
        let query = ListQuery::new(2, 50)
            .with_search("ana")
            .with_filter("region", "North");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("pageSize".to_string(), "50".to_string()),
                ("region".to_string(), "North".to_string()),
                ("search".to_string(), "ana".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_dropped() {
        let query = ListQuery::default().with_search("   ");
        assert_eq!(query.search(), None);
        assert_eq!(query.to_pairs().len(), 2);
    }

    #[test]
    fn test_page_is_at_least_one() {
        let query = ListQuery::new(0, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
    }
}
