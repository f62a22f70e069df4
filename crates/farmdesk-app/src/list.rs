//! Paginated list state for one resource screen
//!
//! `Idle → Loading → Loaded | Failed`. Every load is issued with a
//! [`RequestToken`]; only the latest token's response is applied.

use farmdesk_api::ListQuery;
use farmdesk_core::{Page, Record, Resource};

use crate::config::PAGE_SIZES;
use crate::request::{RequestSequence, RequestToken};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListState {
    pub resource: Resource,
    pub phase: ListPhase,
    pub rows: Vec<Record>,
    /// Total rows across all pages
    pub total: u64,
    /// 1-based page index
    pub page: u32,
    pub page_size: u32,
    /// Free-text filter sent as `search`
    pub filter: String,
    /// Selected row within `rows`
    pub selected: usize,
    requests: RequestSequence,
}

impl ListState {
    pub fn new(resource: Resource, page_size: u32) -> Self {
        Self {
            resource,
            phase: ListPhase::Idle,
            rows: Vec::new(),
            total: 0,
            page: 1,
            page_size: page_size.max(1),
            filter: String::new(),
            selected: 0,
            requests: RequestSequence::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// Start a load: marks the list busy and returns the token and query to
    /// send. Any load still in flight becomes stale.
    pub fn begin_load(&mut self) -> (RequestToken, ListQuery) {
        self.phase = ListPhase::Loading;
        let token = self.requests.issue();
        let query = ListQuery::new(self.page, self.page_size).with_search(&self.filter);
        (token, query)
    }

    /// Apply a page. Returns false (and changes nothing) for stale tokens.
    pub fn apply_page(&mut self, token: RequestToken, page: Page) -> bool {
        if !self.requests.complete(token) {
            return false;
        }
        self.rows = page.rows;
        self.total = page.total;
        self.phase = ListPhase::Loaded;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        true
    }

    /// Apply a failure. Returns false for stale tokens.
    pub fn apply_error(&mut self, token: RequestToken, message: impl Into<String>) -> bool {
        if !self.requests.complete(token) {
            return false;
        }
        self.phase = ListPhase::Failed(message.into());
        true
    }

    /// Forget any in-flight load, e.g. when the screen is left.
    pub fn cancel(&mut self) {
        self.requests.cancel();
        if self.is_loading() {
            self.phase = ListPhase::Idle;
        }
    }

    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// A page past the end came back empty, e.g. after deleting the last row
    /// of the last page.
    pub fn is_past_end(&self) -> bool {
        self.phase == ListPhase::Loaded && self.rows.is_empty() && self.page > 1 && self.total > 0
    }

    /// Returns true when the page index changed.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Move to `page`, clamped to `[1, page_count]`.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.page_count());
        if page == self.page {
            return false;
        }
        self.page = page;
        self.selected = 0;
        true
    }

    /// Next offered page size (wrapping); resets to the first page.
    pub fn cycle_page_size(&mut self) -> u32 {
        let next = PAGE_SIZES
            .iter()
            .position(|s| *s == self.page_size)
            .map(|i| PAGE_SIZES[(i + 1) % PAGE_SIZES.len()])
            .unwrap_or(PAGE_SIZES[0]);
        self.set_page_size(next);
        next
    }

    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = size.max(1);
        self.page = 1;
        self.selected = 0;
    }

    /// Replace the filter; returns true when it changed (page resets to 1).
    pub fn set_filter(&mut self, filter: &str) -> bool {
        let filter = filter.trim();
        if filter == self.filter {
            return false;
        }
        self.filter = filter.to_string();
        self.page = 1;
        self.selected = 0;
        true
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.rows.get(self.selected)
    }

    /// `"21-40 of 120"`, or `"0 of 0"` when empty.
    pub fn range_label(&self) -> String {
        if self.rows.is_empty() {
            return format!("0 of {}", self.total);
        }
        let start = u64::from(self.page - 1) * u64::from(self.page_size) + 1;
        let end = start + self.rows.len() as u64 - 1;
        format!("{}-{} of {}", start, end, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmdesk_core::record_from_pairs;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| record_from_pairs([("FarmerId", json!(i))]))
            .collect()
    }

    #[test]
    fn test_idle_loading_loaded() {
        let mut list = ListState::new(Resource::Farmers, 25);
        assert_eq!(list.phase, ListPhase::Idle);

        let (token, query) = list.begin_load();
        assert!(list.is_loading());
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 25);

        assert!(list.apply_page(token, Page::new(rows(25), 120)));
        assert_eq!(list.phase, ListPhase::Loaded);
        assert_eq!(list.page_count(), 5);
        assert_eq!(list.range_label(), "1-25 of 120");
    }

    #[test]
    fn test_stale_response_ignored() {
        let mut list = ListState::new(Resource::Farmers, 10);
        let (old, _) = list.begin_load();
        list.set_filter("ana");
        let (new, query) = list.begin_load();
        assert_eq!(query.search(), Some("ana"));

        // Newer response lands first, then the old one straggles in
        assert!(list.apply_page(new, Page::new(rows(2), 2)));
        assert!(!list.apply_page(old, Page::new(rows(10), 300)));
        assert_eq!(list.total, 2);

        assert!(!list.apply_error(old, "boom"));
        assert_eq!(list.phase, ListPhase::Loaded);
    }

    #[test]
    fn test_failure_keeps_prior_rows() {
        let mut list = ListState::new(Resource::Farmers, 10);
        let (t1, _) = list.begin_load();
        list.apply_page(t1, Page::new(rows(3), 3));
        let (t2, _) = list.begin_load();
        assert!(list.apply_error(t2, "Server unavailable"));
        assert_eq!(list.phase, ListPhase::Failed("Server unavailable".into()));
        assert_eq!(list.rows.len(), 3);
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut list = ListState::new(Resource::Farmers, 10);
        let (t, _) = list.begin_load();
        list.apply_page(t, Page::new(rows(10), 25));

        assert!(!list.prev_page());
        assert!(list.next_page());
        assert!(list.next_page());
        assert_eq!(list.page, 3);
        assert!(!list.next_page());
        assert!(list.go_to_page(99));
        assert_eq!(list.page, 3);
        assert!(list.go_to_page(0));
        assert_eq!(list.page, 1);
    }

    #[test]
    fn test_page_size_cycle_resets_page() {
        let mut list = ListState::new(Resource::Farmers, 25);
        let (t, _) = list.begin_load();
        list.apply_page(t, Page::new(rows(25), 500));
        list.next_page();

        assert_eq!(list.cycle_page_size(), 50);
        assert_eq!(list.page, 1);
        assert_eq!(list.cycle_page_size(), 100);
        assert_eq!(list.cycle_page_size(), 10);

        list.set_page_size(33);
        assert_eq!(list.cycle_page_size(), 10);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut list = ListState::new(Resource::Farmers, 10);
        list.total = 100;
        list.next_page();
        assert!(list.set_filter("  kisumu "));
        assert_eq!(list.page, 1);
        assert_eq!(list.filter, "kisumu");
        assert!(!list.set_filter("kisumu"));
    }

    #[test]
    fn test_selection_clamped_to_new_rows() {
        let mut list = ListState::new(Resource::Farmers, 10);
        let (t, _) = list.begin_load();
        list.apply_page(t, Page::new(rows(10), 10));
        list.select_last();
        assert_eq!(list.selected, 9);

        let (t, _) = list.begin_load();
        list.apply_page(t, Page::new(rows(4), 4));
        assert_eq!(list.selected, 3);
    }

    #[test]
    fn test_past_end_detection() {
        let mut list = ListState::new(Resource::Farmers, 10);
        list.total = 30;
        list.go_to_page(3);
        let (t, _) = list.begin_load();
        list.apply_page(t, Page::new(Vec::new(), 20));
        assert!(list.is_past_end());
    }

    #[test]
    fn test_cancel_drops_in_flight() {
        let mut list = ListState::new(Resource::Farmers, 10);
        let (t, _) = list.begin_load();
        list.cancel();
        assert_eq!(list.phase, ListPhase::Idle);
        assert!(!list.apply_page(t, Page::new(rows(1), 1)));
    }
}
