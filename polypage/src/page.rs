//! Length-aware page results.

use crate::PageItem;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One page of a union, plus what is needed to navigate to the others.
///
/// Serializes to the usual length-aware paginator document:
///
/// ```json
/// { "current_page": 2, "data": [...], "first_page_url": "/feed?page=1",
///   "from": 16, "last_page": 4, "last_page_url": "/feed?page=4",
///   "next_page_url": "/feed?page=3", "path": "/feed", "per_page": 15,
///   "prev_page_url": "/feed?page=1", "to": 30, "total": 52 }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<K, E> {
    items: Vec<PageItem<K, E>>,
    total: u64,
    per_page: u64,
    current_page: u64,
    page_name: String,
    path: Option<String>,
}

impl<K, E> Paginated<K, E> {
    pub fn new(
        items: Vec<PageItem<K, E>>,
        total: u64,
        per_page: u64,
        current_page: u64,
        page_name: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            items,
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            page_name: page_name.into(),
            path,
        }
    }

    pub fn items(&self) -> &[PageItem<K, E>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PageItem<K, E>> {
        self.items
    }

    /// Rows in the whole union, not just this page.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// `ceil(total / per_page)`, and 1 for an empty union.
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Number of items on this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based position of the first item in the union.
    pub fn first_item(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        Some((self.current_page - 1).saturating_mul(self.per_page).saturating_add(1))
    }

    /// 1-based position of the last item in the union.
    pub fn last_item(&self) -> Option<u64> {
        let first = self.first_item()?;
        Some(first.saturating_add(self.items.len() as u64 - 1))
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn on_last_page(&self) -> bool {
        !self.has_more_pages()
    }

    /// URL of `page`, if a base path is configured.
    pub fn url(&self, page: u64) -> Option<String> {
        let path = self.path.as_deref()?;
        let separator = if path.contains('?') { '&' } else { '?' };
        Some(format!("{path}{separator}{}={}", self.page_name, page.max(1)))
    }

    pub fn next_page_url(&self) -> Option<String> {
        if self.has_more_pages() {
            self.url(self.current_page + 1)
        } else {
            None
        }
    }

    pub fn previous_page_url(&self) -> Option<String> {
        if self.current_page > 1 {
            self.url(self.current_page - 1)
        } else {
            None
        }
    }

    /// Replaces every item, keeping order and page metadata.
    #[must_use]
    pub fn map_items<F>(mut self, f: F) -> Self
    where
        F: FnMut(PageItem<K, E>) -> PageItem<K, E>,
    {
        self.items = self.items.into_iter().map(f).collect();
        self
    }
}

impl<K, E: Serialize> Serialize for Paginated<K, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Paginated", 12)?;
        s.serialize_field("current_page", &self.current_page)?;
        s.serialize_field("data", &self.items)?;
        s.serialize_field("first_page_url", &self.url(1))?;
        s.serialize_field("from", &self.first_item())?;
        s.serialize_field("last_page", &self.last_page())?;
        s.serialize_field("last_page_url", &self.url(self.last_page()))?;
        s.serialize_field("next_page_url", &self.next_page_url())?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("per_page", &self.per_page)?;
        s.serialize_field("prev_page_url", &self.previous_page_url())?;
        s.serialize_field("to", &self.last_item())?;
        s.serialize_field("total", &self.total)?;
        s.end()
    }
}
