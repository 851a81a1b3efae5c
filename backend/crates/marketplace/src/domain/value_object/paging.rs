//! Pagination
//!
//! Zero-based page requests and the envelope returned by paginated queries.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// `size` is clamped to `1..=max_size`; `None` falls back to `default_size`.
    pub fn new(page: Option<u32>, size: Option<u32>, default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        let size = size.unwrap_or(default_size).clamp(1, max_size);
        Self {
            page: page.unwrap_or(0),
            size,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.size())),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
