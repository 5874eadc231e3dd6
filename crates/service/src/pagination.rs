//! Zero-based page requests and the page envelope returned by list endpoints.

use serde::Serialize;

use crate::errors::ServiceError;

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_SIZE: i64 = 10;

/// Validated page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
}

impl PageRequest {
    /// Rejects a negative index, a size below one, and coordinates whose row
    /// offset `page * size` does not fit in an `i64`.
    pub fn new(page: i64, size: i64) -> Result<Self, ServiceError> {
        if page < 0 {
            return Err(ServiceError::Validation("Page index must be zero or positive".into()));
        }
        if size < 1 {
            return Err(ServiceError::Validation("Page size must be at least 1".into()));
        }
        if page.checked_mul(size).is_none() {
            return Err(ServiceError::Validation("Page index is out of range for this page size".into()));
        }
        Ok(Self { page: page as u64, size: size as u64 })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE as u64, size: DEFAULT_SIZE as u64 }
    }
}

/// One slice of a result set plus the totals needed to navigate it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
    pub size: u64,
    pub number_of_elements: u64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, req: PageRequest) -> Self {
        let total_pages = total_elements.div_ceil(req.size);
        let number_of_elements = content.len() as u64;
        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number: req.page,
            size: req.size,
            number_of_elements,
            first: req.page == 0,
            last: req.page + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
