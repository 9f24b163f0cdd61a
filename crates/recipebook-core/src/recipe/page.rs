//! Pagination request and result types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// Which page of records to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_index: u32,
    page_size: u32,
}

impl PageRequest {
    /// Page size used by the service when none is given.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Create a page request.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero.
    pub fn new(page_index: u32, page_size: u32) -> Result<Self, Error> {
        if page_size == 0 {
            return Err(InvalidInputError::PageRequest {
                reason: "page size must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(Self {
            page_index,
            page_size,
        })
    }

    /// Zero-based page index.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The same page size at another index.
    pub fn with_page(self, page_index: u32) -> Self {
        Self { page_index, ..self }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One materialized page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub contents: Vec<T>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub current_page: u32,
}

impl<T> PageResult<T> {
    /// An empty page standing in for the given request.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            contents: Vec::new(),
            total_items: 0,
            total_pages: 0,
            current_page: request.page_index(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty(PageRequest::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(3, 1).is_ok());
    }

    #[test]
    fn with_page_keeps_size() {
        let request = PageRequest::new(0, 25).unwrap().with_page(4);
        assert_eq!(request.page_index(), 4);
        assert_eq!(request.page_size(), 25);
    }

    #[test]
    fn empty_result_tracks_requested_page() {
        let page: PageResult<String> = PageResult::empty(PageRequest::new(2, 5).unwrap());
        assert!(page.is_empty());
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_items, 0);
    }

    #[test]
    fn deserializes_service_page() {
        let page: PageResult<u32> = serde_json::from_value(json!({
            "totalItems": 12,
            "totalPages": 2,
            "currentPage": 1,
            "contents": [1, 2]
        }))
        .unwrap();
        assert_eq!(page.contents, vec![1, 2]);
        assert_eq!(page.total_pages, 2);
    }
}
