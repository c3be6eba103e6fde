use serde::{Deserialize, Serialize};

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: usize = 200;
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Largest offset any store is asked to skip; Postgres binds it as `BIGINT`
pub const MAX_OFFSET: usize = i64::MAX as usize;

/// Offset-based pagination parameters
///
/// # Example
/// ```
/// use property_registry_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::for_page(20, 1);
/// assert_eq!(first.offset, 0);
/// let third = PageRequest::for_page(20, 3);
/// assert_eq!(third.offset, 40);
/// assert_eq!(third.page_number(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return
    pub limit: usize,
    /// Number of items to skip
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Request for a 1-based page number; page 0 is treated as page 1, the
    /// page size is clamped to `1..=MAX_PAGE_SIZE` and the offset saturates at
    /// [`MAX_OFFSET`]
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = page_number
            .saturating_sub(1)
            .saturating_mul(limit)
            .min(MAX_OFFSET);
        Self { limit, offset }
    }

    /// 1-based page number of this request
    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit).saturating_add(1)
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// One page of results plus the total size of the listing
///
/// # Example
/// ```
/// use property_registry_db::repository::pagination::Page;
///
/// let page = Page::new(vec![1, 2, 3], 43, 20, 40);
/// assert!(!page.has_more());
/// assert_eq!(page.page_number(), 3);
/// assert_eq!(page.total_pages(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.items.len()) < self.total
    }

    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit).saturating_add(1)
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
