use crate::error::{LedgerError, LedgerResult};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 200;

/// A validated skip/take request. Pages start at 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> LedgerResult<Self> {
        if page == 0 {
            return Err(LedgerError::validation("page starts at 1"));
        }
        if page_size == 0 {
            return Err(LedgerError::validation("pageSize must be positive"));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(LedgerError::Validation(format!(
                "pageSize cannot exceed {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageInfo {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PageInfo {
    pub fn new(request: &PageRequest, total_items: u64) -> Self {
        Self {
            page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_items.div_ceil(request.page_size()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}
