/// One page to fetch from a paginated listing, pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            limit: self.limit,
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.limit
    }
}

/// A fetched page along with the total the server reported, if any.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: Option<u64>) -> Self {
        Self { items, total }
    }
}

/// Outcome of an ensure-exists step that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    Found,
    Created,
}

impl Ensured {
    pub fn created(self) -> bool {
        self == Ensured::Created
    }
}
