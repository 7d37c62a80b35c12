use std::future::Future;

use crate::domain::entities::page::{Page, PageRequest};

use super::rate_limit::RateLimiter;

/// Cursor over a paginated listing.
///
/// Walking stops on an empty page, or once the items seen so far reach the
/// total the server reported. A missing total counts as zero, so such a
/// listing ends after its first page.
#[derive(Debug, Clone)]
pub struct PaginationWalker {
    next: Option<PageRequest>,
    fetched: u64,
}

impl PaginationWalker {
    pub fn new(limit: u32) -> Self {
        Self {
            next: Some(PageRequest::first(limit)),
            fetched: 0,
        }
    }

    /// The page to fetch next, `None` once the listing is exhausted.
    pub fn next_request(&self) -> Option<PageRequest> {
        self.next
    }

    /// Accounts for the page just fetched. Returns whether another page
    /// should be requested.
    pub fn advance<T>(&mut self, page: &Page<T>) -> bool {
        let Some(current) = self.next else {
            return false;
        };

        self.fetched += page.items.len() as u64;
        self.next = if page.items.is_empty() || self.fetched >= page.total.unwrap_or(0) {
            None
        } else {
            Some(current.next())
        };

        self.next.is_some()
    }

    pub fn fetched(&self) -> u64 {
        self.fetched
    }
}

/// Fetches every page of a listing, pausing between page fetches.
pub async fn collect_all<T, E, F, Fut>(
    limit: u32,
    limiter: &RateLimiter,
    mut fetch: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut walker = PaginationWalker::new(limit);
    let mut items = vec![];

    while let Some(request) = walker.next_request() {
        let page = fetch(request).await?;
        let more = walker.advance(&page);
        items.extend(page.items);

        if !more {
            break;
        }
        limiter.after_listing_page().await;
    }

    Ok(items)
}
