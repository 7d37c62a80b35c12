use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed pauses between outbound calls, in milliseconds.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Delays {
    #[serde(default = "default_listing_page")]
    pub listing_page: u64,
    #[serde(default = "default_write")]
    pub write: u64,
    #[serde(default = "default_source_page")]
    pub source_page: u64,
    #[serde(default = "default_resolve")]
    pub resolve: u64,
    #[serde(default = "default_new_comic")]
    pub new_comic: u64,
    #[serde(default = "default_new_chapter")]
    pub new_chapter: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            listing_page: default_listing_page(),
            write: default_write(),
            source_page: default_source_page(),
            resolve: default_resolve(),
            new_comic: default_new_comic(),
            new_chapter: default_new_chapter(),
        }
    }
}

impl Delays {
    pub fn none() -> Self {
        Self {
            listing_page: 0,
            write: 0,
            source_page: 0,
            resolve: 0,
            new_comic: 0,
            new_chapter: 0,
        }
    }
}

fn default_listing_page() -> u64 {
    1000
}

fn default_write() -> u64 {
    2000
}

fn default_source_page() -> u64 {
    3000
}

fn default_resolve() -> u64 {
    3000
}

fn default_new_comic() -> u64 {
    5000
}

fn default_new_chapter() -> u64 {
    5000
}

/// Paces outbound traffic with fixed sleeps. It never retries anything.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delays: Delays,
}

impl RateLimiter {
    pub fn new(delays: Delays) -> Self {
        Self { delays }
    }

    pub fn disabled() -> Self {
        Self::new(Delays::none())
    }

    /// Between two pages of a catalog listing.
    pub async fn after_listing_page(&self) {
        pause(self.delays.listing_page).await
    }

    /// After any record was created.
    pub async fn after_write(&self) {
        pause(self.delays.write).await
    }

    /// Between two pages of the source search or feed.
    pub async fn after_source_page(&self) {
        pause(self.delays.source_page).await
    }

    pub async fn after_resolve(&self) {
        pause(self.delays.resolve).await
    }

    pub async fn after_new_comic(&self) {
        pause(self.delays.new_comic).await
    }

    pub async fn after_new_chapter(&self) {
        pause(self.delays.new_chapter).await
    }
}

async fn pause(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
