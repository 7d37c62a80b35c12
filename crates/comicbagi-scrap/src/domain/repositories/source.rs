use async_trait::async_trait;
use thiserror::Error;

pub use comicbagi_source::mangadex::{Chapter, Manga};

use crate::domain::entities::page::{Page, PageRequest};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source error: {0}")]
    Source(#[from] comicbagi_source::Error),
}

#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn search_manga(&self, page: PageRequest) -> Result<Page<Manga>, SourceError>;

    async fn get_manga_feed(
        &self,
        manga_id: &str,
        page: PageRequest,
    ) -> Result<Page<Chapter>, SourceError>;
}
