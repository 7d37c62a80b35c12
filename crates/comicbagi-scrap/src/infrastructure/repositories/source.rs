use async_trait::async_trait;
use comicbagi_source::MangaDex;

use crate::domain::{
    entities::page::{Page, PageRequest},
    repositories::source::{Chapter, Manga, SourceError, SourceRepository},
};

pub struct SourceRepositoryImpl {
    client: MangaDex,
}

impl SourceRepositoryImpl {
    pub fn new(client: MangaDex) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceRepository for SourceRepositoryImpl {
    async fn search_manga(&self, page: PageRequest) -> Result<Page<Manga>, SourceError> {
        let collection = self
            .client
            .search_manga(page.limit, page.offset())
            .await?;

        Ok(Page::new(collection.data, collection.total))
    }

    async fn get_manga_feed(
        &self,
        manga_id: &str,
        page: PageRequest,
    ) -> Result<Page<Chapter>, SourceError> {
        let collection = self
            .client
            .get_manga_feed(manga_id, page.limit, page.offset())
            .await?;

        Ok(Page::new(collection.data, collection.total))
    }
}
