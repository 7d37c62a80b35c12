use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    chapter::ComicChapter,
    comic::{Comic, DestinationLink},
    language::{ItemLanguage, Language},
    link::Link,
    page::{Page, PageRequest},
    website::Website,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found")]
    NotFound,
    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// The ComicBagi catalog. Every call carries the session's bearer token when
/// one has been issued.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_language(
        &self,
        token: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Language>, CatalogError>;

    async fn add_language(
        &self,
        token: Option<&str>,
        language: &Language,
    ) -> Result<(), CatalogError>;

    async fn get_website(&self, token: Option<&str>, host: &str) -> Result<Website, CatalogError>;

    async fn add_website(&self, token: Option<&str>, website: &Website)
    -> Result<(), CatalogError>;

    async fn list_website_item_language(
        &self,
        token: Option<&str>,
        host: &str,
        page: PageRequest,
    ) -> Result<Page<ItemLanguage>, CatalogError>;

    async fn add_website_item_language(
        &self,
        token: Option<&str>,
        host: &str,
        item_language: &ItemLanguage,
    ) -> Result<(), CatalogError>;

    async fn get_link(&self, token: Option<&str>, href: &str) -> Result<Link, CatalogError>;

    async fn add_link(&self, token: Option<&str>, link: &Link) -> Result<(), CatalogError>;

    async fn get_link_item_language(
        &self,
        token: Option<&str>,
        href: &str,
        lang: &str,
    ) -> Result<ItemLanguage, CatalogError>;

    async fn add_link_item_language(
        &self,
        token: Option<&str>,
        href: &str,
        item_language: &ItemLanguage,
    ) -> Result<(), CatalogError>;

    /// Comics having a destination link to `href`.
    async fn list_comic_by_destination_link(
        &self,
        token: Option<&str>,
        href: &str,
    ) -> Result<Vec<Comic>, CatalogError>;

    async fn get_comic(&self, token: Option<&str>, code: &str) -> Result<Comic, CatalogError>;

    async fn add_comic(&self, token: Option<&str>, comic: &Comic) -> Result<(), CatalogError>;

    async fn list_comic_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        href: &str,
    ) -> Result<Vec<DestinationLink>, CatalogError>;

    async fn add_comic_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        destination_link: &DestinationLink,
    ) -> Result<(), CatalogError>;

    async fn get_comic_chapter(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
    ) -> Result<ComicChapter, CatalogError>;

    async fn add_comic_chapter(
        &self,
        token: Option<&str>,
        code: &str,
        chapter: &ComicChapter,
    ) -> Result<(), CatalogError>;

    async fn list_comic_chapter_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
        href: &str,
    ) -> Result<Vec<DestinationLink>, CatalogError>;

    async fn add_comic_chapter_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
        destination_link: &DestinationLink,
    ) -> Result<(), CatalogError>;
}
