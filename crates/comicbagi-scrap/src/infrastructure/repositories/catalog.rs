use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url, header::HeaderMap};
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::{
    entities::{
        chapter::ComicChapter,
        comic::{Comic, DestinationLink},
        language::{ItemLanguage, Language},
        link::Link,
        page::{Page, PageRequest},
        website::Website,
    },
    repositories::catalog::{CatalogError, CatalogRepository},
};

const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// REST client of the ComicBagi catalog API.
pub struct CatalogRepositoryImpl {
    base_url: Url,
    api_client: reqwest::Client,
}

impl CatalogRepositoryImpl {
    pub fn new(base_url: &str) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("{base_url} cannot be a base url"));
        }

        let api_client = reqwest::Client::builder()
            .user_agent(format!("ComicBagiScrap/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            api_client,
        })
    }

    /// Each segment is percent-encoded on its own, so an href stays a single
    /// segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, token: Option<&str>, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{method} {url}");

        let req = self.api_client.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let res = self
            .request(Method::GET, token, segments)
            .query(query)
            .send()
            .await
            .map_err(|e| anyhow!("{e}"))?;

        Ok(check_status(res)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("{e}"))?)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        segments: &[&str],
        page: PageRequest,
    ) -> Result<Page<T>, CatalogError> {
        let res = self
            .request(Method::GET, token, segments)
            .query(&[("page", page.page), ("limit", page.limit)])
            .send()
            .await
            .map_err(|e| anyhow!("{e}"))?;

        let res = check_status(res).await?;
        let total = total_count(res.headers());
        let items = res.json().await.map_err(|e| anyhow!("{e}"))?;

        Ok(Page::new(items, total))
    }

    async fn post<B: Serialize + Sync>(
        &self,
        token: Option<&str>,
        segments: &[&str],
        body: &B,
    ) -> Result<(), CatalogError> {
        let res = self
            .request(Method::POST, token, segments)
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("{e}"))?;

        check_status(res).await?;

        Ok(())
    }
}

async fn check_status(res: Response) -> Result<Response, CatalogError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound);
    }

    let body = res.text().await.unwrap_or_default();
    Err(CatalogError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Header names are case-insensitive, a missing or unreadable count is `None`.
fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn link_href_filter(href: &str) -> [(&'static str, String); 1] {
    [("linkHREF", href.to_string())]
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn list_language(
        &self,
        token: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Language>, CatalogError> {
        self.get_page(token, &["languages"], page).await
    }

    async fn add_language(
        &self,
        token: Option<&str>,
        language: &Language,
    ) -> Result<(), CatalogError> {
        self.post(token, &["languages"], language).await
    }

    async fn get_website(&self, token: Option<&str>, host: &str) -> Result<Website, CatalogError> {
        self.get(token, &["websites", host], &[]).await
    }

    async fn add_website(
        &self,
        token: Option<&str>,
        website: &Website,
    ) -> Result<(), CatalogError> {
        self.post(token, &["websites"], website).await
    }

    async fn list_website_item_language(
        &self,
        token: Option<&str>,
        host: &str,
        page: PageRequest,
    ) -> Result<Page<ItemLanguage>, CatalogError> {
        self.get_page(token, &["websites", host, "item-languages"], page)
            .await
    }

    async fn add_website_item_language(
        &self,
        token: Option<&str>,
        host: &str,
        item_language: &ItemLanguage,
    ) -> Result<(), CatalogError> {
        self.post(token, &["websites", host, "item-languages"], item_language)
            .await
    }

    async fn get_link(&self, token: Option<&str>, href: &str) -> Result<Link, CatalogError> {
        self.get(token, &["links", href], &[]).await
    }

    async fn add_link(&self, token: Option<&str>, link: &Link) -> Result<(), CatalogError> {
        self.post(token, &["links"], link).await
    }

    async fn get_link_item_language(
        &self,
        token: Option<&str>,
        href: &str,
        lang: &str,
    ) -> Result<ItemLanguage, CatalogError> {
        self.get(token, &["links", href, "item-languages", lang], &[])
            .await
    }

    async fn add_link_item_language(
        &self,
        token: Option<&str>,
        href: &str,
        item_language: &ItemLanguage,
    ) -> Result<(), CatalogError> {
        self.post(token, &["links", href, "item-languages"], item_language)
            .await
    }

    async fn list_comic_by_destination_link(
        &self,
        token: Option<&str>,
        href: &str,
    ) -> Result<Vec<Comic>, CatalogError> {
        self.get(
            token,
            &["comics"],
            &[("destinationLink", format!("linkHREF={href}"))],
        )
        .await
    }

    async fn get_comic(&self, token: Option<&str>, code: &str) -> Result<Comic, CatalogError> {
        self.get(token, &["comics", code], &[]).await
    }

    async fn add_comic(&self, token: Option<&str>, comic: &Comic) -> Result<(), CatalogError> {
        self.post(token, &["comics"], comic).await
    }

    async fn list_comic_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        href: &str,
    ) -> Result<Vec<DestinationLink>, CatalogError> {
        self.get(
            token,
            &["comics", code, "destination-links"],
            &link_href_filter(href),
        )
        .await
    }

    async fn add_comic_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        destination_link: &DestinationLink,
    ) -> Result<(), CatalogError> {
        self.post(token, &["comics", code, "destination-links"], destination_link)
            .await
    }

    async fn get_comic_chapter(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
    ) -> Result<ComicChapter, CatalogError> {
        self.get(token, &["comics", code, "chapters", nv], &[]).await
    }

    async fn add_comic_chapter(
        &self,
        token: Option<&str>,
        code: &str,
        chapter: &ComicChapter,
    ) -> Result<(), CatalogError> {
        self.post(token, &["comics", code, "chapters"], chapter)
            .await
    }

    async fn list_comic_chapter_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
        href: &str,
    ) -> Result<Vec<DestinationLink>, CatalogError> {
        self.get(
            token,
            &["comics", code, "chapters", nv, "destination-links"],
            &link_href_filter(href),
        )
        .await
    }

    async fn add_comic_chapter_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
        destination_link: &DestinationLink,
    ) -> Result<(), CatalogError> {
        self.post(
            token,
            &["comics", code, "chapters", nv, "destination-links"],
            destination_link,
        )
        .await
    }
}
