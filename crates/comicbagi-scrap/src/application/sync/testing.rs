//! In-memory stand-ins for the external seams, shared by the sync tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use comicbagi_source::mangadex::{Chapter, ChapterAttributes, Links, Manga, MangaAttributes};

use crate::domain::{
    entities::{
        chapter::ComicChapter,
        comic::{Comic, DestinationLink},
        language::{ItemLanguage, Language},
        link::Link,
        page::{Page, PageRequest},
        website::Website,
    },
    repositories::{
        audit::AuditSink,
        auth::{AuthError, Token, TokenSource},
        catalog::{CatalogError, CatalogRepository},
        resolver::{ComicResolver, ResolverError},
        source::{SourceError, SourceRepository},
    },
};

use super::{RateLimiter, Reconciler, SyncSettings, default_languages};

fn page_of<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let start = (request.offset() as usize).min(items.len());
    let end = (start + request.limit as usize).min(items.len());
    Page::new(items[start..end].to_vec(), Some(items.len() as u64))
}

#[derive(Default)]
struct CatalogState {
    languages: Vec<Language>,
    websites: Vec<Website>,
    website_item_languages: Vec<(String, ItemLanguage)>,
    links: Vec<Link>,
    link_item_languages: Vec<(String, ItemLanguage)>,
    comics: Vec<Comic>,
    comic_destination_links: Vec<(String, DestinationLink)>,
    chapters: Vec<(String, ComicChapter)>,
    chapter_destination_links: Vec<(String, String, DestinationLink)>,
    failures: HashMap<&'static str, u16>,
    calls: Vec<&'static str>,
    tokens: Vec<Option<String>>,
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    /// A catalog that already holds the default languages, the MangaDex
    /// website and its `en`/`id` item languages.
    pub fn seeded() -> Self {
        let catalog = Self::default();
        {
            let mut state = catalog.lock();
            state.languages = default_languages();
            state.websites.push(SyncSettings::default().website);
            for lang in ["en", "id"] {
                state
                    .website_item_languages
                    .push(("mangadex.org".to_string(), ItemLanguage::new(lang, 0)));
            }
        }
        catalog
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap()
    }

    fn enter(
        &self,
        op: &'static str,
        token: Option<&str>,
    ) -> Result<MutexGuard<'_, CatalogState>, CatalogError> {
        let mut state = self.lock();
        state.calls.push(op);
        state.tokens.push(token.map(str::to_owned));
        match state.failures.get(op).copied() {
            Some(404) => Err(CatalogError::NotFound),
            Some(status) => Err(CatalogError::Status {
                status,
                body: format!("{op} failed"),
            }),
            None => Ok(state),
        }
    }

    /// Makes every later call of `op` fail with `status`.
    pub fn fail(&self, op: &'static str, status: u16) {
        self.lock().failures.insert(op, status);
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|call| **call == op).count()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.lock().tokens.clone()
    }

    pub fn insert_language(&self, lang: &str, name: &str) {
        self.lock().languages.push(Language {
            lang: lang.to_string(),
            name: name.to_string(),
        });
    }

    pub fn insert_comic(&self, code: &str) {
        self.lock().comics.push(Comic {
            code: code.to_string(),
        });
    }

    /// A comic already cross referenced to `href` by an earlier run.
    pub fn insert_comic_link(&self, code: &str, href: &str) {
        let (host, path) = href.split_at(href.find('/').unwrap_or(href.len()));
        let link = Link::new(host, path);
        let mut state = self.lock();
        state.comics.push(Comic {
            code: code.to_string(),
        });
        state.comic_destination_links.push((
            code.to_string(),
            DestinationLink::new(&link, chrono::Utc::now()),
        ));
        state.links.push(link);
    }

    pub fn insert_chapter(&self, code: &str, chapter: ComicChapter) {
        self.lock().chapters.push((code.to_string(), chapter));
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.lock().languages.iter().map(|l| l.lang.clone()).collect()
    }

    pub fn website_hosts(&self) -> Vec<String> {
        self.lock().websites.iter().map(|w| w.host.clone()).collect()
    }

    pub fn website_item_languages(&self, host: &str) -> Vec<ItemLanguage> {
        self.lock()
            .website_item_languages
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn comic_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.lock().comics.iter().map(|c| c.code.clone()).collect();
        codes.sort();
        codes
    }

    pub fn link_hrefs(&self) -> Vec<String> {
        let mut hrefs: Vec<String> = self.lock().links.iter().map(Link::href).collect();
        hrefs.sort();
        hrefs
    }

    pub fn link_item_languages(&self, href: &str) -> Vec<ItemLanguage> {
        self.lock()
            .link_item_languages
            .iter()
            .filter(|(h, _)| h == href)
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn comic_destination_links(&self, code: &str) -> Vec<DestinationLink> {
        self.lock()
            .comic_destination_links
            .iter()
            .filter(|(c, _)| c == code)
            .map(|(_, link)| link.clone())
            .collect()
    }

    pub fn chapter_nvs(&self, code: &str) -> Vec<String> {
        let mut nvs: Vec<String> = self
            .lock()
            .chapters
            .iter()
            .filter(|(c, _)| c == code)
            .map(|(_, chapter)| chapter.nv())
            .collect();
        nvs.sort();
        nvs
    }

    pub fn chapter_destination_links(&self, code: &str, nv: &str) -> Vec<DestinationLink> {
        self.lock()
            .chapter_destination_links
            .iter()
            .filter(|(c, n, _)| c == code && n == nv)
            .map(|(_, _, link)| link.clone())
            .collect()
    }
}

#[async_trait]
impl CatalogRepository for FakeCatalog {
    async fn list_language(
        &self,
        token: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Language>, CatalogError> {
        let state = self.enter("list_language", token)?;
        Ok(page_of(&state.languages, page))
    }

    async fn add_language(
        &self,
        token: Option<&str>,
        language: &Language,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_language", token)?;
        state.languages.push(language.clone());
        Ok(())
    }

    async fn get_website(&self, token: Option<&str>, host: &str) -> Result<Website, CatalogError> {
        let state = self.enter("get_website", token)?;
        state
            .websites
            .iter()
            .find(|w| w.host == host)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn add_website(
        &self,
        token: Option<&str>,
        website: &Website,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_website", token)?;
        state.websites.push(website.clone());
        Ok(())
    }

    async fn list_website_item_language(
        &self,
        token: Option<&str>,
        host: &str,
        page: PageRequest,
    ) -> Result<Page<ItemLanguage>, CatalogError> {
        let state = self.enter("list_website_item_language", token)?;
        let items: Vec<ItemLanguage> = state
            .website_item_languages
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, item)| item.clone())
            .collect();
        Ok(page_of(&items, page))
    }

    async fn add_website_item_language(
        &self,
        token: Option<&str>,
        host: &str,
        item_language: &ItemLanguage,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_website_item_language", token)?;
        state
            .website_item_languages
            .push((host.to_string(), item_language.clone()));
        Ok(())
    }

    async fn get_link(&self, token: Option<&str>, href: &str) -> Result<Link, CatalogError> {
        let state = self.enter("get_link", token)?;
        state
            .links
            .iter()
            .find(|link| link.href() == href)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn add_link(&self, token: Option<&str>, link: &Link) -> Result<(), CatalogError> {
        let mut state = self.enter("add_link", token)?;
        state.links.push(link.clone());
        Ok(())
    }

    async fn get_link_item_language(
        &self,
        token: Option<&str>,
        href: &str,
        lang: &str,
    ) -> Result<ItemLanguage, CatalogError> {
        let state = self.enter("get_link_item_language", token)?;
        state
            .link_item_languages
            .iter()
            .find(|(h, item)| h == href && item.language_lang == lang)
            .map(|(_, item)| item.clone())
            .ok_or(CatalogError::NotFound)
    }

    async fn add_link_item_language(
        &self,
        token: Option<&str>,
        href: &str,
        item_language: &ItemLanguage,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_link_item_language", token)?;
        state
            .link_item_languages
            .push((href.to_string(), item_language.clone()));
        Ok(())
    }

    async fn list_comic_by_destination_link(
        &self,
        token: Option<&str>,
        href: &str,
    ) -> Result<Vec<Comic>, CatalogError> {
        let state = self.enter("list_comic_by_destination_link", token)?;
        Ok(state
            .comic_destination_links
            .iter()
            .filter(|(_, link)| link.href() == href)
            .map(|(code, _)| Comic { code: code.clone() })
            .collect())
    }

    async fn get_comic(&self, token: Option<&str>, code: &str) -> Result<Comic, CatalogError> {
        let state = self.enter("get_comic", token)?;
        state
            .comics
            .iter()
            .find(|comic| comic.code == code)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn add_comic(&self, token: Option<&str>, comic: &Comic) -> Result<(), CatalogError> {
        let mut state = self.enter("add_comic", token)?;
        state.comics.push(comic.clone());
        Ok(())
    }

    async fn list_comic_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        href: &str,
    ) -> Result<Vec<DestinationLink>, CatalogError> {
        let state = self.enter("list_comic_destination_link", token)?;
        Ok(state
            .comic_destination_links
            .iter()
            .filter(|(c, link)| c == code && link.href() == href)
            .map(|(_, link)| link.clone())
            .collect())
    }

    async fn add_comic_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        destination_link: &DestinationLink,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_comic_destination_link", token)?;
        state
            .comic_destination_links
            .push((code.to_string(), destination_link.clone()));
        Ok(())
    }

    async fn get_comic_chapter(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
    ) -> Result<ComicChapter, CatalogError> {
        let state = self.enter("get_comic_chapter", token)?;
        state
            .chapters
            .iter()
            .find(|(c, chapter)| c == code && chapter.nv() == nv)
            .map(|(_, chapter)| chapter.clone())
            .ok_or(CatalogError::NotFound)
    }

    async fn add_comic_chapter(
        &self,
        token: Option<&str>,
        code: &str,
        chapter: &ComicChapter,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_comic_chapter", token)?;
        state.chapters.push((code.to_string(), chapter.clone()));
        Ok(())
    }

    async fn list_comic_chapter_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
        href: &str,
    ) -> Result<Vec<DestinationLink>, CatalogError> {
        let state = self.enter("list_comic_chapter_destination_link", token)?;
        Ok(state
            .chapter_destination_links
            .iter()
            .filter(|(c, n, link)| c == code && n == nv && link.href() == href)
            .map(|(_, _, link)| link.clone())
            .collect())
    }

    async fn add_comic_chapter_destination_link(
        &self,
        token: Option<&str>,
        code: &str,
        nv: &str,
        destination_link: &DestinationLink,
    ) -> Result<(), CatalogError> {
        let mut state = self.enter("add_comic_chapter_destination_link", token)?;
        state.chapter_destination_links.push((
            code.to_string(),
            nv.to_string(),
            destination_link.clone(),
        ));
        Ok(())
    }
}

#[derive(Default)]
struct SourceState {
    mangas: Vec<Manga>,
    feeds: HashMap<String, Vec<Chapter>>,
    search_requests: Vec<(u32, u32)>,
    feed_requests: Vec<(String, u32, u32)>,
}

#[derive(Clone, Default)]
pub struct FakeSource {
    state: Arc<Mutex<SourceState>>,
}

impl FakeSource {
    pub fn push_manga(&self, manga: Manga) {
        self.state.lock().unwrap().mangas.push(manga);
    }

    pub fn push_chapter(&self, manga_id: &str, chapter: Chapter) {
        self.state
            .lock()
            .unwrap()
            .feeds
            .entry(manga_id.to_string())
            .or_default()
            .push(chapter);
    }

    /// `(limit, offset)` of every search call.
    pub fn search_requests(&self) -> Vec<(u32, u32)> {
        self.state.lock().unwrap().search_requests.clone()
    }

    pub fn feed_requests(&self) -> Vec<(String, u32, u32)> {
        self.state.lock().unwrap().feed_requests.clone()
    }
}

#[async_trait]
impl SourceRepository for FakeSource {
    async fn search_manga(&self, page: PageRequest) -> Result<Page<Manga>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.search_requests.push((page.limit, page.offset()));
        Ok(page_of(&state.mangas, page))
    }

    async fn get_manga_feed(
        &self,
        manga_id: &str,
        page: PageRequest,
    ) -> Result<Page<Chapter>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state
            .feed_requests
            .push((manga_id.to_string(), page.limit, page.offset()));
        let chapters = state.feeds.get(manga_id).cloned().unwrap_or_default();
        Ok(page_of(&chapters, page))
    }
}

#[derive(Clone, Default)]
pub struct FakeResolver {
    codes: Arc<Mutex<HashMap<i64, String>>>,
    calls: Arc<Mutex<Vec<i64>>>,
}

impl FakeResolver {
    pub fn insert(&self, mal_id: i64, code: &str) {
        self.codes.lock().unwrap().insert(mal_id, code.to_string());
    }

    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComicResolver for FakeResolver {
    async fn get_or_add_comic_complete(
        &self,
        mal_id: i64,
    ) -> Result<Option<String>, ResolverError> {
        self.calls.lock().unwrap().push(mal_id);
        Ok(self.codes.lock().unwrap().get(&mal_id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct FakeTokenSource {
    calls: Arc<Mutex<u32>>,
}

#[async_trait]
impl TokenSource for FakeTokenSource {
    async fn request_token(&self) -> Result<Token, AuthError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(Token {
            access_token: format!("token-{calls}"),
            expires_in: 86400,
        })
    }
}

#[derive(Clone, Default)]
pub struct MemoryAudit {
    buffer: Arc<Mutex<String>>,
}

impl MemoryAudit {
    pub fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl AuditSink for MemoryAudit {
    fn note(&mut self, lines: &[&str]) -> std::io::Result<()> {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.push_str(&lines.join("\n"));
        buffer.push('\n');
        Ok(())
    }
}

pub type TestReconciler = Reconciler<FakeCatalog, FakeSource, FakeResolver, FakeTokenSource>;

pub fn reconciler(
    catalog: FakeCatalog,
    source: FakeSource,
    resolver: Option<FakeResolver>,
) -> (TestReconciler, MemoryAudit) {
    let audit = MemoryAudit::default();
    let reconciler = Reconciler::new(
        catalog,
        source,
        resolver,
        FakeTokenSource::default(),
        SyncSettings::default(),
        RateLimiter::disabled(),
        Box::new(audit.clone()),
    );
    (reconciler, audit)
}

pub fn manga(id: &str, links: &[(&str, &str)], langs: &[&str], created_at: Option<&str>) -> Manga {
    let mut manga = manga_with_links(id, Some(links.iter().copied().collect()), langs);
    if let Some(attributes) = manga.attributes.as_mut() {
        attributes.created_at = created_at.map(str::to_owned);
    }
    manga
}

pub fn manga_with_links(id: &str, links: Option<Links>, langs: &[&str]) -> Manga {
    Manga {
        id: Some(id.to_string()),
        attributes: Some(MangaAttributes {
            links,
            available_translated_languages: Some(langs.iter().map(|l| l.to_string()).collect()),
            created_at: None,
        }),
    }
}

pub fn chapter(id: &str, number: &str, lang: &str) -> Chapter {
    Chapter {
        id: Some(id.to_string()),
        attributes: Some(ChapterAttributes {
            chapter: Some(number.to_string()),
            translated_language: Some(lang.to_string()),
            created_at: None,
        }),
    }
}
