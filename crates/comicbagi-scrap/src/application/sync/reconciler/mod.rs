mod chapter;
mod comic;
mod seed;

use std::{fmt, future::Future};

use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::domain::{
    entities::page::Ensured,
    repositories::{
        audit::AuditSink,
        auth::TokenSource,
        catalog::{CatalogError, CatalogRepository},
        resolver::ComicResolver,
        source::SourceRepository,
    },
};

use super::{
    SyncError, SyncSettings, pagination::PaginationWalker, rate_limit::RateLimiter,
    session::Session,
};

/// A comic or chapter the catalog now holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Comic code, or chapter key for chapters.
    pub key: String,
    /// Whether the record was already there before this call.
    pub existed: bool,
}

/// Counters of one `run_sync`; only newly created records are counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub checked_comics: u32,
    pub new_comics: u32,
    pub new_chapters: u32,
}

/// Drives the reconciliation of source items into the catalog.
///
/// Everything runs sequentially; the only suspension points are the rate
/// limiter's fixed sleeps and the outbound calls themselves.
pub struct Reconciler<C, S, R, T> {
    catalog: C,
    source: S,
    resolver: Option<R>,
    session: Session<T>,
    limiter: RateLimiter,
    settings: SyncSettings,
    audit: Box<dyn AuditSink>,
}

impl<C, S, R, T> Reconciler<C, S, R, T>
where
    C: CatalogRepository,
    S: SourceRepository,
    R: ComicResolver,
    T: TokenSource,
{
    pub fn new(
        catalog: C,
        source: S,
        resolver: Option<R>,
        token_source: T,
        settings: SyncSettings,
        limiter: RateLimiter,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self {
            catalog,
            source,
            resolver,
            session: Session::new(token_source),
            limiter,
            settings,
            audit,
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// One full pass: seed, then walk the source search and every feed of the
    /// comics it resolves. Stops early once `max_new_comics` comics were
    /// created; `max_new_chapters` caps created chapters per comic.
    pub async fn run_sync(
        &mut self,
        max_new_comics: Option<u32>,
        max_new_chapters: Option<u32>,
    ) -> Result<SyncReport, SyncError> {
        self.note(&["#"])?;
        self.note(&[&format!("# Started time {}", ctime())])?;
        self.note(&["#"])?;
        self.note(&[])?;

        self.load(true).await?;

        let report = self.sync_comics(max_new_comics, max_new_chapters).await?;

        info!(
            "sync finished: {} comics checked, {} new comics, {} new chapters, {} chapters known",
            report.checked_comics,
            report.new_comics,
            report.new_chapters,
            self.session.cache.chapter_count()
        );

        self.note(&[])?;
        self.note(&[&format!("# Stopped time {}", ctime())])?;
        self.note(&[])?;

        Ok(report)
    }

    async fn sync_comics(
        &mut self,
        max_new_comics: Option<u32>,
        max_new_chapters: Option<u32>,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let mut pages = PaginationWalker::new(self.settings.search_page_size);

        'pages: while let Some(request) = pages.next_request() {
            if reached(report.new_comics, max_new_comics) {
                break;
            }

            let page = self.source.search_manga(request).await?;
            let more = pages.advance(&page);

            for manga in &page.items {
                if reached(report.new_comics, max_new_comics) {
                    break 'pages;
                }

                let Some(manga_id) = manga.id.as_deref() else {
                    continue;
                };

                self.note(&[])?;
                self.note(&[&format!("Check MangaDex manga ID {manga_id}")])?;

                let comic = self.reconcile_comic(manga).await?;
                report.checked_comics += 1;

                if let Some(comic) = &comic {
                    report.new_chapters += self
                        .sync_chapters(&comic.key, manga_id, max_new_chapters)
                        .await?;
                }

                self.note(&[&format!("MangaDex manga ID {manga_id} check complete")])?;
                self.note(&[])?;

                if matches!(&comic, Some(comic) if !comic.existed) {
                    report.new_comics += 1;
                    self.limiter.after_new_comic().await;
                }
            }

            if !more {
                break;
            }
            self.limiter.after_source_page().await;
        }

        debug!("{} search results walked", pages.fetched());

        Ok(report)
    }

    async fn sync_chapters(
        &mut self,
        comic_code: &str,
        manga_id: &str,
        max_new_chapters: Option<u32>,
    ) -> Result<u32, SyncError> {
        let mut created = 0;
        let mut pages = PaginationWalker::new(self.settings.feed_page_size);

        'pages: while let Some(request) = pages.next_request() {
            if reached(created, max_new_chapters) {
                break;
            }

            let page = self.source.get_manga_feed(manga_id, request).await?;
            let more = pages.advance(&page);

            for chapter in &page.items {
                if reached(created, max_new_chapters) {
                    break 'pages;
                }

                let Some(chapter_id) = chapter.id.as_deref() else {
                    continue;
                };

                self.note(&[&format!("Check MangaDex chapter ID {chapter_id}")])?;

                let reconciled = self.reconcile_chapter(comic_code, chapter).await?;

                self.note(&[&format!("MangaDex chapter ID {chapter_id} check complete")])?;

                if matches!(&reconciled, Some(chapter) if !chapter.existed) {
                    created += 1;
                    self.limiter.after_new_chapter().await;
                }
            }

            if !more {
                break;
            }
            self.limiter.after_source_page().await;
        }

        debug!("{} feed entries of manga {manga_id} walked", pages.fetched());

        Ok(created)
    }

    fn note(&mut self, lines: &[&str]) -> Result<(), SyncError> {
        Ok(self.audit.note(lines)?)
    }

    /// Logs a record an ensure step had to create and paces the next write.
    async fn settle(&self, ensured: Ensured, record: impl fmt::Display) {
        if ensured.created() {
            info!("{record} added");
            self.limiter.after_write().await;
        } else {
            debug!("{record} found");
        }
    }
}

/// Probes for a record and creates it when, and only when, the probe reports
/// Not-Found. Any other probe error is returned untouched.
pub(crate) async fn ensure_exists<V, P, K, KF>(probe: P, create: K) -> Result<Ensured, CatalogError>
where
    P: Future<Output = Result<V, CatalogError>>,
    K: FnOnce() -> KF,
    KF: Future<Output = Result<(), CatalogError>>,
{
    match probe.await {
        Ok(_) => Ok(Ensured::Found),
        Err(CatalogError::NotFound) => {
            create().await?;
            Ok(Ensured::Created)
        }
        Err(e) => Err(e),
    }
}

/// Probes through a filtered listing: an empty result means Not-Found.
pub(crate) async fn listed<V, F>(list: F) -> Result<V, CatalogError>
where
    F: Future<Output = Result<Vec<V>, CatalogError>>,
{
    list.await?.into_iter().next().ok_or(CatalogError::NotFound)
}

/// Release timestamp of a source item, falling back to now when the item has
/// none or it cannot be read.
pub(crate) fn released_at(created_at: Option<&str>) -> DateTime<Utc> {
    created_at.and_then(parse_timestamp).unwrap_or_else(Utc::now)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }

    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(at) => Some(at.and_utc()),
        Err(e) => {
            warn!("unreadable timestamp {value:?}: {e}");
            None
        }
    }
}

fn reached(count: u32, max: Option<u32>) -> bool {
    max.is_some_and(|max| max > 0 && count >= max)
}

fn ctime() -> String {
    Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}
