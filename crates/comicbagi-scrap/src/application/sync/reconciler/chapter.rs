use crate::{
    application::sync::SyncError,
    domain::{
        entities::{
            chapter::{ChapterNumber, ComicChapter, chapter_key},
            comic::DestinationLink,
            language::ItemLanguage,
            link::Link,
        },
        repositories::{
            auth::TokenSource,
            catalog::CatalogRepository,
            resolver::ComicResolver,
            source::{Chapter, SourceRepository},
        },
    },
};

use super::{Reconciled, Reconciler, ensure_exists, listed, released_at};

impl<C, S, R, T> Reconciler<C, S, R, T>
where
    C: CatalogRepository,
    S: SourceRepository,
    R: ComicResolver,
    T: TokenSource,
{
    /// Makes sure the comic `comic_code` holds the chapter of a MangaDex feed
    /// entry, and when its language is registered, links the chapter to its
    /// MangaDex page. Returns the chapter key.
    pub async fn reconcile_chapter(
        &mut self,
        comic_code: &str,
        chapter: &Chapter,
    ) -> Result<Option<Reconciled>, SyncError> {
        let (Some(chapter_id), Some(attributes)) =
            (chapter.id.as_deref(), chapter.attributes.as_ref())
        else {
            return Ok(None);
        };
        let Some(raw_number) = attributes.chapter.as_deref() else {
            return Ok(None);
        };
        let number = match raw_number.parse::<ChapterNumber>() {
            Ok(number) => number,
            Err(e) => {
                warn!("chapter {chapter_id} skipped: {e}");
                return Ok(None);
            }
        };

        self.session.auth.ensure_authenticated().await?;
        let bearer = self.session.bearer();
        let token = bearer.as_deref();

        let comic_chapter = ComicChapter::new(number);
        let nv = comic_chapter.nv();
        let key = chapter_key(comic_code, &number);

        let existed = if self.session.cache.has_chapter(&key) {
            true
        } else {
            let ensured = ensure_exists(
                self.catalog.get_comic_chapter(token, comic_code, &nv),
                || self.catalog.add_comic_chapter(token, comic_code, &comic_chapter),
            )
            .await?;
            self.settle(ensured, format!("Comic \"{comic_code}\" chapter \"{nv}\""))
                .await;
            self.session.cache.insert_chapter(key.as_str());
            !ensured.created()
        };

        let lang = attributes.translated_language.as_deref().unwrap_or_default();
        if !self.session.cache.has_item_language(lang) {
            debug!("chapter {chapter_id} language {lang:?} is not registered, not linked");
            return Ok(Some(Reconciled { key, existed }));
        }

        let link = Link::new(
            &self.settings.website.host,
            &format!("/chapter/{chapter_id}"),
        );
        let href = link.href();

        let ensured = ensure_exists(self.catalog.get_link(token, &href), || {
            self.catalog.add_link(token, &link)
        })
        .await?;
        self.settle(ensured, format!("Link \"{href}\"")).await;

        let item_language = ItemLanguage::new(lang, 0);
        let ensured = ensure_exists(
            self.catalog.get_link_item_language(token, &href, lang),
            || self.catalog.add_link_item_language(token, &href, &item_language),
        )
        .await?;
        self.settle(ensured, format!("Link \"{href}\" item language \"{lang}\""))
            .await;

        let destination_link =
            DestinationLink::new(&link, released_at(attributes.created_at.as_deref()));
        let ensured = ensure_exists(
            listed(
                self.catalog
                    .list_comic_chapter_destination_link(token, comic_code, &nv, &href),
            ),
            || {
                self.catalog.add_comic_chapter_destination_link(
                    token,
                    comic_code,
                    &nv,
                    &destination_link,
                )
            },
        )
        .await?;
        self.settle(
            ensured,
            format!("Comic \"{comic_code}\" chapter \"{nv}\" destination link \"{href}\""),
        )
        .await;

        Ok(Some(Reconciled { key, existed }))
    }
}
