use comicbagi_source::mangadex::Links;

use crate::{
    application::sync::SyncError,
    domain::{
        entities::{
            comic::{Comic, DestinationLink},
            language::ItemLanguage,
            link::Link,
        },
        repositories::{
            auth::TokenSource, catalog::CatalogRepository, resolver::ComicResolver,
            source::{Manga, SourceRepository},
        },
    },
};

use super::{Reconciled, Reconciler, ensure_exists, listed, released_at};

/// Cross reference key of MyAnimeList ids in MangaDex links.
const MYANIMELIST_KEY: &str = "mal";

const COMPANION_MARKER: &str = "=== ComicKing Scrap ===";

impl<C, S, R, T> Reconciler<C, S, R, T>
where
    C: CatalogRepository,
    S: SourceRepository,
    R: ComicResolver,
    T: TokenSource,
{
    /// Makes sure the catalog holds a comic for `manga`, cross referenced to
    /// its MangaDex title page.
    ///
    /// A comic already linked to the title page is returned as is. Otherwise
    /// the comic code is resolved from the manga's outbound references and the
    /// comic, its link, the link's item languages and the destination link are
    /// created where missing. Returns `None` when the manga cannot be tied to
    /// a comic.
    pub async fn reconcile_comic(
        &mut self,
        manga: &Manga,
    ) -> Result<Option<Reconciled>, SyncError> {
        let Some(manga_id) = manga.id.as_deref() else {
            return Ok(None);
        };

        self.session.auth.ensure_authenticated().await?;
        let bearer = self.session.bearer();
        let token = bearer.as_deref();

        let link = Link::new(&self.settings.website.host, &format!("/title/{manga_id}"));
        let href = link.href();

        debug!("looking up comics linked to {href}");
        let comics = self
            .catalog
            .list_comic_by_destination_link(token, &href)
            .await?;
        if let Some(comic) = comics.first() {
            if comics.len() > 1 {
                warn!("{} comics are linked to {href}", comics.len());
                self.note(&[&format!(
                    "Detected multiple comic with same MangaDex ID {manga_id}"
                )])?;
            }

            return Ok(Some(Reconciled {
                key: comic.code.clone(),
                existed: true,
            }));
        }

        let Some(attributes) = manga.attributes.as_ref() else {
            return Ok(None);
        };

        let Some(code) = self
            .resolve_comic_code(manga_id, attributes.links.as_ref())
            .await?
        else {
            info!("manga {manga_id} has no resolvable reference, skipped");
            return Ok(None);
        };

        let comic = Comic { code: code.clone() };
        let ensured = ensure_exists(self.catalog.get_comic(token, &code), || {
            self.catalog.add_comic(token, &comic)
        })
        .await?;
        self.settle(ensured, format!("Comic \"{code}\"")).await;
        let existed = !ensured.created();

        let ensured = ensure_exists(self.catalog.get_link(token, &href), || {
            self.catalog.add_link(token, &link)
        })
        .await?;
        self.settle(ensured, format!("Link \"{href}\"")).await;

        let languages = attributes.available_translated_languages.iter().flatten();
        for lang in languages {
            if !self.session.cache.has_item_language(lang) {
                debug!("language {lang:?} of {href} is not registered, skipped");
                continue;
            }

            let item_language = ItemLanguage::new(lang, 0);
            let ensured = ensure_exists(
                self.catalog.get_link_item_language(token, &href, lang),
                || self.catalog.add_link_item_language(token, &href, &item_language),
            )
            .await?;
            self.settle(ensured, format!("Link \"{href}\" item language \"{lang}\""))
                .await;
        }

        let destination_link =
            DestinationLink::new(&link, released_at(attributes.created_at.as_deref()));
        let ensured = ensure_exists(
            listed(self.catalog.list_comic_destination_link(token, &code, &href)),
            || {
                self.catalog
                    .add_comic_destination_link(token, &code, &destination_link)
            },
        )
        .await?;
        self.settle(ensured, format!("Comic \"{code}\" destination link \"{href}\""))
            .await;

        Ok(Some(Reconciled { key: code, existed }))
    }

    /// Scans the references in the order MangaDex lists them and resolves the
    /// first supported one.
    async fn resolve_comic_code(
        &mut self,
        manga_id: &str,
        links: Option<&Links>,
    ) -> Result<Option<String>, SyncError> {
        for (key, value) in links.into_iter().flat_map(Links::iter) {
            match key {
                MYANIMELIST_KEY => return self.resolve_myanimelist(manga_id, value).await,
                _ => debug!("manga {manga_id}: unsupported reference {key:?}"),
            }
        }

        Ok(None)
    }

    async fn resolve_myanimelist(
        &mut self,
        manga_id: &str,
        value: &str,
    ) -> Result<Option<String>, SyncError> {
        if self.resolver.is_none() {
            warn!("manga {manga_id}: no companion configured for MyAnimeList {value}");
            return Ok(None);
        }

        let mal_id = match value.trim().parse::<i64>() {
            Ok(mal_id) => mal_id,
            Err(e) => {
                warn!("manga {manga_id}: invalid MyAnimeList id {value:?}: {e}");
                return Ok(None);
            }
        };

        self.note(&[COMPANION_MARKER])?;

        let code = match self.resolver.as_ref() {
            Some(resolver) => resolver.get_or_add_comic_complete(mal_id).await?,
            None => None,
        };

        self.note(&[COMPANION_MARKER])?;
        self.limiter.after_resolve().await;

        Ok(code)
    }
}
