use crate::{
    application::sync::{SyncError, pagination::collect_all},
    domain::repositories::{
        auth::TokenSource, catalog::CatalogRepository, resolver::ComicResolver,
        source::SourceRepository,
    },
};

use super::{Reconciler, ensure_exists};

impl<C, S, R, T> Reconciler<C, S, R, T>
where
    C: CatalogRepository,
    S: SourceRepository,
    R: ComicResolver,
    T: TokenSource,
{
    /// Fills the identity cache from the catalog.
    ///
    /// With `seeding`, authenticates first and creates whatever configured
    /// language, website or website item language is missing. Without it
    /// nothing is created and a missing website is an error.
    pub async fn load(&mut self, seeding: bool) -> Result<(), SyncError> {
        if seeding {
            self.session.auth.ensure_authenticated().await?;
        }

        self.load_languages(seeding).await?;
        self.load_website(seeding).await?;
        self.load_item_languages(seeding).await?;

        info!(
            "cache loaded: {} languages, {} item languages for {}",
            self.session.cache.language_count(),
            self.session.cache.item_language_count(),
            self.settings.website.host
        );

        Ok(())
    }

    async fn load_languages(&mut self, seeding: bool) -> Result<(), SyncError> {
        let bearer = self.session.bearer();
        let token = bearer.as_deref();

        let catalog = &self.catalog;
        let languages = collect_all(
            self.settings.listing_page_size,
            &self.limiter,
            |request| catalog.list_language(token, request),
        )
        .await?;

        for language in languages {
            self.session.cache.insert_language(language.lang);
        }

        if !seeding {
            return Ok(());
        }

        for language in &self.settings.languages {
            if self.session.cache.has_language(&language.lang) {
                continue;
            }

            self.catalog.add_language(token, language).await?;
            info!("Language \"{}\" added", language.lang);

            self.session.cache.insert_language(language.lang.as_str());
            self.limiter.after_write().await;
        }

        Ok(())
    }

    async fn load_website(&mut self, seeding: bool) -> Result<(), SyncError> {
        let website = &self.settings.website;
        if self.session.cache.has_website(&website.host) {
            return Ok(());
        }

        let bearer = self.session.bearer();
        let token = bearer.as_deref();

        debug!("probing website {}", website.host);
        let probe = self.catalog.get_website(token, &website.host);
        if seeding {
            let ensured = ensure_exists(probe, || self.catalog.add_website(token, website)).await?;
            self.settle(ensured, format!("Website \"{}\"", website.host))
                .await;
        } else {
            probe.await?;
        }

        self.session.cache.insert_website(website.host.as_str());

        Ok(())
    }

    async fn load_item_languages(&mut self, seeding: bool) -> Result<(), SyncError> {
        let bearer = self.session.bearer();
        let token = bearer.as_deref();
        let host = self.settings.website.host.as_str();

        let catalog = &self.catalog;
        let item_languages = collect_all(
            self.settings.listing_page_size,
            &self.limiter,
            |request| catalog.list_website_item_language(token, host, request),
        )
        .await?;

        for item_language in item_languages {
            self.session
                .cache
                .insert_item_language(item_language.language_lang);
        }

        if !seeding {
            return Ok(());
        }

        for item_language in &self.settings.item_languages {
            let lang = item_language.language_lang.as_str();
            if self.session.cache.has_item_language(lang) {
                continue;
            }

            self.catalog
                .add_website_item_language(token, host, item_language)
                .await?;
            info!("Website \"{host}\" item language \"{lang}\" added");

            self.session.cache.insert_item_language(lang);
            self.limiter.after_write().await;
        }

        Ok(())
    }
}
