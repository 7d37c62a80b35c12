#[macro_use]
extern crate log;

use clap::{Parser, Subcommand};
use comicbagi_scrap::{
    application::sync::{RateLimiter, Reconciler},
    domain::repositories::audit::AuditSink,
    infrastructure::{
        audit::{FileAudit, LogAudit},
        auth::OAuthTokenSource,
        config::Config,
        repositories::{
            catalog::CatalogRepositoryImpl, resolver::ComicResolverImpl,
            source::SourceRepositoryImpl,
        },
    },
};
use comicbagi_source::{ComicKing, MangaDex};

#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile MangaDex titles and chapters into the catalog
    Sync {
        /// Stop once this many comics were created, 0 means no limit
        #[clap(long)]
        max_new_comics: Option<u32>,
        /// Cap on chapters created per comic, 0 means no limit
        #[clap(long)]
        max_new_chapters: Option<u32>,
    },
    /// Create the configured languages, website and item languages only
    Seed,
}

fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(level) = std::env::var("COMICBAGI_LOG") {
            builder.parse_filters(&format!(
                "comicbagi_scrap={level},comicbagi_source={level}"
            ));
        }
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logger();

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config)?;
    debug!("using config at {:?}", config.path());

    let catalog = CatalogRepositoryImpl::new(&config.base_url)?;
    let source = SourceRepositoryImpl::new(MangaDex::new(&config.mangadex.base_url)?);
    let resolver = match config.comicking.as_ref() {
        Some(comicking) => Some(ComicResolverImpl::new(ComicKing::new(&comicking.base_url)?)),
        None => {
            warn!("comicking is not configured, MyAnimeList references will be skipped");
            None
        }
    };
    let token_source = OAuthTokenSource::new(config.oauth()?)?;
    let audit: Box<dyn AuditSink> = match config.note_path.as_ref() {
        Some(note_path) => Box::new(FileAudit::open(note_path)?),
        None => Box::new(LogAudit),
    };

    let mut reconciler = Reconciler::new(
        catalog,
        source,
        resolver,
        token_source,
        config.sync_settings(),
        RateLimiter::new(config.delays.clone()),
        audit,
    );

    match opts.command {
        Command::Sync {
            max_new_comics,
            max_new_chapters,
        } => {
            let report = reconciler
                .run_sync(max_new_comics, max_new_chapters)
                .await
                .inspect_err(|e| error!("sync aborted: {e}"))?;
            info!(
                "{} comics checked, {} new comics, {} new chapters",
                report.checked_comics, report.new_comics, report.new_chapters
            );
        }
        Command::Seed => {
            reconciler
                .load(true)
                .await
                .inspect_err(|e| error!("seed aborted: {e}"))?;
            info!("seed complete");
        }
    }

    Ok(())
}
