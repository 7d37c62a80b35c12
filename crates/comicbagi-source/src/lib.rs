#[macro_use]
extern crate log;

pub mod mangadex;
pub use mangadex::MangaDex;

pub mod comicking;
pub use comicking::ComicKing;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub(crate) fn user_agent() -> String {
    format!("ComicBagiScrap/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}
