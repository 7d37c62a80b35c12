use std::time::{Duration, Instant};

use crate::domain::repositories::auth::{AuthError, TokenSource};

/// A token is refreshed once it has less than this left.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(300);

/// Holds the bearer token shared by every catalog call of a session.
pub struct Authenticator<T> {
    source: T,
    token: Option<String>,
    expires_at: Option<Instant>,
}

impl<T> Authenticator<T>
where
    T: TokenSource,
{
    pub fn new(source: T) -> Self {
        Self {
            source,
            token: None,
            expires_at: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn is_fresh(&self) -> bool {
        self.expires_at
            .is_some_and(|at| at.saturating_duration_since(Instant::now()) > REFRESH_MARGIN)
    }

    /// Requests a new token unless the current one is still valid for longer
    /// than [`REFRESH_MARGIN`]. Safe to call before every request.
    pub async fn ensure_authenticated(&mut self) -> Result<(), AuthError> {
        if self.is_fresh() {
            return Ok(());
        }

        let token = self.source.request_token().await?;
        let expires_in = Duration::from_secs(token.expires_in.max(0) as u64);

        self.token = Some(token.access_token);
        self.expires_at = Some(Instant::now() + expires_in);

        info!(
            "ComicBagi authenticated, token valid for {}s",
            expires_in.as_secs()
        );

        Ok(())
    }
}
