use crate::domain::repositories::auth::TokenSource;

use super::{auth::Authenticator, cache::IdentityCache};

/// Mutable state of one sync process: credentials and the identity cache.
pub struct Session<T> {
    pub auth: Authenticator<T>,
    pub cache: IdentityCache,
}

impl<T> Session<T>
where
    T: TokenSource,
{
    pub fn new(token_source: T) -> Self {
        Self {
            auth: Authenticator::new(token_source),
            cache: IdentityCache::default(),
        }
    }

    /// Owned copy of the current bearer token, so it can be held across
    /// cache updates.
    pub fn bearer(&self) -> Option<String> {
        self.auth.token().map(str::to_owned)
    }
}
