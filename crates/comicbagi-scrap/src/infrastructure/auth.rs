use anyhow::anyhow;
use async_trait::async_trait;
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl, basic::BasicClient,
    reqwest::async_http_client,
};

use crate::domain::repositories::auth::{AuthError, Token, TokenSource};

use super::config::OAuthConfig;

/// Lifetime assumed for tokens issued without `expires_in`.
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Client credentials grant against the catalog's identity provider.
#[derive(Debug, Clone)]
pub struct OAuthTokenSource {
    oauth_client: BasicClient,
    audience: String,
}

impl OAuthTokenSource {
    pub fn new(config: &OAuthConfig) -> Result<Self, anyhow::Error> {
        let issuer = config.issuer.trim_end_matches('/');
        let authorization_url =
            AuthUrl::new(format!("{issuer}/authorize")).map_err(|e| anyhow!("{e}"))?;
        let token_url =
            TokenUrl::new(format!("{issuer}/oauth/token")).map_err(|e| anyhow!("{e}"))?;

        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            authorization_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            oauth_client: client,
            audience: config.audience.clone(),
        })
    }

    pub fn token_url(&self) -> Option<&str> {
        self.oauth_client.token_url().map(|url| url.as_str())
    }
}

#[async_trait]
impl TokenSource for OAuthTokenSource {
    async fn request_token(&self) -> Result<Token, AuthError> {
        let token = self
            .oauth_client
            .exchange_client_credentials()
            .add_extra_param("audience", self.audience.clone())
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::Failed(e.to_string()))?;

        Ok(Token {
            access_token: token.access_token().secret().clone(),
            expires_in: token
                .expires_in()
                .map(|expires_in| expires_in.as_secs() as i64)
                .unwrap_or(DEFAULT_EXPIRES_IN),
        })
    }
}
