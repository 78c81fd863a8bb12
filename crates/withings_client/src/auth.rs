//! OAuth2 authorization URL and token exchanges.

use crate::WithingsError;
use crate::enums::AuthScope;
use crate::models::{Credentials, TokenResponse};
use crate::utils::now_epoch;
use rand::distr::{Alphanumeric, Distribution};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

pub const DEFAULT_ACCOUNT_BASE_URL: &str = "https://account.withings.com";
const AUTHORIZE_PATH: &str = "/oauth2_user/authorize2";
const TOKEN_PATH: &str = "/oauth2/token";
const STATE_LEN: usize = 32;

pub fn token_url(account_base_url: &str) -> String {
    format!("{}{}", account_base_url.trim_end_matches('/'), TOKEN_PATH)
}

/// Starts the authorization-code flow and exchanges codes for [`Credentials`].
#[derive(Clone, Debug)]
pub struct WithingsAuth {
    client_id: String,
    consumer_secret: SecretString,
    callback_uri: String,
    scopes: Vec<AuthScope>,
    demo_mode: bool,
    account_base_url: String,
    client: reqwest::Client,
}

impl WithingsAuth {
    pub fn new(
        client_id: impl Into<String>,
        consumer_secret: SecretString,
        callback_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            consumer_secret,
            callback_uri: callback_uri.into(),
            scopes: vec![AuthScope::UserMetrics],
            demo_mode: false,
            account_base_url: DEFAULT_ACCOUNT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<AuthScope>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Ask the vendor to authorize against its demo account.
    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    pub fn with_account_base_url(mut self, url: &str) -> Self {
        self.account_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// URL the user visits to grant access.
    ///
    /// When `state` is `None` a random alphanumeric value is generated.
    pub fn authorize_url(&self, state: Option<&str>) -> Result<String, WithingsError> {
        let state = state.map_or_else(random_state, str::to_string);
        let scope = self
            .scopes
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.callback_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state.as_str()),
        ];
        if self.demo_mode {
            params.push(("mode", "demo"));
        }
        let base = format!("{}{}", self.account_base_url, AUTHORIZE_PATH);
        let url = url::Url::parse_with_params(&base, &params)
            .map_err(|e| WithingsError::Config(format!("invalid authorize url: {e}")))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for credentials.
    pub async fn get_credentials(&self, code: &str) -> Result<Credentials, WithingsError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.consumer_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", self.callback_uri.as_str()),
        ];
        let issued_at = now_epoch();
        let token = request_token(&self.client, &token_url(&self.account_base_url), &form).await?;
        info!(user_id = %token.user_id, "withings authorization code exchanged");
        credentials_from_token(token, issued_at, &self.client_id, &self.consumer_secret)
    }
}

fn random_state() -> String {
    Alphanumeric
        .sample_iter(rand::rng())
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// Build credentials from a token response received at `issued_at`.
///
/// Fails when `expires_in` pushes the expiry past the epoch range.
pub fn credentials_from_token(
    token: TokenResponse,
    issued_at: i64,
    client_id: &str,
    consumer_secret: &SecretString,
) -> Result<Credentials, WithingsError> {
    let token_expiry = issued_at.checked_add(token.expires_in).ok_or_else(|| {
        WithingsError::Auth(format!("token expires_in out of range: {}", token.expires_in))
    })?;
    Ok(Credentials {
        access_token: SecretString::new(token.access_token.into()),
        token_expiry,
        token_type: token.token_type,
        refresh_token: SecretString::new(token.refresh_token.into()),
        user_id: token.user_id,
        client_id: client_id.to_string(),
        consumer_secret: consumer_secret.clone(),
    })
}

/// Exchange the refresh token held in `current` for a new set of credentials.
pub async fn refresh_credentials(
    client: &reqwest::Client,
    token_url: &str,
    current: &Credentials,
) -> Result<Credentials, WithingsError> {
    let form = [
        ("grant_type", "refresh_token"),
        ("client_id", current.client_id.as_str()),
        ("client_secret", current.consumer_secret.expose_secret()),
        ("refresh_token", current.refresh_token.expose_secret()),
    ];
    let issued_at = now_epoch();
    let token = request_token(client, token_url, &form).await?;
    credentials_from_token(token, issued_at, &current.client_id, &current.consumer_secret)
}

async fn request_token(
    client: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, WithingsError> {
    debug!(token_url, "requesting withings token");
    let resp = client.post(token_url).form(form).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        return Err(WithingsError::Auth(format!(
            "token endpoint returned {status}: {body_snippet}"
        )));
    }
    Ok(resp.json::<TokenResponse>().await?)
}
