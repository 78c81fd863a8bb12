use crate::WithingsError;
use crate::auth::{DEFAULT_ACCOUNT_BASE_URL, WithingsAuth};
use crate::enums::AuthScope;
use crate::http_client::DEFAULT_API_BASE_URL;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    pub consumer_secret: SecretString,
    pub callback_uri: String,
    pub api_base_url: String,
    pub account_base_url: String,
    pub scopes: Vec<AuthScope>,
    pub demo_mode: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, WithingsError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, WithingsError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let client_id = get("WITHINGS_CLIENT_ID")
            .ok_or_else(|| WithingsError::Config("WITHINGS_CLIENT_ID missing".into()))?;
        let secret = get("WITHINGS_CONSUMER_SECRET")
            .ok_or_else(|| WithingsError::Config("WITHINGS_CONSUMER_SECRET missing".into()))?;
        let callback_uri = get("WITHINGS_CALLBACK_URI")
            .ok_or_else(|| WithingsError::Config("WITHINGS_CALLBACK_URI missing".into()))?;
        let api_base_url =
            get("WITHINGS_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let account_base_url =
            get("WITHINGS_ACCOUNT_BASE_URL").unwrap_or_else(|| DEFAULT_ACCOUNT_BASE_URL.into());
        let scopes = match get("WITHINGS_SCOPES") {
            Some(raw) => parse_scopes(&raw)?,
            None => vec![AuthScope::UserMetrics],
        };
        let demo_mode = match get("WITHINGS_DEMO_MODE").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(WithingsError::Config(format!(
                    "WITHINGS_DEMO_MODE must be true or false, got {other:?}"
                )));
            }
        };
        Ok(Self {
            client_id,
            consumer_secret: SecretString::new(secret.into()),
            callback_uri,
            api_base_url,
            account_base_url,
            scopes,
            demo_mode,
        })
    }

    /// Authorization helper configured from these values.
    pub fn auth(&self) -> WithingsAuth {
        WithingsAuth::new(
            self.client_id.clone(),
            self.consumer_secret.clone(),
            self.callback_uri.clone(),
        )
        .with_scopes(self.scopes.clone())
        .with_demo_mode(self.demo_mode)
        .with_account_base_url(&self.account_base_url)
    }
}

fn parse_scopes(raw: &str) -> Result<Vec<AuthScope>, WithingsError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<AuthScope>()
                .map_err(|e| WithingsError::Config(format!("WITHINGS_SCOPES: {e}")))
        })
        .collect()
}
