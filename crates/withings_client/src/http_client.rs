//! HTTP client implementation for the Withings API.
//!
//! This module provides a reqwest-based implementation of the [`WithingsClient`](crate::WithingsClient) trait.

use crate::auth::{self, DEFAULT_ACCOUNT_BASE_URL};
use crate::enums::SubscriptionParameter;
use crate::models::{
    Credentials, GetActivityResponse, GetDeviceResponse, GetMeasResponse, GetSleepResponse,
    GetSleepSummaryResponse, ListSubscriptionsResponse, SubscriptionDetail,
};
use crate::params::{GetActivityParams, GetMeasParams, GetSleepParams, GetSleepSummaryParams};
use crate::query::{QueryPairs, ToQuery};
use crate::{WithingsClient, WithingsError, observability, parse, utils};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "https://wbsapi.withings.net";

const MEASURE_PATH: &str = "/measure";
const MEASURE_V2_PATH: &str = "/v2/measure";
const SLEEP_V2_PATH: &str = "/v2/sleep";
const USER_V2_PATH: &str = "/v2/user";
const NOTIFY_PATH: &str = "/notify";

/// Called with the new credentials after every successful refresh.
pub type RefreshCallback = Arc<dyn Fn(&Credentials) + Send + Sync>;

/// The `{status, body}` wrapper around every API response.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: i64,
    #[serde(default)]
    body: serde_json::Value,
}

impl Envelope {
    /// The body of a successful response. A non-zero status fails before the
    /// body is looked at.
    fn into_body(self) -> Result<serde_json::Value, WithingsError> {
        if self.status != 0 {
            observability::record_api_status(self.status);
            return Err(WithingsError::ApiStatus(self.status));
        }
        Ok(match self.body {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            body => body,
        })
    }
}

/// Client for the Withings API using reqwest.
///
/// Clones share the same credentials slot.
#[derive(Clone)]
pub struct ReqwestWithingsClient {
    base_url: String,
    token_url: String,
    credentials: Arc<Mutex<Credentials>>,
    on_refresh: Option<RefreshCallback>,
    client: reqwest::Client,
}

impl fmt::Debug for ReqwestWithingsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestWithingsClient")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("on_refresh", &self.on_refresh.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestWithingsClient {
    /// Create a client against the production endpoints.
    pub fn new(credentials: Credentials) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: auth::token_url(DEFAULT_ACCOUNT_BASE_URL),
            credentials: Arc::new(Mutex::new(credentials)),
            on_refresh: None,
            client,
        }
    }

    /// Override the data API base URL (e.g. "https://wbsapi.withings.net").
    pub fn with_api_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the account base URL used for token refreshes.
    pub fn with_account_base_url(mut self, account_base_url: &str) -> Self {
        self.token_url = auth::token_url(account_base_url);
        self
    }

    /// Register a callback invoked with the new credentials after each refresh.
    ///
    /// The credentials slot is unlocked while it runs.
    pub fn with_refresh_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Credentials) + Send + Sync + 'static,
    {
        self.on_refresh = Some(Arc::new(callback));
        self
    }

    /// Access token to use for the next call, refreshing it first if expired.
    ///
    /// The lock is held through the refresh so concurrent callers wait for the
    /// new token instead of refreshing twice. The callback runs after the lock
    /// is released.
    async fn access_token(&self) -> Result<SecretString, WithingsError> {
        let mut creds = self.credentials.lock().await;
        if !creds.is_expired_at(utils::now_epoch()) {
            return Ok(creds.access_token.clone());
        }
        info!(user_id = %creds.user_id, "withings access token expired, refreshing");
        let refreshed = auth::refresh_credentials(&self.client, &self.token_url, &creds)
            .await
            .map_err(|e| WithingsError::Refresh(Box::new(e)))?;
        *creds = refreshed.clone();
        drop(creds);
        observability::record_token_refresh();
        if let Some(callback) = &self.on_refresh {
            callback(&refreshed);
        }
        Ok(refreshed.access_token)
    }

    /// Issue one authenticated call and unwrap its envelope.
    async fn call(
        &self,
        path: &str,
        action: &'static str,
        params: QueryPairs,
    ) -> Result<serde_json::Value, WithingsError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.base_url, path);

        let mut query: QueryPairs = Vec::with_capacity(params.len() + 1);
        query.push(("action".to_string(), action.to_string()));
        query.extend(params);

        debug!(action, path, "withings request");
        observability::record_request(action);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope = resp.json().await?;
        envelope.into_body()
    }
}

#[async_trait]
impl WithingsClient for ReqwestWithingsClient {
    async fn credentials(&self) -> Credentials {
        self.credentials.lock().await.clone()
    }

    async fn get_activity(
        &self,
        params: GetActivityParams,
    ) -> Result<GetActivityResponse, WithingsError> {
        let body = self
            .call(MEASURE_V2_PATH, "getactivity", params.to_query()?)
            .await?;
        Ok(parse::parse_get_activity(&body)?)
    }

    async fn get_meas(&self, params: GetMeasParams) -> Result<GetMeasResponse, WithingsError> {
        let body = self.call(MEASURE_PATH, "getmeas", params.to_query()?).await?;
        Ok(parse::parse_get_meas(&body)?)
    }

    async fn get_sleep(&self, params: GetSleepParams) -> Result<GetSleepResponse, WithingsError> {
        let body = self.call(SLEEP_V2_PATH, "get", params.to_query()?).await?;
        Ok(parse::parse_get_sleep(&body)?)
    }

    async fn get_sleep_summary(
        &self,
        params: GetSleepSummaryParams,
    ) -> Result<GetSleepSummaryResponse, WithingsError> {
        let body = self
            .call(SLEEP_V2_PATH, "getsummary", params.to_query()?)
            .await?;
        Ok(parse::parse_get_sleep_summary(&body)?)
    }

    async fn get_devices(&self) -> Result<GetDeviceResponse, WithingsError> {
        let body = self.call(USER_V2_PATH, "getdevice", Vec::new()).await?;
        Ok(parse::parse_get_device(&body)?)
    }

    async fn subscribe(
        &self,
        callback_url: &str,
        comment: &str,
        appli: SubscriptionParameter,
    ) -> Result<(), WithingsError> {
        let pairs = vec![
            ("callbackurl".to_string(), callback_url.to_string()),
            ("comment".to_string(), comment.to_string()),
            ("appli".to_string(), appli.code().to_string()),
        ];
        self.call(NOTIFY_PATH, "subscribe", pairs).await?;
        Ok(())
    }

    async fn unsubscribe(
        &self,
        callback_url: &str,
        appli: SubscriptionParameter,
    ) -> Result<(), WithingsError> {
        let pairs = vec![
            ("callbackurl".to_string(), callback_url.to_string()),
            ("appli".to_string(), appli.code().to_string()),
        ];
        self.call(NOTIFY_PATH, "revoke", pairs).await?;
        Ok(())
    }

    async fn get_subscription(
        &self,
        callback_url: &str,
        appli: SubscriptionParameter,
    ) -> Result<SubscriptionDetail, WithingsError> {
        let pairs = vec![
            ("callbackurl".to_string(), callback_url.to_string()),
            ("appli".to_string(), appli.code().to_string()),
        ];
        let body = self.call(NOTIFY_PATH, "get", pairs).await?;
        Ok(parse::parse_get_subscription(&body)?)
    }

    async fn list_subscriptions(
        &self,
        appli: Option<SubscriptionParameter>,
    ) -> Result<ListSubscriptionsResponse, WithingsError> {
        let pairs = appli
            .map(|a| vec![("appli".to_string(), a.code().to_string())])
            .unwrap_or_default();
        let body = self.call(NOTIFY_PATH, "list", pairs).await?;
        Ok(parse::parse_list_subscriptions(&body)?)
    }
}
