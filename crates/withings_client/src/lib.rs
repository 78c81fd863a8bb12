//! Typed async client for the Withings health data API.
//!
//! The crate is split the way requests flow: [`auth`] performs the OAuth2
//! exchanges, [`query`] turns typed parameters into query pairs,
//! [`http_client`] issues the calls and unwraps the `{status, body}` envelope,
//! and [`parse`] maps the body into the records in [`models`].

use async_trait::async_trait;
use thiserror::Error;

pub mod auth;
pub mod config;
pub mod enums;
pub mod http_client;
pub mod models;
pub mod notify;
pub mod observability;
pub mod params;
pub mod parse;
pub mod query;
pub mod utils;

pub use enums::{
    ActivityField, AuthScope, MeasureCategory, MeasureGroupAttrib, MeasureType, SleepField,
    SleepModel, SleepState, SleepSummaryField, SubscriptionParameter,
};
pub use models::{
    ActivityEntry, Credentials, Device, GetActivityResponse, GetDeviceResponse, GetMeasResponse,
    GetSleepResponse, GetSleepSummaryResponse, ListSubscriptionsResponse, Measure, MeasureGroup,
    MeasureGroupQuery, SleepSample, SleepSerie, SleepSummaryData, SleepSummarySerie,
    SleepTimeSeries, SubscriptionDetail, SubscriptionProfile,
};
pub use params::{
    DateParam, GetActivityParams, GetMeasParams, GetSleepParams, GetSleepSummaryParams,
};

#[derive(Debug, Error)]
pub enum WithingsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The envelope carried a non-zero `status`. The body is never inspected.
    #[error("api returned status {0}")]
    ApiStatus(i64),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("token refresh failed: {0}")]
    Refresh(#[source] Box<WithingsError>),
    #[error("authorization error: {0}")]
    Auth(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl WithingsError {
    /// Vendor status code when the failure came from the response envelope.
    pub fn api_status(&self) -> Option<i64> {
        match self {
            WithingsError::ApiStatus(status) => Some(*status),
            WithingsError::Refresh(inner) => inner.api_status(),
            _ => None,
        }
    }
}

/// A response body that did not match the expected shape.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("field `{field}` is not a valid {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },
    #[error("unknown {kind} code `{code}`")]
    UnknownCode { kind: &'static str, code: String },
    #[error("field `{field}` holds an out of range timestamp: {value}")]
    InvalidTimestamp { field: String, value: String },
    #[error("field `{field}` holds an invalid date: {value}")]
    InvalidDate { field: String, value: String },
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
}

#[async_trait]
pub trait WithingsClient: Send + Sync + 'static {
    /// Snapshot of the credentials currently held by the client.
    async fn credentials(&self) -> Credentials;

    async fn get_activity(
        &self,
        params: GetActivityParams,
    ) -> Result<GetActivityResponse, WithingsError>;

    async fn get_meas(&self, params: GetMeasParams) -> Result<GetMeasResponse, WithingsError>;

    async fn get_sleep(&self, params: GetSleepParams) -> Result<GetSleepResponse, WithingsError>;

    async fn get_sleep_summary(
        &self,
        params: GetSleepSummaryParams,
    ) -> Result<GetSleepSummaryResponse, WithingsError>;

    /// List the devices linked to the user account.
    async fn get_devices(&self) -> Result<GetDeviceResponse, WithingsError>;

    // === Notifications ===

    async fn subscribe(
        &self,
        callback_url: &str,
        comment: &str,
        appli: SubscriptionParameter,
    ) -> Result<(), WithingsError>;

    async fn unsubscribe(
        &self,
        callback_url: &str,
        appli: SubscriptionParameter,
    ) -> Result<(), WithingsError>;

    async fn get_subscription(
        &self,
        callback_url: &str,
        appli: SubscriptionParameter,
    ) -> Result<SubscriptionDetail, WithingsError>;

    async fn list_subscriptions(
        &self,
        appli: Option<SubscriptionParameter>,
    ) -> Result<ListSubscriptionsResponse, WithingsError>;

    /// Whether `callback_url` appears in the subscription list (exact match).
    async fn is_subscribed(
        &self,
        callback_url: &str,
        appli: Option<SubscriptionParameter>,
    ) -> Result<bool, WithingsError> {
        let listed = self.list_subscriptions(appli).await?;
        Ok(listed.contains_callback(callback_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_reaches_through_refresh() {
        let err = WithingsError::Refresh(Box::new(WithingsError::ApiStatus(401)));
        assert_eq!(err.api_status(), Some(401));
        assert_eq!(WithingsError::Config("x".into()).api_status(), None);
    }

    #[test]
    fn parse_error_converts_into_withings_error() {
        let err: WithingsError = ParseError::MissingField("date".into()).into();
        assert!(matches!(err, WithingsError::Parse(ParseError::MissingField(ref f)) if f == "date"));
        assert_eq!(err.to_string(), "parse error: missing field `date`");
    }
}
