//! Records returned by the API and the OAuth2 credentials that authorize it.
//!
//! All time values are zoned instants. When a response names a zone the
//! instants carry it; otherwise they carry UTC.

use crate::enums::{
    MeasureCategory, MeasureGroupAttrib, MeasureType, SleepModel, SleepState,
    SubscriptionParameter,
};
use chrono::DateTime;
use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// OAuth2 credentials for one user. Replaced as a whole on refresh.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub access_token: SecretString,
    /// Absolute expiry as epoch seconds.
    pub token_expiry: i64,
    pub token_type: String,
    pub refresh_token: SecretString,
    pub user_id: String,
    pub client_id: String,
    pub consumer_secret: SecretString,
}

impl Credentials {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.token_expiry <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(crate::utils::now_epoch())
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.access_token.expose_secret() == other.access_token.expose_secret()
            && self.token_expiry == other.token_expiry
            && self.token_type == other.token_type
            && self.refresh_token.expose_secret() == other.refresh_token.expose_secret()
            && self.user_id == other.user_id
            && self.client_id == other.client_id
            && self.consumer_secret.expose_secret() == other.consumer_secret.expose_secret()
    }
}

impl Eq for Credentials {}

/// Body of a successful token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub refresh_token: String,
    #[serde(rename = "userid", deserialize_with = "deserialize_string_or_number")]
    pub user_id: String,
}

fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

// === Activity ===

#[derive(Clone, Debug, PartialEq)]
pub struct ActivityEntry {
    /// Midnight of the activity day in the entry's own zone.
    pub date: DateTime<Tz>,
    pub timezone: Tz,
    pub is_tracker: bool,
    pub deviceid: Option<String>,
    pub brand: i64,
    pub steps: Option<i64>,
    pub distance: Option<f64>,
    pub elevation: Option<f64>,
    pub soft: Option<i64>,
    pub moderate: Option<i64>,
    pub intense: Option<i64>,
    pub active: Option<i64>,
    pub calories: Option<f64>,
    pub totalcalories: Option<f64>,
    pub hr_average: Option<i64>,
    pub hr_min: Option<i64>,
    pub hr_max: Option<i64>,
    pub hr_zone_0: Option<i64>,
    pub hr_zone_1: Option<i64>,
    pub hr_zone_2: Option<i64>,
    pub hr_zone_3: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GetActivityResponse {
    pub activities: Vec<ActivityEntry>,
    pub more: bool,
    pub offset: i64,
}

// === Measures ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measure {
    pub measure_type: MeasureType,
    pub value: i64,
    /// Power of ten applied to `value`.
    pub unit: i32,
}

impl Measure {
    /// `value * 10^unit`.
    pub fn scaled_value(&self) -> f64 {
        let scale = 10f64.powf(f64::from(self.unit.unsigned_abs()));
        if self.unit >= 0 {
            self.value as f64 * scale
        } else {
            self.value as f64 / scale
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeasureGroup {
    pub grpid: String,
    pub attrib: MeasureGroupAttrib,
    pub date: DateTime<Tz>,
    pub created: DateTime<Tz>,
    pub category: MeasureCategory,
    pub deviceid: Option<String>,
    pub measures: Vec<Measure>,
}

impl MeasureGroup {
    /// Scaled value of the first measure of type `measure_type` in the group.
    pub fn value_of(&self, measure_type: MeasureType) -> Option<f64> {
        self.measures
            .iter()
            .find(|m| m.measure_type == measure_type)
            .map(Measure::scaled_value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GetMeasResponse {
    pub updatetime: DateTime<Tz>,
    pub timezone: Tz,
    pub more: bool,
    pub offset: i64,
    pub measure_groups: Vec<MeasureGroup>,
}

/// Client-side filter over the groups of a [`GetMeasResponse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasureGroupQuery {
    pub measure_type: Option<MeasureType>,
    pub category: Option<MeasureCategory>,
    /// Keep only groups whose attrib is listed.
    pub attribs: Option<Vec<MeasureGroupAttrib>>,
    pub exclude_ambiguous: bool,
}

impl MeasureGroupQuery {
    pub fn with_measure_type(mut self, measure_type: MeasureType) -> Self {
        self.measure_type = Some(measure_type);
        self
    }

    pub fn with_category(mut self, category: MeasureCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn unambiguous(mut self) -> Self {
        self.exclude_ambiguous = true;
        self
    }

    pub fn matches(&self, group: &MeasureGroup) -> bool {
        if self.exclude_ambiguous && group.attrib.is_ambiguous() {
            return false;
        }
        if self.category.is_some_and(|c| group.category != c) {
            return false;
        }
        if let Some(attribs) = &self.attribs {
            if !attribs.contains(&group.attrib) {
                return false;
            }
        }
        match self.measure_type {
            Some(t) => group.measures.iter().any(|m| m.measure_type == t),
            None => true,
        }
    }
}

impl GetMeasResponse {
    /// Groups matching `query`, in response order.
    pub fn query_groups(&self, query: &MeasureGroupQuery) -> Vec<&MeasureGroup> {
        self.measure_groups
            .iter()
            .filter(|g| query.matches(g))
            .collect()
    }
}

// === Sleep ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepSample {
    pub timestamp: DateTime<Tz>,
    /// `None` for a bare `$timestamp` marker.
    pub value: Option<i64>,
}

/// Per-second samples keyed by epoch, in response order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SleepTimeSeries(pub Vec<SleepSample>);

impl SleepTimeSeries {
    pub fn samples(&self) -> &[SleepSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SleepSerie {
    pub startdate: DateTime<Tz>,
    pub enddate: DateTime<Tz>,
    pub state: SleepState,
    pub hr: Option<SleepTimeSeries>,
    pub rr: Option<SleepTimeSeries>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetSleepResponse {
    pub model: SleepModel,
    pub series: Vec<SleepSerie>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SleepSummaryData {
    pub deepsleepduration: Option<i64>,
    pub durationtosleep: Option<i64>,
    pub durationtowakeup: Option<i64>,
    pub lightsleepduration: Option<i64>,
    pub wakeupcount: Option<i64>,
    pub wakeupduration: Option<i64>,
    pub remsleepduration: Option<i64>,
    pub hr_average: Option<i64>,
    pub hr_min: Option<i64>,
    pub hr_max: Option<i64>,
    pub rr_average: Option<i64>,
    pub rr_min: Option<i64>,
    pub rr_max: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SleepSummarySerie {
    pub id: Option<i64>,
    pub timezone: Tz,
    pub model: SleepModel,
    pub date: DateTime<Tz>,
    pub startdate: DateTime<Tz>,
    pub enddate: DateTime<Tz>,
    pub modified: DateTime<Tz>,
    pub data: SleepSummaryData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetSleepSummaryResponse {
    pub more: bool,
    pub offset: i64,
    pub series: Vec<SleepSummarySerie>,
}

// === Devices ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub device_type: String,
    pub model: String,
    pub model_id: Option<i64>,
    pub battery: Option<String>,
    pub deviceid: String,
    pub timezone: Tz,
    pub last_session_date: Option<DateTime<Tz>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetDeviceResponse {
    pub devices: Vec<Device>,
}

// === Subscriptions ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionProfile {
    pub appli: SubscriptionParameter,
    pub callbackurl: String,
    pub comment: String,
    pub expires: DateTime<Tz>,
}

/// Single subscription returned by `notify get`, which carries no expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionDetail {
    pub appli: SubscriptionParameter,
    pub callbackurl: String,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListSubscriptionsResponse {
    pub profiles: Vec<SubscriptionProfile>,
}

impl ListSubscriptionsResponse {
    pub fn contains_callback(&self, callback_url: &str) -> bool {
        self.profiles.iter().any(|p| p.callbackurl == callback_url)
    }
}
