//! Optional request parameters for the data endpoints.
//!
//! Every field defaults to `None`; unset fields are left out of the request
//! so the server applies its own defaults.

use crate::enums::{ActivityField, MeasureCategory, MeasureType, SleepField, SleepSummaryField};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

/// A point in time given as an instant, an epoch, a calendar date or text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateParam {
    Instant(DateTime<FixedOffset>),
    Epoch(i64),
    Date(NaiveDate),
    /// Passed through unchanged for `*ymd` parameters, otherwise read as `YYYY-MM-DD`.
    Text(String),
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateParam {
    fn from(dt: DateTime<Tz>) -> Self {
        DateParam::Instant(dt.fixed_offset())
    }
}

impl From<i64> for DateParam {
    fn from(secs: i64) -> Self {
        DateParam::Epoch(secs)
    }
}

impl From<NaiveDate> for DateParam {
    fn from(date: NaiveDate) -> Self {
        DateParam::Date(date)
    }
}

impl From<&str> for DateParam {
    fn from(s: &str) -> Self {
        DateParam::Text(s.to_string())
    }
}

impl From<String> for DateParam {
    fn from(s: String) -> Self {
        DateParam::Text(s)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetActivityParams {
    pub startdateymd: Option<DateParam>,
    pub enddateymd: Option<DateParam>,
    pub offset: Option<i64>,
    pub data_fields: Option<Vec<ActivityField>>,
    pub lastupdate: Option<DateParam>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetMeasParams {
    pub meastype: Option<MeasureType>,
    pub category: Option<MeasureCategory>,
    pub startdate: Option<DateParam>,
    pub enddate: Option<DateParam>,
    pub offset: Option<i64>,
    pub lastupdate: Option<DateParam>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetSleepParams {
    pub startdate: Option<DateParam>,
    pub enddate: Option<DateParam>,
    pub data_fields: Option<Vec<SleepField>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetSleepSummaryParams {
    pub startdateymd: Option<DateParam>,
    pub enddateymd: Option<DateParam>,
    pub offset: Option<i64>,
    pub data_fields: Option<Vec<SleepSummaryField>>,
    pub lastupdate: Option<DateParam>,
}
