//! Parsers from decoded response bodies into typed records.
//!
//! Parsers are pure. Zone attachment is response scoped, so the resolved zone
//! is passed down explicitly to every field that needs it. A body that does
//! not match its expected shape fails as a whole.
//!
//! Records are read through small `Value` accessors rather than
//! `#[derive(Deserialize)]` so failures map onto [`ParseError`] variants and
//! each instant can take the zone of the response it came from.

use crate::ParseError;
use crate::enums::{
    MeasureCategory, MeasureGroupAttrib, MeasureType, SleepModel, SleepState,
    SubscriptionParameter,
};
use crate::models::{
    ActivityEntry, Device, GetActivityResponse, GetDeviceResponse, GetMeasResponse,
    GetSleepResponse, GetSleepSummaryResponse, ListSubscriptionsResponse, Measure, MeasureGroup,
    SleepSample, SleepSerie, SleepSummaryData, SleepSummarySerie, SleepTimeSeries,
    SubscriptionDetail, SubscriptionProfile,
};
use crate::utils::{epoch_in, midnight_in, parse_ymd, parse_zone};
use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

const TIMESTAMP_MARKER: &str = "$timestamp";

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Object, ParseError> {
    value.as_object().ok_or_else(|| ParseError::InvalidType {
        field: field.to_string(),
        expected: "object",
    })
}

/// A present, non-null value. Null counts as missing.
fn required<'a>(obj: &'a Object, key: &str) -> Result<&'a Value, ParseError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ParseError::MissingField(key.to_string())),
        Some(v) => Ok(v),
    }
}

fn optional<'a>(obj: &'a Object, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn invalid(key: &str, expected: &'static str) -> ParseError {
    ParseError::InvalidType {
        field: key.to_string(),
        expected,
    }
}

fn to_i64(value: &Value, key: &str) -> Result<i64, ParseError> {
    value.as_i64().ok_or_else(|| invalid(key, "integer"))
}

fn to_f64(value: &Value, key: &str) -> Result<f64, ParseError> {
    value.as_f64().ok_or_else(|| invalid(key, "number"))
}

fn req_i64(obj: &Object, key: &str) -> Result<i64, ParseError> {
    to_i64(required(obj, key)?, key)
}

fn opt_i64(obj: &Object, key: &str) -> Result<Option<i64>, ParseError> {
    optional(obj, key).map(|v| to_i64(v, key)).transpose()
}

fn opt_f64(obj: &Object, key: &str) -> Result<Option<f64>, ParseError> {
    optional(obj, key).map(|v| to_f64(v, key)).transpose()
}

fn req_str<'a>(obj: &'a Object, key: &str) -> Result<&'a str, ParseError> {
    required(obj, key)?
        .as_str()
        .ok_or_else(|| invalid(key, "string"))
}

/// Identifiers the vendor sends either as strings or as numbers.
fn string_or_number(value: &Value, key: &str) -> Result<String, ParseError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(key, "string or number")),
    }
}

fn opt_string_or_number(obj: &Object, key: &str) -> Result<Option<String>, ParseError> {
    optional(obj, key)
        .map(|v| string_or_number(v, key))
        .transpose()
}

/// Booleans arrive as JSON booleans or as 0/1.
fn req_bool(obj: &Object, key: &str) -> Result<bool, ParseError> {
    match required(obj, key)? {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid(key, "boolean")),
        },
        _ => Err(invalid(key, "boolean")),
    }
}

fn req_array<'a>(obj: &'a Object, key: &str) -> Result<&'a [Value], ParseError> {
    required(obj, key)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(key, "array"))
}

fn req_code<T>(
    obj: &Object,
    key: &str,
    decode: fn(i64) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    decode(req_i64(obj, key)?)
}

fn req_zone(obj: &Object, key: &str) -> Result<Tz, ParseError> {
    let name = req_str(obj, key)?;
    parse_zone(name).ok_or_else(|| ParseError::UnknownTimezone(name.to_string()))
}

fn epoch_value(value: &Value, key: &str, tz: Tz) -> Result<DateTime<Tz>, ParseError> {
    let secs = to_i64(value, key)?;
    epoch_in(secs, tz).ok_or_else(|| ParseError::InvalidTimestamp {
        field: key.to_string(),
        value: secs.to_string(),
    })
}

fn req_epoch(obj: &Object, key: &str, tz: Tz) -> Result<DateTime<Tz>, ParseError> {
    epoch_value(required(obj, key)?, key, tz)
}

fn opt_epoch(obj: &Object, key: &str, tz: Tz) -> Result<Option<DateTime<Tz>>, ParseError> {
    optional(obj, key)
        .map(|v| epoch_value(v, key, tz))
        .transpose()
}

fn ymd_value(value: &str, key: &str, tz: Tz) -> Result<DateTime<Tz>, ParseError> {
    parse_ymd(value)
        .and_then(|d| midnight_in(d, tz))
        .ok_or_else(|| ParseError::InvalidDate {
            field: key.to_string(),
            value: value.to_string(),
        })
}

fn req_ymd(obj: &Object, key: &str, tz: Tz) -> Result<DateTime<Tz>, ParseError> {
    ymd_value(req_str(obj, key)?, key, tz)
}

/// Either a `YYYY-MM-DD` string or an epoch.
fn req_date_or_epoch(obj: &Object, key: &str, tz: Tz) -> Result<DateTime<Tz>, ParseError> {
    match required(obj, key)? {
        Value::String(s) => ymd_value(s, key, tz),
        other => epoch_value(other, key, tz),
    }
}

fn parse_list<T>(
    values: &[Value],
    field: &str,
    mut item: impl FnMut(&Object) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    values
        .iter()
        .map(|v| as_object(v, field).and_then(&mut item))
        .collect()
}

// === Activity ===

pub fn parse_get_activity(body: &Value) -> Result<GetActivityResponse, ParseError> {
    let obj = as_object(body, "body")?;
    Ok(GetActivityResponse {
        activities: parse_list(req_array(obj, "activities")?, "activities", parse_activity)?,
        more: req_bool(obj, "more")?,
        offset: req_i64(obj, "offset")?,
    })
}

fn parse_activity(obj: &Object) -> Result<ActivityEntry, ParseError> {
    let tz = req_zone(obj, "timezone")?;
    Ok(ActivityEntry {
        date: req_ymd(obj, "date", tz)?,
        timezone: tz,
        is_tracker: req_bool(obj, "is_tracker")?,
        deviceid: opt_string_or_number(obj, "deviceid")?,
        brand: req_i64(obj, "brand")?,
        steps: opt_i64(obj, "steps")?,
        distance: opt_f64(obj, "distance")?,
        elevation: opt_f64(obj, "elevation")?,
        soft: opt_i64(obj, "soft")?,
        moderate: opt_i64(obj, "moderate")?,
        intense: opt_i64(obj, "intense")?,
        active: opt_i64(obj, "active")?,
        calories: opt_f64(obj, "calories")?,
        totalcalories: opt_f64(obj, "totalcalories")?,
        hr_average: opt_i64(obj, "hr_average")?,
        hr_min: opt_i64(obj, "hr_min")?,
        hr_max: opt_i64(obj, "hr_max")?,
        hr_zone_0: opt_i64(obj, "hr_zone_0")?,
        hr_zone_1: opt_i64(obj, "hr_zone_1")?,
        hr_zone_2: opt_i64(obj, "hr_zone_2")?,
        hr_zone_3: opt_i64(obj, "hr_zone_3")?,
    })
}

// === Measures ===

pub fn parse_get_meas(body: &Value) -> Result<GetMeasResponse, ParseError> {
    let obj = as_object(body, "body")?;
    let tz = req_zone(obj, "timezone")?;
    Ok(GetMeasResponse {
        updatetime: req_epoch(obj, "updatetime", tz)?,
        timezone: tz,
        more: req_bool(obj, "more")?,
        offset: req_i64(obj, "offset")?,
        measure_groups: parse_list(req_array(obj, "measuregrps")?, "measuregrps", |g| {
            parse_measure_group(g, tz)
        })?,
    })
}

fn parse_measure_group(obj: &Object, tz: Tz) -> Result<MeasureGroup, ParseError> {
    Ok(MeasureGroup {
        grpid: string_or_number(required(obj, "grpid")?, "grpid")?,
        attrib: req_code(obj, "attrib", MeasureGroupAttrib::from_code)?,
        date: req_date_or_epoch(obj, "date", tz)?,
        created: req_epoch(obj, "created", tz)?,
        category: req_code(obj, "category", MeasureCategory::from_code)?,
        deviceid: opt_string_or_number(obj, "deviceid")?,
        measures: parse_list(req_array(obj, "measures")?, "measures", parse_measure)?,
    })
}

fn parse_measure(obj: &Object) -> Result<Measure, ParseError> {
    let unit = req_i64(obj, "unit")?;
    Ok(Measure {
        measure_type: req_code(obj, "type", MeasureType::from_code)?,
        value: req_i64(obj, "value")?,
        unit: i32::try_from(unit).map_err(|_| invalid("unit", "32-bit integer"))?,
    })
}

// === Sleep ===

pub fn parse_get_sleep(body: &Value) -> Result<GetSleepResponse, ParseError> {
    let obj = as_object(body, "body")?;
    let tz = chrono_tz::UTC;
    Ok(GetSleepResponse {
        model: req_code(obj, "model", SleepModel::from_code)?,
        series: parse_list(req_array(obj, "series")?, "series", |s| {
            parse_sleep_serie(s, tz)
        })?,
    })
}

fn parse_sleep_serie(obj: &Object, tz: Tz) -> Result<SleepSerie, ParseError> {
    Ok(SleepSerie {
        startdate: req_epoch(obj, "startdate", tz)?,
        enddate: req_epoch(obj, "enddate", tz)?,
        state: req_code(obj, "state", SleepState::from_code)?,
        hr: optional(obj, "hr")
            .map(|v| parse_time_series(v, "hr", tz))
            .transpose()?,
        rr: optional(obj, "rr")
            .map(|v| parse_time_series(v, "rr", tz))
            .transpose()?,
    })
}

/// `{"<epoch>": value, ...}`, kept in the order the keys were sent.
///
/// A `{"$timestamp": <epoch>}` entry marks a single instant with no reading.
fn parse_time_series(value: &Value, field: &str, tz: Tz) -> Result<SleepTimeSeries, ParseError> {
    let obj = as_object(value, field)?;
    let samples = obj
        .iter()
        .map(|(key, v)| {
            let (secs, reading) = if key == TIMESTAMP_MARKER {
                (to_i64(v, field)?, None)
            } else {
                let secs: i64 = key.parse().map_err(|_| ParseError::InvalidTimestamp {
                    field: field.to_string(),
                    value: key.clone(),
                })?;
                (secs, Some(to_i64(v, field)?))
            };
            let timestamp = epoch_in(secs, tz).ok_or_else(|| ParseError::InvalidTimestamp {
                field: field.to_string(),
                value: secs.to_string(),
            })?;
            Ok(SleepSample {
                timestamp,
                value: reading,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;
    Ok(SleepTimeSeries(samples))
}

pub fn parse_get_sleep_summary(body: &Value) -> Result<GetSleepSummaryResponse, ParseError> {
    let obj = as_object(body, "body")?;
    Ok(GetSleepSummaryResponse {
        more: req_bool(obj, "more")?,
        offset: req_i64(obj, "offset")?,
        series: parse_list(req_array(obj, "series")?, "series", parse_sleep_summary_serie)?,
    })
}

fn parse_sleep_summary_serie(obj: &Object) -> Result<SleepSummarySerie, ParseError> {
    let tz = req_zone(obj, "timezone")?;
    Ok(SleepSummarySerie {
        id: opt_i64(obj, "id")?,
        timezone: tz,
        model: req_code(obj, "model", SleepModel::from_code)?,
        date: req_ymd(obj, "date", tz)?,
        startdate: req_epoch(obj, "startdate", tz)?,
        enddate: req_epoch(obj, "enddate", tz)?,
        modified: req_epoch(obj, "modified", tz)?,
        data: parse_sleep_summary_data(as_object(required(obj, "data")?, "data")?)?,
    })
}

fn parse_sleep_summary_data(obj: &Object) -> Result<SleepSummaryData, ParseError> {
    Ok(SleepSummaryData {
        deepsleepduration: opt_i64(obj, "deepsleepduration")?,
        durationtosleep: opt_i64(obj, "durationtosleep")?,
        durationtowakeup: opt_i64(obj, "durationtowakeup")?,
        lightsleepduration: opt_i64(obj, "lightsleepduration")?,
        wakeupcount: opt_i64(obj, "wakeupcount")?,
        wakeupduration: opt_i64(obj, "wakeupduration")?,
        remsleepduration: opt_i64(obj, "remsleepduration")?,
        hr_average: opt_i64(obj, "hr_average")?,
        hr_min: opt_i64(obj, "hr_min")?,
        hr_max: opt_i64(obj, "hr_max")?,
        rr_average: opt_i64(obj, "rr_average")?,
        rr_min: opt_i64(obj, "rr_min")?,
        rr_max: opt_i64(obj, "rr_max")?,
    })
}

// === Devices ===

pub fn parse_get_device(body: &Value) -> Result<GetDeviceResponse, ParseError> {
    let obj = as_object(body, "body")?;
    Ok(GetDeviceResponse {
        devices: parse_list(req_array(obj, "devices")?, "devices", parse_device)?,
    })
}

fn parse_device(obj: &Object) -> Result<Device, ParseError> {
    let tz = req_zone(obj, "timezone")?;
    Ok(Device {
        device_type: req_str(obj, "type")?.to_string(),
        model: req_str(obj, "model")?.to_string(),
        model_id: opt_i64(obj, "model_id")?,
        battery: opt_string_or_number(obj, "battery")?,
        deviceid: string_or_number(required(obj, "deviceid")?, "deviceid")?,
        timezone: tz,
        last_session_date: opt_epoch(obj, "last_session_date", tz)?,
    })
}

// === Subscriptions ===

pub fn parse_list_subscriptions(body: &Value) -> Result<ListSubscriptionsResponse, ParseError> {
    let obj = as_object(body, "body")?;
    Ok(ListSubscriptionsResponse {
        profiles: parse_list(req_array(obj, "profiles")?, "profiles", parse_profile)?,
    })
}

fn parse_profile(obj: &Object) -> Result<SubscriptionProfile, ParseError> {
    Ok(SubscriptionProfile {
        appli: req_code(obj, "appli", SubscriptionParameter::from_code)?,
        callbackurl: req_str(obj, "callbackurl")?.to_string(),
        comment: req_str(obj, "comment")?.to_string(),
        expires: req_date_or_epoch(obj, "expires", chrono_tz::UTC)?,
    })
}

pub fn parse_get_subscription(body: &Value) -> Result<SubscriptionDetail, ParseError> {
    let obj = as_object(body, "body")?;
    Ok(SubscriptionDetail {
        appli: req_code(obj, "appli", SubscriptionParameter::from_code)?,
        callbackurl: req_str(obj, "callbackurl")?.to_string(),
        comment: req_str(obj, "comment")?.to_string(),
    })
}
