//! Parsing of the notifications the vendor POSTs to a subscribed callback URL.
//!
//! The body is `application/x-www-form-urlencoded`, for example
//! `userid=123&appli=1&startdate=1530576000&enddate=1530698753`.

use crate::ParseError;
use crate::enums::SubscriptionParameter;
use crate::params::DateParam;
use crate::utils::{epoch_in, parse_ymd};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub user_id: String,
    pub appli: SubscriptionParameter,
    pub startdate: Option<DateTime<Tz>>,
    pub enddate: Option<DateTime<Tz>>,
    /// Set instead of the range for day-scoped data such as activity.
    pub date: Option<NaiveDate>,
}

impl Notification {
    pub fn from_form(body: &str) -> Result<Self, ParseError> {
        let fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        let get = |key: &str| fields.get(key).map(String::as_str).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ParseError::MissingField(key.into()));

        let appli_raw = required("appli")?;
        let appli_code: i64 = appli_raw.parse().map_err(|_| ParseError::InvalidType {
            field: "appli".into(),
            expected: "integer",
        })?;

        let epoch = |key: &str| -> Result<Option<DateTime<Tz>>, ParseError> {
            get(key)
                .map(|raw| {
                    raw.parse::<i64>()
                        .ok()
                        .and_then(|secs| epoch_in(secs, chrono_tz::UTC))
                        .ok_or_else(|| ParseError::InvalidTimestamp {
                            field: key.into(),
                            value: raw.into(),
                        })
                })
                .transpose()
        };

        let date = get("date")
            .map(|raw| {
                parse_ymd(raw).ok_or_else(|| ParseError::InvalidDate {
                    field: "date".into(),
                    value: raw.into(),
                })
            })
            .transpose()?;

        Ok(Self {
            user_id: required("userid")?.to_string(),
            appli: SubscriptionParameter::from_code(appli_code)?,
            startdate: epoch("startdate")?,
            enddate: epoch("enddate")?,
            date,
        })
    }

    /// Bounds to pass back as `startdate`/`enddate` when fetching the changed data.
    pub fn range(&self) -> Option<(DateParam, DateParam)> {
        match (self.startdate, self.enddate, self.date) {
            (Some(start), Some(end), _) => Some((start.into(), end.into())),
            (_, _, Some(day)) => Some((day.into(), day.into())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_notification() {
        let n = Notification::from_form("userid=123&appli=1&startdate=1530576000&enddate=1530698753")
            .unwrap();
        assert_eq!(n.user_id, "123");
        assert_eq!(n.appli, SubscriptionParameter::Weight);
        assert_eq!(n.startdate.unwrap().timestamp(), 1530576000);
        assert_eq!(n.enddate.unwrap().timestamp(), 1530698753);
        assert_eq!(n.date, None);
        let (start, end) = n.range().unwrap();
        assert_eq!(start, DateParam::Instant(n.startdate.unwrap().fixed_offset()));
        assert_eq!(end, DateParam::Instant(n.enddate.unwrap().fixed_offset()));
    }

    #[test]
    fn parses_day_notification() {
        let n = Notification::from_form("userid=9&appli=16&date=2019-01-02").unwrap();
        assert_eq!(n.appli, SubscriptionParameter::Activity);
        assert_eq!(n.date, NaiveDate::from_ymd_opt(2019, 1, 2));
        assert!(n.startdate.is_none());
        let day = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        assert_eq!(n.range(), Some((DateParam::Date(day), DateParam::Date(day))));
    }

    #[test]
    fn rejects_missing_or_unknown_fields() {
        assert_eq!(
            Notification::from_form("appli=1").unwrap_err(),
            ParseError::MissingField("userid".into())
        );
        assert!(matches!(
            Notification::from_form("userid=1&appli=3").unwrap_err(),
            ParseError::UnknownCode { kind: "SubscriptionParameter", .. }
        ));
        assert!(matches!(
            Notification::from_form("userid=1&appli=1&startdate=soon").unwrap_err(),
            ParseError::InvalidTimestamp { .. }
        ));
    }
}
