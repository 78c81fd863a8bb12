//! Serialization of typed parameters into query pairs.

use crate::WithingsError;
use crate::enums::WireField;
use crate::params::{
    DateParam, GetActivityParams, GetMeasParams, GetSleepParams, GetSleepSummaryParams,
};
use crate::utils::{date_to_epoch, parse_ymd};

pub type QueryPairs = Vec<(String, String)>;

/// Parameter sets that serialize into URL query pairs.
pub trait ToQuery {
    fn to_query(&self) -> Result<QueryPairs, WithingsError>;
}

/// Accumulates pairs, skipping every unset value.
#[derive(Debug, Default)]
struct QueryBuilder {
    pairs: QueryPairs,
}

impl QueryBuilder {
    fn number(&mut self, name: &str, value: Option<i64>) -> &mut Self {
        if let Some(v) = value {
            self.pairs.push((name.to_string(), v.to_string()));
        }
        self
    }

    fn code(&mut self, name: &str, code: Option<i64>) -> &mut Self {
        self.number(name, code)
    }

    fn fields<F: WireField>(&mut self, name: &str, fields: Option<&[F]>) -> &mut Self {
        if let Some(fields) = fields {
            let joined = fields
                .iter()
                .map(|f| f.wire_name())
                .collect::<Vec<_>>()
                .join(",");
            self.pairs.push((name.to_string(), joined));
        }
        self
    }

    fn date(&mut self, name: &str, value: Option<&DateParam>) -> Result<&mut Self, WithingsError> {
        if let Some(v) = value {
            let rendered = if name.ends_with("ymd") {
                render_ymd(v)?
            } else {
                render_epoch(name, v)?.to_string()
            };
            self.pairs.push((name.to_string(), rendered));
        }
        Ok(self)
    }

    fn finish(&mut self) -> QueryPairs {
        std::mem::take(&mut self.pairs)
    }
}

fn render_ymd(value: &DateParam) -> Result<String, WithingsError> {
    Ok(match value {
        DateParam::Instant(dt) => dt.format("%Y-%m-%d").to_string(),
        DateParam::Epoch(secs) => chrono::DateTime::from_timestamp(*secs, 0)
            .ok_or_else(|| WithingsError::InvalidInput(format!("epoch out of range: {secs}")))?
            .format("%Y-%m-%d")
            .to_string(),
        DateParam::Date(date) => date.format("%Y-%m-%d").to_string(),
        DateParam::Text(s) => s.clone(),
    })
}

fn render_epoch(name: &str, value: &DateParam) -> Result<i64, WithingsError> {
    match value {
        DateParam::Instant(dt) => Ok(dt.timestamp()),
        DateParam::Epoch(secs) => Ok(*secs),
        DateParam::Date(date) => date_to_epoch(*date)
            .ok_or_else(|| WithingsError::InvalidInput(format!("{name}: invalid date {date}"))),
        DateParam::Text(s) => parse_ymd(s)
            .and_then(date_to_epoch)
            .ok_or_else(|| WithingsError::InvalidInput(format!("{name}: invalid date {s:?}"))),
    }
}

impl ToQuery for GetActivityParams {
    fn to_query(&self) -> Result<QueryPairs, WithingsError> {
        let mut q = QueryBuilder::default();
        q.date("startdateymd", self.startdateymd.as_ref())?
            .date("enddateymd", self.enddateymd.as_ref())?
            .number("offset", self.offset)
            .fields("data_fields", self.data_fields.as_deref())
            .date("lastupdate", self.lastupdate.as_ref())?;
        Ok(q.finish())
    }
}

impl ToQuery for GetMeasParams {
    fn to_query(&self) -> Result<QueryPairs, WithingsError> {
        let mut q = QueryBuilder::default();
        q.code("meastype", self.meastype.map(|t| t.code()))
            .code("category", self.category.map(|c| c.code()))
            .date("startdate", self.startdate.as_ref())?
            .date("enddate", self.enddate.as_ref())?
            .number("offset", self.offset)
            .date("lastupdate", self.lastupdate.as_ref())?;
        Ok(q.finish())
    }
}

impl ToQuery for GetSleepParams {
    fn to_query(&self) -> Result<QueryPairs, WithingsError> {
        let mut q = QueryBuilder::default();
        q.date("startdate", self.startdate.as_ref())?
            .date("enddate", self.enddate.as_ref())?
            .fields("data_fields", self.data_fields.as_deref());
        Ok(q.finish())
    }
}

impl ToQuery for GetSleepSummaryParams {
    fn to_query(&self) -> Result<QueryPairs, WithingsError> {
        let mut q = QueryBuilder::default();
        q.date("startdateymd", self.startdateymd.as_ref())?
            .date("enddateymd", self.enddateymd.as_ref())?
            .number("offset", self.offset)
            .fields("data_fields", self.data_fields.as_deref())
            .date("lastupdate", self.lastupdate.as_ref())?;
        Ok(q.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ActivityField, MeasureCategory, MeasureType, SleepField, SleepSummaryField};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::collections::HashMap;

    fn as_map(pairs: QueryPairs) -> HashMap<String, String> {
        pairs.into_iter().collect()
    }

    fn utc_midnight(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn empty_params_emit_nothing() {
        assert!(GetActivityParams::default().to_query().unwrap().is_empty());
        assert!(GetMeasParams::default().to_query().unwrap().is_empty());
        assert!(GetSleepParams::default().to_query().unwrap().is_empty());
        assert!(GetSleepSummaryParams::default().to_query().unwrap().is_empty());
    }

    #[test]
    fn meas_params_encode_codes_and_epochs() {
        let params = GetMeasParams {
            meastype: Some(MeasureType::BoneMass),
            category: Some(MeasureCategory::UserObjectives),
            startdate: Some(utc_midnight(2019, 1, 1).into()),
            enddate: Some(100000000i64.into()),
            offset: Some(12),
            lastupdate: Some(NaiveDate::from_ymd_opt(2019, 1, 2).unwrap().into()),
        };
        let q = as_map(params.to_query().unwrap());
        assert_eq!(q.len(), 6);
        assert_eq!(q["meastype"], "88");
        assert_eq!(q["category"], "2");
        assert_eq!(q["startdate"], "1546300800");
        assert_eq!(q["enddate"], "100000000");
        assert_eq!(q["offset"], "12");
        assert_eq!(q["lastupdate"], "1546387200");
    }

    #[test]
    fn activity_params_keep_ymd_strings_and_field_order() {
        let params = GetActivityParams {
            startdateymd: Some("2019-01-01".into()),
            enddateymd: Some(utc_midnight(2019, 1, 2).into()),
            offset: Some(2),
            data_fields: Some(vec![
                ActivityField::Active,
                ActivityField::Calories,
                ActivityField::Elevation,
            ]),
            lastupdate: Some(10000000i64.into()),
        };
        let q = as_map(params.to_query().unwrap());
        assert_eq!(q.len(), 5);
        assert_eq!(q["startdateymd"], "2019-01-01");
        assert_eq!(q["enddateymd"], "2019-01-02");
        assert_eq!(q["offset"], "2");
        assert_eq!(q["data_fields"], "active,calories,elevation");
        assert_eq!(q["lastupdate"], "10000000");
    }

    #[test]
    fn ymd_instant_uses_its_own_zone_date() {
        let la = chrono_tz::America::Los_Angeles
            .with_ymd_and_hms(2019, 1, 2, 20, 0, 0)
            .unwrap();
        let params = GetActivityParams {
            startdateymd: Some(la.into()),
            ..Default::default()
        };
        assert_eq!(
            params.to_query().unwrap(),
            vec![("startdateymd".to_string(), "2019-01-02".to_string())]
        );
    }

    #[test]
    fn sleep_params_convert_date_text_and_keep_duplicates() {
        let params = GetSleepParams {
            startdate: Some("2019-01-01".into()),
            enddate: Some(utc_midnight(2019, 1, 2).into()),
            data_fields: Some(vec![SleepField::Hr, SleepField::Hr]),
        };
        let q = as_map(params.to_query().unwrap());
        assert_eq!(q.len(), 3);
        assert_eq!(q["startdate"], "1546300800");
        assert_eq!(q["enddate"], "1546387200");
        assert_eq!(q["data_fields"], "hr,hr");
    }

    #[test]
    fn sleep_summary_params_only_emit_provided_keys() {
        let params = GetSleepSummaryParams {
            startdateymd: Some("2019-01-01".into()),
            enddateymd: Some(utc_midnight(2019, 1, 2).into()),
            data_fields: Some(vec![
                SleepSummaryField::DeepSleepDuration,
                SleepSummaryField::HrAverage,
            ]),
            lastupdate: Some(10000000i64.into()),
            ..Default::default()
        };
        let pairs = params.to_query().unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["startdateymd", "enddateymd", "data_fields", "lastupdate"]);
        let q = as_map(pairs);
        assert_eq!(q["data_fields"], "deepsleepduration,hr_average");
    }

    #[test]
    fn malformed_date_text_is_rejected_for_epoch_params() {
        let params = GetSleepParams {
            startdate: Some("yesterday".into()),
            ..Default::default()
        };
        let err = params.to_query().unwrap_err();
        assert!(matches!(err, WithingsError::InvalidInput(ref m) if m.contains("startdate")));
    }
}
