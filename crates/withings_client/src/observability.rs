//! Metric names and recorders. The library only emits through the `metrics`
//! facade; installing an exporter is left to the application.

pub const REQUESTS_TOTAL: &str = "withings_requests_total";
pub const API_ERRORS_TOTAL: &str = "withings_api_errors_total";
pub const TOKEN_REFRESHES_TOTAL: &str = "withings_token_refreshes_total";

pub fn record_request(action: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "action" => action).increment(1);
}

pub fn record_api_status(status: i64) {
    metrics::counter!(API_ERRORS_TOTAL, "status" => status.to_string()).increment(1);
}

pub fn record_token_refresh() {
    metrics::counter!(TOKEN_REFRESHES_TOTAL).increment(1);
}
