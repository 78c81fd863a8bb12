#![allow(dead_code)]

use secrecy::SecretString;
use withings_client::Credentials;
use withings_client::http_client::ReqwestWithingsClient;
use wiremock::MockServer;

pub const TIMEZONE_STR0: &str = "Europe/London";
pub const TIMEZONE_STR1: &str = "America/Los_Angeles";

pub fn credentials(token_expiry: i64) -> Credentials {
    Credentials {
        access_token: SecretString::new("my_access_token".into()),
        token_expiry,
        token_type: "Bearer".into(),
        refresh_token: SecretString::new("my_refresh_token".into()),
        user_id: "my_user_id".into(),
        client_id: "my_client_id".into(),
        consumer_secret: SecretString::new("my_consumer_secret".into()),
    }
}

pub fn fresh_credentials() -> Credentials {
    credentials(chrono::Utc::now().timestamp() + 10000)
}

pub fn client(server: &MockServer, creds: Credentials) -> ReqwestWithingsClient {
    ReqwestWithingsClient::new(creds)
        .with_api_base_url(&server.uri())
        .with_account_base_url(&server.uri())
}

pub fn envelope(body: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "status": 0, "body": body })
}

pub fn activity_body() -> serde_json::Value {
    serde_json::json!({
        "more": false,
        "offset": 0,
        "activities": [
            {
                "date": "2019-01-01", "timezone": TIMEZONE_STR0, "is_tracker": true,
                "deviceid": "dev1", "brand": 100, "steps": 101, "distance": 102,
                "elevation": 103, "soft": 104, "moderate": 105, "intense": 106,
                "active": 107, "calories": 108, "totalcalories": 109, "hr_average": 110,
                "hr_min": 111, "hr_max": 112, "hr_zone_0": 113, "hr_zone_1": 114,
                "hr_zone_2": 115, "hr_zone_3": 116
            },
            {
                "date": "2019-01-02", "timezone": TIMEZONE_STR1, "is_tracker": false,
                "deviceid": "dev2", "brand": 200, "steps": 201, "distance": 202,
                "elevation": 203, "soft": 204, "moderate": 205, "intense": 206,
                "active": 207, "calories": 208, "totalcalories": 209, "hr_average": 210,
                "hr_min": 211, "hr_max": 212, "hr_zone_0": 213, "hr_zone_1": 214,
                "hr_zone_2": 215, "hr_zone_3": 216
            }
        ]
    })
}

pub fn meas_body() -> serde_json::Value {
    serde_json::json!({
        "more": false,
        "offset": 0,
        "updatetime": 1409596058,
        "timezone": TIMEZONE_STR0,
        "measuregrps": [
            {
                "attrib": 4, "category": 1, "created": 1111111111, "date": "2019-01-01",
                "deviceid": "dev1", "grpid": "grp1",
                "measures": [
                    {"type": 4, "unit": 110, "value": 110},
                    {"type": 1, "unit": 120, "value": 120}
                ]
            },
            {
                "attrib": 1, "category": 2, "created": 2222222222_i64, "date": "2019-01-02",
                "deviceid": "dev2", "grpid": "grp2",
                "measures": [
                    {"type": 71, "unit": 210, "value": 210},
                    {"type": 88, "unit": 220, "value": 220}
                ]
            }
        ]
    })
}

pub fn token_body(access_token: &str, refresh_token: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "expires_in": 11,
        "token_type": "Bearer",
        "refresh_token": refresh_token,
        "userid": "my_user_id"
    })
}
