//! Fetches the last month of weight measures.
//!
//! Expects `WITHINGS_ACCESS_TOKEN`, `WITHINGS_REFRESH_TOKEN`, `WITHINGS_USER_ID`
//! and `WITHINGS_TOKEN_EXPIRY` alongside the usual client settings.
use secrecy::SecretString;
use withings_client::config::Config;
use withings_client::http_client::ReqwestWithingsClient;
use withings_client::{
    Credentials, GetMeasParams, MeasureGroupQuery, MeasureType, WithingsClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let var = |k: &str| std::env::var(k).map_err(|_| format!("{k} missing"));
    let creds = Credentials {
        access_token: SecretString::new(var("WITHINGS_ACCESS_TOKEN")?.into()),
        token_expiry: var("WITHINGS_TOKEN_EXPIRY")?.parse()?,
        token_type: "Bearer".into(),
        refresh_token: SecretString::new(var("WITHINGS_REFRESH_TOKEN")?.into()),
        user_id: var("WITHINGS_USER_ID")?,
        client_id: cfg.client_id.clone(),
        consumer_secret: cfg.consumer_secret.clone(),
    };

    let client = ReqwestWithingsClient::new(creds)
        .with_api_base_url(&cfg.api_base_url)
        .with_account_base_url(&cfg.account_base_url)
        .with_refresh_callback(|c| {
            eprintln!("token refreshed, new expiry {}", c.token_expiry);
        });

    let start = chrono::Utc::now() - chrono::Duration::days(30);
    let resp = client
        .get_meas(GetMeasParams {
            meastype: Some(MeasureType::Weight),
            startdate: Some(start.into()),
            ..Default::default()
        })
        .await?;

    let query = MeasureGroupQuery::default()
        .with_measure_type(MeasureType::Weight)
        .unambiguous();
    for group in resp.query_groups(&query) {
        if let Some(kg) = group.value_of(MeasureType::Weight) {
            println!("{}  {:.2} kg", group.date.format("%Y-%m-%d %H:%M %Z"), kg);
        }
    }
    Ok(())
}
