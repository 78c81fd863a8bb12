//! Walks through the authorization-code flow.
//!
//! Prints the authorize URL, then reads the `code` from stdin and exchanges it.
use std::io::BufRead;
use withings_client::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_env = std::env::var("WITHINGS_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let auth = cfg.auth();
    println!("Open this URL and authorize access:\n{}", auth.authorize_url(None)?);
    println!("Paste the `code` query parameter from the redirect:");

    let mut code = String::new();
    std::io::stdin().lock().read_line(&mut code)?;
    let creds = auth.get_credentials(code.trim()).await?;
    println!(
        "Authorized user {} (token expires at {})",
        creds.user_id, creds.token_expiry
    );
    Ok(())
}
