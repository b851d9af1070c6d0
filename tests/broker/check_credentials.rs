//! Check broker API credentials and connectivity
//!
//! 1. Loads `.env` and the `BROKER_*` configuration
//! 2. Reports whether credentials are configured
//! 3. Calls the broker info endpoint and reports whether the key was accepted
//!
//! Pass `--json` to print the broker info payload as JSON.
//! Exits non-zero when the broker rejects the credentials.

use anyhow::Context;
use ndbroker_client::prelude::*;
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> anyhow::Result<ExitCode> {
    let dotenv_path = dotenv::dotenv().ok();

    init_logging();

    match &dotenv_path {
        Some(path) => info!(path = %path.display(), "loaded .env"),
        None => info!("no .env file, using process environment"),
    }

    println!("🚀 ndbroker credentials check");
    println!("==============================");
    println!("   Started: {}", format_millis(millis()));

    BrokerRuntime::new().block_on(run()).context("starting monoio runtime")?
}

async fn run() -> anyhow::Result<ExitCode> {
    let config = BrokerConfig::from_env().context("loading BROKER_* configuration")?;
    println!("   Base URL: {}", config.base_url);
    match &config.credentials_file {
        Some(path) => println!("   Credential store: {}", path.display()),
        None => println!("   Credential store: environment"),
    }

    let desk = BrokerDesk::connect(config).context("building broker client")?;

    let Some(credential) = desk.client().gate().load() else {
        println!("ℹ️  Credentials not configured; the dashboard will serve demo data");
        return Ok(ExitCode::SUCCESS);
    };
    println!("✅ Credentials configured, API key {}", mask_key(credential.api_key()));

    let today = Utc::now().date_naive();
    let begin = (today - chrono::Duration::days(30)).format("%Y%m%d").to_string();
    let end = today.format("%Y%m%d").to_string();

    println!("🔗 Requesting broker info for {begin}..{end}");
    info!(%begin, %end, "requesting broker info");
    match desk.client().broker_info(&begin, &end, TradeType::Spot).await {
        Ok(broker) => {
            println!("✅ Key accepted");
            println!("   Sub-accounts: {}", broker.account_size);
            println!("   Broker level: {}", broker.level);
            if std::env::args().any(|arg| arg == "--json") {
                let json = serde_json::to_string_pretty(&broker).context("encoding broker info")?;
                println!("{json}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_auth_rejected() => {
            warn!(error = %e, "broker rejected the API key");
            eprintln!("❌ Key rejected: {e}");
            eprintln!("   Check the API key, secret and passphrase in your settings");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("broker info request failed"),
    }
}
