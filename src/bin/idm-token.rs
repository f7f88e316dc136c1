use anyhow::{Context, Result};
use clap::Parser;
use idm_token_agent::utils::config_loader;
use idm_token_agent::utils::logging;
use idm_token_agent::utils::logging::LogLevel;
use idm_token_agent::TokenCache;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "idm-token.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// how many times to ask the cache for a token
    #[arg(long, default_value_t = 1)]
    repeat: u32,
    /// sign out before exiting
    #[arg(long)]
    sign_out: bool,
    /// dump prometheus metrics to the log before exiting
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);
    debug!(identity = ?service_config.identity, "config loaded");

    // -------------------------------
    // 2. Build the cache, nothing is fetched yet
    // -------------------------------

    let cache = TokenCache::from_settings(&service_config.identity);

    // -------------------------------
    // 3. Ask for the token; only the first call should sign in
    // -------------------------------

    let mut token = String::new();
    for attempt in 1..=args.repeat.max(1) {
        token = cache
            .get_token()
            .await
            .with_context(|| format!("get_token failed on attempt {attempt}"))?;
    }
    println!("{token}");

    // -------------------------------
    // 4. Optional sign-out
    // -------------------------------

    if args.sign_out {
        cache.sign_out().await.context("sign-out failed")?;
    }

    if args.metrics {
        info!("\n{}", idm_token_agent::observability::metrics::render().await?);
    }

    Ok(())
}
