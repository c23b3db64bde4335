use clap::Parser;
use rss_relay::{
    Cli, CommandListener, FileSeenStore, GoogleTranslator, HttpFeedReader, PassthroughTranslator,
    RelayConfig, RelayPipeline, TelegramClient, TelegramPublisher, Translator,
};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Must outlast the 30s getUpdates long poll
const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(45);
const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match RelayConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Starting RSS relay for {} feeds", config.feeds.len());
    info!("Configuration: {:?}", config);

    let http = reqwest::Client::builder().timeout(TELEGRAM_TIMEOUT).build()?;

    let translator: Box<dyn Translator> = match config.target_language {
        Some(_) => Box::new(GoogleTranslator::with_timeout(TRANSLATE_TIMEOUT)?),
        None => Box::new(PassthroughTranslator),
    };

    let pipeline = RelayPipeline::new(
        config.clone(),
        Box::new(HttpFeedReader::new(config.fetch.clone())?),
        Box::new(FileSeenStore::new(&config.seen_file)),
        translator,
        Box::new(TelegramPublisher::new(TelegramClient::new(http.clone(), &config.bot_token))),
    );

    if cli.once {
        let report = pipeline.run_logged_cycle().await;
        info!("Single cycle done: {:?}", report);
        return Ok(());
    }

    if !cli.no_commands {
        let listener = CommandListener::new(TelegramClient::new(http, &config.bot_token));
        tokio::spawn(listener.run());
    }

    tokio::select! {
        _ = pipeline.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested, stopping relay");
        }
    }

    Ok(())
}
