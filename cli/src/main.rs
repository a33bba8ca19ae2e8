//! Market charges: bundle runner
//!
//! Processes one charge bundle against in-memory repositories and prints the
//! outcome together with the notifications it produced.
//!
//! ```sh
//! # Process a bundle with default config (~/.config/market-charges/config.toml)
//! charges-cli --bundle bundle.json --participants participants.json
//!
//! # Validate config and exit
//! charges-cli --check
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use market_charges::application::{
    start_notification_worker, BundleOrchestrator, BundleValidators, EventBus, NotificationService,
    ReceiptFactory,
};
use market_charges::config::AppConfig;
use market_charges::domain::market_participant::MarketParticipant;
use market_charges::domain::{ChargeBundle, RepositoryProvider};
use market_charges::infrastructure::InMemoryRepositoryProvider;
use market_charges::shared::errors::InfraError;
use market_charges::init_tracing;

/// Process a charge bundle and print the outcome as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "charges-cli",
    version,
    about = "Validate and apply a bundle of charge operations",
    long_about = "Runs a charge bundle (JSON) through document, input and business \
                  validation, applies accepted operations to in-memory charge \
                  timelines and prints the outcome plus the resulting notifications.\n\n\
                  Default config: ~/.config/market-charges/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CHARGES_CONFIG")]
    config: Option<PathBuf>,

    /// Bundle to process (JSON).
    #[arg(short, long, required_unless_present = "check")]
    bundle: Option<PathBuf>,

    /// Market participants to register before processing (JSON array).
    #[arg(short, long)]
    participants: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Summary printed by `--check`, or the load error when the file was unusable.
fn check_report(
    config_path: &Path,
    config: &AppConfig,
    load_error: Option<InfraError>,
) -> Result<String, String> {
    if let Some(e) = load_error {
        return Err(format!("invalid configuration {}: {}", config_path.display(), e));
    }
    Ok(format!(
        "Configuration is valid\n   \
         Config file : {}\n   \
         UTC offset  : {} min\n   \
         Currency    : {}\n   \
         MPA         : {}\n   \
         Log level   : {}",
        config_path.display(),
        config.market.utc_offset_minutes,
        config.market.currency,
        config.market.metering_point_administrator_id,
        config.logging.level,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(market_charges::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match &load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if !cli.check {
                error!("Using default configuration.");
            }
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("{}", check_report(&config_path, &config, load_error)?);
        return Ok(());
    }

    let Some(bundle_path) = cli.bundle else {
        return Err("--bundle is required".into());
    };

    // ── Wire collaborators ─────────────────────────────────────
    let repos = InMemoryRepositoryProvider::new();
    if let Some(path) = cli.participants {
        let participants: Vec<MarketParticipant> = read_json(&path)?;
        info!(count = participants.len(), "Registering market participants");
        for participant in participants {
            repos.market_participants().save(participant).await?;
        }
    }
    let repos: Arc<dyn RepositoryProvider> = Arc::new(repos);

    let bus = Arc::new(EventBus::with_capacity(config.events.capacity));
    let notifications = Arc::new(NotificationService::new(
        repos.clone(),
        ReceiptFactory::new(&config.market),
    ));
    let worker = start_notification_worker(notifications.clone(), bus.subscribe());

    let orchestrator = BundleOrchestrator::new(
        repos,
        BundleValidators::from_config(&config),
        bus.clone(),
        &config,
    );

    // ── Process ────────────────────────────────────────────────
    let bundle: ChargeBundle = read_json(&bundle_path)?;
    let bundle = ChargeBundle::new(bundle.document, bundle.operations);
    let outcome = orchestrator.handle(bundle).await?;

    // closing the bus lets the worker drain and stop
    drop(orchestrator);
    drop(bus);
    worker.await?;

    let queued: serde_json::Map<String, serde_json::Value> = notifications
        .recipients()
        .into_iter()
        .map(|recipient| {
            let pending = serde_json::to_value(notifications.drain_for(&recipient))?;
            Ok((recipient, pending))
        })
        .collect::<Result<_, serde_json::Error>>()?;

    let report = serde_json::json!({
        "outcome": outcome,
        "notifications": queued,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
