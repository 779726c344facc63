//! Fleet Admin CLI - add and edit rental fleet listings.
//!
//! # Usage
//!
//! ```bash
//! # List active owners
//! fleet-cli owners
//!
//! # Add a vehicle described by a listing file
//! fleet-cli vehicle create --file camry.yaml
//!
//! # Apply a listing file over an existing vehicle, skipping the prompt
//! fleet-cli vehicle edit --id 42 --file camry.yaml --yes
//! ```
//!
//! # Commands
//!
//! - `owners` - List active car owners
//! - `vehicle create` - Add a vehicle with its color variants
//! - `vehicle edit` - Update a vehicle and replace its color variants

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output goes to the terminal
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_admin::FleetConfig;
use fleet_core::VehicleId;

mod commands;
mod listing_file;

#[derive(Parser)]
#[command(name = "fleet-cli")]
#[command(author, version, about = "Fleet Admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active car owners
    Owners,
    /// Add or edit vehicle listings
    Vehicle {
        #[command(subcommand)]
        action: VehicleAction,
    },
}

#[derive(Subcommand)]
enum VehicleAction {
    /// Add a new vehicle
    Create {
        /// Listing file (YAML)
        #[arg(short, long)]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Edit an existing vehicle
    Edit {
        /// Vehicle id
        #[arg(short, long)]
        id: VehicleId,

        /// Listing file (YAML) applied over the stored vehicle
        #[arg(short, long)]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &FleetConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fleet_admin=info,fleet_cli=info".into());

    // JSON output for log shipping, text otherwise
    let json = std::env::var("FLEET_LOG_JSON").is_ok();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match FleetConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        e.report();
        eprintln!("{e}");
        // Flush Sentry before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &FleetConfig) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Owners => commands::owners::list(config).await?,
        Commands::Vehicle { action } => match action {
            VehicleAction::Create { file, yes } => {
                commands::vehicle::create(config, &file, yes).await?;
            }
            VehicleAction::Edit { id, file, yes } => {
                commands::vehicle::edit(config, id, &file, yes).await?;
            }
        },
    }
    Ok(())
}
