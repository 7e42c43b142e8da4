//! checkout-geo
//!
//! Command-line front end for the checkout resolution and validation core.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI command
//!       │
//!       ▼
//!   CheckoutSession ──────────────┬──────────────────────┐
//!       │                         │                      │
//!       ▼                         ▼                      ▼
//!   GeoResolver              SearchCoordinator     ValidationEngine
//!       │  cache hit?             │ debounce +          (pure, sync)
//!       ▼                         │ latest-wins
//!   rich ──► simple ──► static ──► synthesized
//! ```
//!
//! Every command prints pretty JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use checkout_geo::config::{load_config, CheckoutConfig};
use checkout_geo::observability::init_logging;
use checkout_geo::validation::{FieldId, FormSnapshot};
use checkout_geo::CheckoutSession;

#[derive(Parser)]
#[command(name = "checkout-geo")]
#[command(about = "Resolve checkout geo data and validate checkout fields", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all countries
    Countries,
    /// Suggest cities for a partial name
    Cities { country: String, query: String },
    /// Postal codes for a city
    Postal { country: String, city: String },
    /// Details for one country
    Info { country: String },
    /// Validate a single field
    Validate {
        field: FieldId,
        value: String,
        /// Country used by the postal code rule
        #[arg(long)]
        country: Option<String>,
        /// Card number used by the security code rule
        #[arg(long)]
        card_number: Option<String>,
    },
    /// Simulate typing into the city field and print the visible result
    Type {
        country: String,
        keystrokes: Vec<String>,
        /// Pause between keystrokes
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CheckoutConfig::default(),
    };
    init_logging(&config.observability);

    tracing::info!(
        config = ?cli.config,
        debounce_ms = config.search.debounce_ms,
        "checkout-geo v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let wait = settle_time(&config);
    let session = CheckoutSession::new(config)?;

    match cli.command {
        Commands::Countries => print_json(&session.resolve_countries().await)?,
        Commands::Cities { country, query } => {
            print_json(&session.resolve_cities(&country, &query).await)?
        }
        Commands::Postal { country, city } => {
            print_json(&session.resolve_postal_codes(&country, &city).await)?
        }
        Commands::Info { country } => print_json(&session.country_info(&country).await)?,
        Commands::Validate {
            field,
            value,
            country,
            card_number,
        } => {
            let mut form = FormSnapshot::new().with(field, value.clone());
            if let Some(country) = country {
                form.set(FieldId::Country, country);
            }
            if let Some(number) = card_number {
                form.set(FieldId::CardNumber, number);
            }
            print_json(&session.validate_field(field, &value, &form))?
        }
        Commands::Type {
            country,
            keystrokes,
            interval_ms,
        } => {
            let search = session.search();
            search.select_country(&country);
            let mut rx = search.subscribe();
            for (i, text) in keystrokes.iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
                search.on_input(text);
                rx.borrow_and_update();
            }

            let last_len = keystrokes.last().map(|k| k.trim().chars().count()).unwrap_or(0);
            if last_len >= session.config().search.min_query_len
                && tokio::time::timeout(wait, rx.changed()).await.is_err()
            {
                tracing::warn!(wait_ms = wait.as_millis() as u64, "No search result before deadline");
            }
            print_json(&search.snapshot())?
        }
    }

    Ok(())
}

/// Upper bound for a debounced search to land: the quiet period plus every
/// remote deadline.
fn settle_time(config: &CheckoutConfig) -> Duration {
    let providers = &config.providers;
    let remote_ms = [
        (providers.rich.enabled, providers.rich.timeout_ms),
        (providers.simple.enabled, providers.simple.timeout_ms),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, ms)| ms)
    .sum::<u64>();
    Duration::from_millis(config.search.debounce_ms + remote_ms + 500)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
