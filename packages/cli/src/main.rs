#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for property address resolution.
//!
//! `property_intel resolve <ADDRESS>` runs the full pipeline and prints
//! the resulting profile as JSON. `property_intel services` lists the
//! compiled-in provider registry.
//!
//! Uses `indicatif-log-bridge` (via [`property_intel_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and stage spinners never fight for the terminal.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use property_intel_census::AcsClient;
use property_intel_cli_utils::IndicatifObserver;
use property_intel_climate::open_meteo::OpenMeteoClient;
use property_intel_profile::{PipelineOptions, PropertyResolver};
use property_intel_provider::{http, registry};
use tokio_util::sync::CancellationToken;

/// Resolve US property addresses into location intelligence profiles.
#[derive(Parser)]
#[command(name = "property_intel")]
#[command(about = "Resolve US property addresses into location intelligence profiles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one address and print its profile as JSON.
    Resolve {
        /// Free-text US street address.
        address: String,

        /// Abandon the run after this many seconds.
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Substitute national estimates when demographics are unavailable.
        #[arg(long)]
        estimates: bool,

        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },

    /// List registered providers and whether they are usable.
    Services,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = property_intel_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            address,
            deadline_secs,
            estimates,
            compact,
        } => {
            let client = http::build_client(http::timeout_from_env())?;
            let geocoding = property_intel_geocoder::provider_from_registry(&client)?;
            let census = Arc::new(AcsClient::from_registry(&client)?);
            let weather = Arc::new(OpenMeteoClient::from_registry(&client)?);

            let resolver = PropertyResolver::new(geocoding, census.clone(), census, weather)
                .with_observer(IndicatifObserver::new(&multi));

            let options = PipelineOptions {
                deadline: deadline_secs.map(Duration::from_secs),
                demographic_estimates: estimates,
            };

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Interrupted, cancelling resolution");
                    on_interrupt.cancel();
                }
            });

            let profile = resolver.resolve_with(&address, &options, &cancel).await?;
            multi.clear()?;

            let json = if compact {
                serde_json::to_string(&profile)?
            } else {
                serde_json::to_string_pretty(&profile)?
            };
            println!("{json}");
        }
        Commands::Services => {
            for service in registry::all_services() {
                let credentials = match service.key_env() {
                    Some(env) if service.has_credentials() => format!("{env} set"),
                    Some(env) => format!("{env} NOT set"),
                    None => "no key required".to_string(),
                };
                println!(
                    "{:<12} {:<10} priority={} {} ({credentials})",
                    service.id,
                    service.kind.as_ref(),
                    service.priority,
                    if service.enabled { "enabled" } else { "disabled" },
                );
            }
        }
    }

    Ok(())
}
