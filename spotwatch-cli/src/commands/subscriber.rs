//! `spotwatch subscriber`: manage registered watchers.
//!
//! Subscribers live in `<store.directory>/subscribers.json`. A running
//! `spotwatch run` picks up changes on its next cycle.

use std::path::Path;

use clap::Subcommand;
use spotwatch::model::Subscriber;
use spotwatch::store::{JsonSpotStore, JsonSubscriberDirectory};

use super::common::{load_config, runtime};
use crate::error::CliError;

/// Subscriber subcommands.
#[derive(Debug, Subcommand)]
pub enum SubscriberCommands {
    /// Register a subscriber, replacing any with the same id
    Add {
        /// Unique subscriber id
        #[arg(long)]
        id: String,

        /// Push delivery token for this subscriber's device
        #[arg(long)]
        address: String,

        /// Zone center latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Zone center longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Zone radius, in the configured distance unit
        #[arg(long)]
        radius: f64,
    },

    /// List registered subscribers
    List,

    /// Remove a subscriber and forget its tracked spots
    Remove {
        /// Subscriber id
        id: String,
    },
}

/// Run a subscriber subcommand.
pub fn run(config_path: Option<&Path>, command: SubscriberCommands) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let directory = JsonSubscriberDirectory::new(&config.store.directory);
    let unit = config.engine.distance_unit;

    runtime()?.block_on(async {
        match command {
            SubscriberCommands::Add {
                id,
                address,
                lat,
                lon,
                radius,
            } => {
                let subscriber = Subscriber::new(id, address, lat, lon, radius);
                let replaced = add(&directory, subscriber.clone()).await?;
                let verb = if replaced { "Updated" } else { "Added" };
                println!(
                    "{} subscriber '{}' ({:.4}, {:.4}) radius {}{}",
                    verb, subscriber.id, subscriber.latitude, subscriber.longitude, radius, unit
                );
            }
            SubscriberCommands::List => {
                let subscribers = directory.read().await?;
                if subscribers.is_empty() {
                    println!("No subscribers registered.");
                }
                for s in subscribers {
                    println!(
                        "{:<20} ({:>9.4}, {:>9.4}) radius {}{}",
                        s.id, s.latitude, s.longitude, s.radius, unit
                    );
                }
            }
            SubscriberCommands::Remove { id } => {
                let spots = JsonSpotStore::open(&config.store.directory).await?;
                match remove(&directory, &spots, &id).await? {
                    Some(purged) => {
                        println!("Removed subscriber '{}' ({} tracked spots dropped)", id, purged)
                    }
                    None => {
                        return Err(CliError::Config(format!("No subscriber with id '{}'", id)));
                    }
                }
            }
        }
        Ok(())
    })
}

/// Validates the zone and stores the subscriber. Returns true if an existing
/// subscriber was replaced.
async fn add(directory: &JsonSubscriberDirectory, subscriber: Subscriber) -> Result<bool, CliError> {
    if subscriber.id.trim().is_empty() {
        return Err(CliError::Config("subscriber id must not be empty".to_string()));
    }
    subscriber
        .zone()
        .map_err(|e| CliError::Config(format!("invalid zone: {}", e)))?;

    Ok(directory.add(subscriber).await?)
}

/// Unregisters a subscriber and drops its spots, so that registering the
/// same id again announces aircraft already in the zone. Returns the number
/// of spots dropped, or `None` if no such subscriber exists.
///
/// A running poll loop keeps its own copy of the spot file; stop it first
/// or its next write restores the dropped spots until their exits.
async fn remove(
    directory: &JsonSubscriberDirectory,
    spots: &JsonSpotStore,
    id: &str,
) -> Result<Option<usize>, CliError> {
    if !directory.remove(id).await? {
        return Ok(None);
    }
    Ok(Some(spots.purge_subscriber(id).await?))
}
